//! Map view widget — the projected viewport pane on the right.
//!
//! # Navigation (when pane is focused)
//!
//! | Key | Action |
//! |-----|--------|
//! | `↑ k` / `↓ j` / `← h` / `→ l` | Pan the viewport |
//! | `+` / `-` | Zoom in / out around the center |
//! | `F` | Fit the viewport to every visible layer |
//! | `]` / `[` | Step the grid cursor (grid overlay on) |
//! | `Enter` | Zoom to the focused grid cell |
//!
//! # Rendering
//!
//! Positions project equirectangularly: the viewport bounds map linearly
//! onto the inner cell grid. Features whose footprint spans more than one
//! cell draw as a box outline; everything smaller draws as a single glyph at
//! its center. The active basemap contributes the background style, the grid
//! overlay its cell outlines, and a selected search hit an attribute popup.

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use gaz_core::{Bounds, FeatureHandle, Geometry, LayerRegistry};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget},
};
use tracing;

/// Fraction of the viewport span moved per pan step.
const PAN_STEP: f64 = 0.2;
/// Span multiplier per zoom-in step (zoom-out divides).
const ZOOM_STEP: f64 = 0.6;
/// Smallest span a viewport may reach, in degrees.
const MIN_SPAN: f64 = 0.0005;
/// Span given to the viewport when centering on a point feature.
const POINT_SPAN: f64 = 0.02;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// An open attribute popup: which feature, and the label it was selected by.
#[derive(Debug, Clone)]
pub struct PopupState {
    pub handle: FeatureHandle,
    pub label: String,
}

/// One selectable basemap: display name and theme style tag.
#[derive(Debug, Clone)]
pub struct Basemap {
    pub name: String,
    pub style: String,
}

pub struct MapViewState {
    pub viewport: Bounds,
    /// Available basemaps; never empty (a built-in default backstops an
    /// export that names none). Exactly one is active at any time.
    pub basemaps: Vec<Basemap>,
    pub active_basemap: usize,
    /// Whether the grid navigation overlay is drawn.
    pub grid_on: bool,
    /// Registry index of the designated grid layer, if the export has one.
    pub grid_layer: Option<usize>,
    /// Cell bounds of the grid layer, in feature order.
    pub grid_cells: Vec<Bounds>,
    pub grid_cursor: usize,
    /// Feature currently emphasized on the map (last selected search hit).
    pub highlight: Option<FeatureHandle>,
    pub popup: Option<PopupState>,
}

impl MapViewState {
    pub fn new(viewport: Bounds, basemaps: Vec<Basemap>) -> Self {
        let basemaps = if basemaps.is_empty() {
            vec![Basemap { name: "OpenStreetMap".to_string(), style: "streets".to_string() }]
        } else {
            basemaps
        };
        Self {
            viewport,
            basemaps,
            active_basemap: 0,
            grid_on: false,
            grid_layer: None,
            grid_cells: Vec::new(),
            grid_cursor: 0,
            highlight: None,
            popup: None,
        }
    }

    /// The single active basemap.
    pub fn basemap(&self) -> &Basemap {
        &self.basemaps[self.active_basemap]
    }

    /// Switch to the next basemap, wrapping. The previous one stops being
    /// current in the same step — there is never zero or two active.
    pub fn next_basemap(&mut self) {
        self.active_basemap = (self.active_basemap + 1) % self.basemaps.len();
        tracing::debug!(basemap = %self.basemap().name, "basemap switched");
    }

    /// Switch to the basemap with the given name (case-insensitive). Unknown
    /// names are a no-op.
    pub fn set_basemap(&mut self, name: &str) {
        if let Some(idx) = self
            .basemaps
            .iter()
            .position(|b| b.name.eq_ignore_ascii_case(name))
        {
            self.active_basemap = idx;
            tracing::debug!(basemap = %self.basemap().name, "basemap switched");
        } else {
            tracing::debug!(name, "unknown basemap ignored");
        }
    }

    /// Toggle the grid overlay. A no-op when the export designates no grid
    /// layer.
    pub fn toggle_grid(&mut self) {
        if self.grid_layer.is_none() {
            tracing::debug!("grid toggle ignored: no grid layer");
            return;
        }
        self.grid_on = !self.grid_on;
        tracing::debug!(grid_on = self.grid_on, "grid toggled");
    }

    /// Recenter the viewport on a position, preserving the current span.
    pub fn center_on(&mut self, lon: f64, lat: f64) {
        let (w, h) = self.viewport.span();
        self.viewport = Bounds {
            west: lon - w / 2.0,
            south: lat - h / 2.0,
            east: lon + w / 2.0,
            north: lat + h / 2.0,
        };
    }

    /// Zoom/focus on a feature: fit-to-bounds for line and area features,
    /// center-and-zoom for points.
    pub fn focus(&mut self, geometry: &Geometry) {
        match *geometry {
            Geometry::Point { lon, lat } => {
                self.viewport = Bounds::from_point(lon, lat).pad(0.0, POINT_SPAN);
            }
            Geometry::Line(b) | Geometry::Area(b) => {
                self.viewport = b.pad(0.15, POINT_SPAN);
            }
        }
        tracing::debug!(viewport = ?self.viewport, "focused feature");
    }

    /// Handle a navigation event from the app shell.
    pub fn handle(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Nav(dir) => {
                let (w, h) = self.viewport.span();
                let (dx, dy) = match dir {
                    Direction::Up => (0.0, h * PAN_STEP),
                    Direction::Down => (0.0, -h * PAN_STEP),
                    Direction::Left => (-w * PAN_STEP, 0.0),
                    Direction::Right => (w * PAN_STEP, 0.0),
                };
                self.viewport = Bounds {
                    west: self.viewport.west + dx,
                    south: self.viewport.south + dy,
                    east: self.viewport.east + dx,
                    north: self.viewport.north + dy,
                };
                self.popup = None;
            }
            AppEvent::ZoomIn => {
                self.zoom(ZOOM_STEP);
                self.popup = None;
            }
            AppEvent::ZoomOut => {
                self.zoom(1.0 / ZOOM_STEP);
                self.popup = None;
            }
            AppEvent::GridNext => self.step_grid(1),
            AppEvent::GridPrev => self.step_grid(-1),
            AppEvent::Enter => {
                if self.grid_on {
                    if let Some(cell) = self.grid_cells.get(self.grid_cursor) {
                        self.viewport = cell.pad(0.05, POINT_SPAN);
                        self.popup = None;
                        tracing::debug!(cell = self.grid_cursor, "zoomed to grid cell");
                    }
                }
            }
            _ => {}
        }
    }

    fn zoom(&mut self, factor: f64) {
        let (cx, cy) = self.viewport.center();
        let (w, h) = self.viewport.span();
        let w = (w * factor).max(MIN_SPAN);
        let h = (h * factor).max(MIN_SPAN);
        self.viewport = Bounds {
            west: cx - w / 2.0,
            south: cy - h / 2.0,
            east: cx + w / 2.0,
            north: cy + h / 2.0,
        };
        tracing::debug!(viewport = ?self.viewport, "zoomed");
    }

    fn step_grid(&mut self, delta: isize) {
        if !self.grid_on || self.grid_cells.is_empty() {
            return;
        }
        let len = self.grid_cells.len() as isize;
        let next = (self.grid_cursor as isize + delta).rem_euclid(len);
        self.grid_cursor = next as usize;
        self.popup = None;
        tracing::debug!(cell = self.grid_cursor, "grid cursor moved");
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct MapView<'a> {
    state: &'a MapViewState,
    registry: &'a LayerRegistry,
    /// Names of layers whose checkbox is on, from the layer tree.
    visible: &'a [String],
    focused: bool,
    theme: &'a Theme,
    /// Attribution text for the status line, when enabled.
    attribution: Option<&'a str>,
}

impl<'a> MapView<'a> {
    pub fn new(
        state: &'a MapViewState,
        registry: &'a LayerRegistry,
        visible: &'a [String],
        focused: bool,
        theme: &'a Theme,
        attribution: Option<&'a str>,
    ) -> Self {
        Self { state, registry, visible, focused, theme, attribution }
    }
}

impl Widget for MapView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border_unfocused
        };

        let block = Block::bordered().title("Map").border_style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < 2 || inner.height < 2 {
            return;
        }

        // Basemap background beneath everything else
        let basemap = self.state.basemap();
        buf.set_style(inner, self.theme.basemap_style(&basemap.style));

        // Canvas excludes the bottom status row
        let canvas = Rect { height: inner.height - 1, ..inner };
        let vp = &self.state.viewport;

        // Overlay layers, in registry order
        for layer in self.registry.layers() {
            if !self.visible.iter().any(|v| v == &layer.name) {
                continue;
            }
            let style = self.theme.layer_style(&layer.name);
            for feature in &layer.features {
                draw_feature(buf, canvas, vp, &feature.geometry, style, self.theme);
            }
        }

        // The selected search hit stays emphasized even when its layer's
        // checkbox is off.
        if let Some(handle) = self.state.highlight {
            if let Some(feature) = self.registry.feature(handle) {
                draw_feature(
                    buf,
                    canvas,
                    vp,
                    &feature.geometry,
                    self.theme.search_highlight,
                    self.theme,
                );
            }
        }

        // Grid overlay above the layers
        if self.state.grid_on {
            for (i, cell) in self.state.grid_cells.iter().enumerate() {
                let style = if i == self.state.grid_cursor {
                    self.theme.grid_highlight
                } else {
                    self.theme.grid_cell
                };
                if let Some(rect) = project_bounds(cell, vp, canvas) {
                    draw_outline(buf, rect, '·', style);
                }
            }
        }

        self.render_status(buf, inner);

        if let Some(popup) = &self.state.popup {
            self.render_popup(buf, area, popup);
        }
    }
}

impl MapView<'_> {
    fn render_status(&self, buf: &mut Buffer, inner: Rect) {
        let (cx, cy) = self.state.viewport.center();
        let (w, _) = self.state.viewport.span();
        let grid = if self.state.grid_on { "  grid" } else { "" };
        let status = format!(
            " {:.4},{:.4}  span {:.3}°  {}{} ",
            cx, cy, w, self.state.basemap().name, grid,
        );
        let y = inner.bottom() - 1;
        buf.set_string(inner.x, y, &status, Style::default().add_modifier(Modifier::DIM));

        if let Some(attribution) = self.attribution {
            let text = format!(" {attribution} ");
            let x = inner.right().saturating_sub(text.chars().count() as u16);
            if x > inner.x + status.chars().count() as u16 {
                buf.set_string(x, y, &text, Style::default().add_modifier(Modifier::DIM));
            }
        }
    }

    fn render_popup(&self, buf: &mut Buffer, area: Rect, popup: &PopupState) {
        let Some(feature) = self.registry.feature(popup.handle) else {
            return;
        };

        // Deterministic property order for rendering
        let mut props: Vec<(&String, &serde_json::Value)> = feature.properties.iter().collect();
        props.sort_by_key(|(k, _)| k.as_str());

        let width = (area.width * 3 / 5).clamp(24, 56).min(area.width);
        let height = ((props.len() as u16) + 2).clamp(3, 14).min(area.height);
        let rect = centered_rect(width, height, area);
        Clear.render(rect, buf);

        let block = Block::bordered()
            .title(format!(" {} ", popup.label))
            .border_style(self.theme.border_focused);
        let inner = block.inner(rect);
        block.render(rect, buf);

        let lines: Vec<Line> = props
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                Line::from(vec![
                    Span::styled(
                        format!("{key}: "),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(value),
                ])
            })
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }
}

// ---------------------------------------------------------------------------
// Projection helpers
// ---------------------------------------------------------------------------

/// Project a position into a cell of `canvas`, or `None` when it falls
/// outside the viewport.
fn project(lon: f64, lat: f64, vp: &Bounds, canvas: Rect) -> Option<(u16, u16)> {
    let (w, h) = vp.span();
    if w <= 0.0 || h <= 0.0 || !vp.contains(lon, lat) {
        return None;
    }
    let fx = (lon - vp.west) / w;
    let fy = (vp.north - lat) / h;
    let x = canvas.x + ((fx * (canvas.width - 1) as f64).round() as u16).min(canvas.width - 1);
    let y = canvas.y + ((fy * (canvas.height - 1) as f64).round() as u16).min(canvas.height - 1);
    Some((x, y))
}

/// Project bounds into a cell rectangle, clipped to the canvas. `None` when
/// the bounds lie entirely outside the viewport.
fn project_bounds(b: &Bounds, vp: &Bounds, canvas: Rect) -> Option<Rect> {
    // Reject non-overlapping extents before clamping
    if b.east < vp.west || b.west > vp.east || b.north < vp.south || b.south > vp.north {
        return None;
    }
    let clamped = Bounds {
        west: b.west.max(vp.west),
        south: b.south.max(vp.south),
        east: b.east.min(vp.east),
        north: b.north.min(vp.north),
    };
    let (x0, y0) = project(clamped.west, clamped.north, vp, canvas)?;
    let (x1, y1) = project(clamped.east, clamped.south, vp, canvas)?;
    Some(Rect {
        x: x0,
        y: y0,
        width: x1.saturating_sub(x0) + 1,
        height: y1.saturating_sub(y0) + 1,
    })
}

fn draw_feature(
    buf: &mut Buffer,
    canvas: Rect,
    vp: &Bounds,
    geometry: &Geometry,
    style: Style,
    theme: &Theme,
) {
    let glyph = match geometry {
        Geometry::Point { .. } => "●",
        Geometry::Line(_) => "─",
        Geometry::Area(_) => "▪",
    };
    // Geometry style gives the base look; the caller's layer/highlight
    // style wins where they overlap.
    let style = theme.geometry_style(geometry).patch(style);

    match geometry {
        Geometry::Point { lon, lat } => {
            if let Some((x, y)) = project(*lon, *lat, vp, canvas) {
                buf.set_string(x, y, glyph, style);
            }
        }
        Geometry::Line(b) | Geometry::Area(b) => {
            match project_bounds(b, vp, canvas) {
                Some(rect) if rect.width > 1 || rect.height > 1 => {
                    draw_outline(buf, rect, '·', style);
                }
                Some(rect) => {
                    buf.set_string(rect.x, rect.y, glyph, style);
                }
                None => {}
            }
        }
    }
}

/// Draw the border cells of `rect` with `ch`.
fn draw_outline(buf: &mut Buffer, rect: Rect, ch: char, style: Style) {
    let s = ch.to_string();
    for x in rect.left()..rect.right() {
        buf.set_string(x, rect.top(), &s, style);
        buf.set_string(x, rect.bottom().saturating_sub(1), &s, style);
    }
    for y in rect.top()..rect.bottom() {
        buf.set_string(rect.left(), y, &s, style);
        buf.set_string(rect.right().saturating_sub(1), y, &s, style);
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
