//! Top-level application state and the main event loop.
//!
//! [`App::run`] sets up the terminal, drives the crossterm event loop, and
//! tears everything down cleanly on exit or panic.
//!
//! The two time-based behaviours — search debounce and the delayed attribute
//! popup — are single-shot deadlines checked once per loop iteration. A new
//! keystroke overwrites the pending search deadline (last call wins); a new
//! selection overwrites the pending popup.

use crate::{
    commands::{execute_command, Command},
    event::{self, AppEvent},
    theme::Theme,
    widgets::{
        basemap_bar::BasemapBar,
        command_bar::{CommandBar, CommandBarState},
        help::HelpPopup,
        layer_tree::{LayerTree, LayerTreeState},
        map_view::{Basemap, MapView, MapViewState, PopupState},
        search_bar::{SearchBar, SearchBarState, SearchResults},
    },
};
use chrono::{DateTime, Utc};
use crossterm::{
    event::{self as ct_event, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use gaz_core::{config::Config, normalize, Bounds, LayerRegistry, SearchIndex};
use gaz_layers::MapExport;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction as LayoutDir, Layout, Rect},
    Frame, Terminal,
};
use std::{
    io,
    time::{Duration, Instant},
};

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Layers,
    Map,
    Search,
    /// Vim-style `:` command line is active.
    Command,
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub registry: LayerRegistry,
    pub index: SearchIndex,
    /// Map title from the manifest, shown in the help popup.
    pub title: String,
    /// Export timestamp from the manifest, if the tool stamped one.
    pub generated: Option<DateTime<Utc>>,
    pub focus: Focus,
    /// Focus state before entering command mode, restored on exit.
    pub prev_focus: Focus,
    pub theme: Theme,
    pub config: Config,
    pub show_help: bool,
    pub tree: LayerTreeState,
    pub map: MapViewState,
    pub search: SearchBarState,
    pub command_bar: CommandBarState,
    /// Pending debounced search run, re-armed on every query edit.
    pub search_deadline: Option<Instant>,
    /// Pending popup open after a zoom/focus transition.
    pub popup_deadline: Option<(Instant, PopupState)>,
    pub quit: bool,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    state: AppState,
}

impl App {
    pub fn new(export: MapExport, index: SearchIndex, config: Config, theme: Theme) -> Self {
        let MapExport { manifest, registry } = export;

        // Category tree over the layers that actually loaded, with
        // checkboxes reflecting startup visibility.
        let groups: Vec<(String, Vec<(String, bool)>)> = manifest
            .categories()
            .into_iter()
            .map(|category| {
                let layers = manifest
                    .layers
                    .iter()
                    .filter(|spec| spec.category == category)
                    .filter_map(|spec| {
                        registry
                            .layer(&spec.name)
                            .map(|layer| (layer.name.clone(), layer.visible))
                    })
                    .collect();
                (category.to_string(), layers)
            })
            .collect();
        let tree = LayerTreeState::from_categories(&groups);

        // Start the viewport on everything visible, or on the whole world
        // when the export is empty.
        let viewport = registry
            .bounds_where(|l| l.visible)
            .map(|b| b.pad(0.05, 0.02))
            .unwrap_or(Bounds { west: -180.0, south: -90.0, east: 180.0, north: 90.0 });

        let basemaps = manifest
            .basemaps
            .iter()
            .map(|b| Basemap { name: b.name.clone(), style: b.style.clone() })
            .collect();
        let mut map = MapViewState::new(viewport, basemaps);

        // Designated grid layer, when present and loaded
        if let Some(grid_name) = &manifest.grid.layer {
            if let Some(idx) = registry.layer_index(grid_name) {
                map.grid_layer = Some(idx);
                map.grid_cells = registry.layers()[idx]
                    .features
                    .iter()
                    .map(|f| f.geometry.bounds())
                    .collect();
            } else {
                tracing::debug!(layer = %grid_name, "grid layer not loaded; grid disabled");
            }
        }

        let state = AppState {
            registry,
            index,
            title: manifest.title.clone(),
            generated: manifest.generated,
            focus: Focus::Layers,
            prev_focus: Focus::Layers,
            theme,
            config,
            show_help: false,
            tree,
            map,
            search: SearchBarState::default(),
            command_bar: CommandBarState::default(),
            search_deadline: None,
            popup_deadline: None,
            quit: false,
        };

        App { state }
    }

    /// Set up the terminal, run the event loop, and restore the terminal on exit.
    pub fn run(mut self) -> anyhow::Result<()> {
        install_panic_hook();

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            self.tick();

            {
                let s = &self.state;
                terminal.draw(|frame| draw(frame, s))?;
            }

            if self.state.quit {
                break;
            }

            if ct_event::poll(Duration::from_millis(16))? {
                match ct_event::read()? {
                    Event::Key(key)
                        if key.kind == crossterm::event::KeyEventKind::Press =>
                    {
                        let raw = Event::Key(key);
                        // Use insert-mode mapping when a text widget is focused
                        let app_event = if is_insert_mode(self.state.focus) {
                            event::to_app_event_insert(raw)
                        } else {
                            event::to_app_event(raw, &self.state.config.keybindings)
                        };
                        if let Some(ev) = app_event {
                            tracing::debug!(
                                focus = ?self.state.focus,
                                event = ?ev,
                                "key event"
                            );
                            self.handle(ev);
                        }
                    }
                    other => {
                        if let Some(ev) =
                            event::to_app_event(other, &self.state.config.keybindings)
                        {
                            self.handle(ev);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Fire any deadline that has come due. Runs once per loop iteration,
    /// before drawing, so results and popups appear without a keypress.
    fn tick(&mut self) {
        let now = Instant::now();
        let s = &mut self.state;

        if s.search_deadline.is_some_and(|d| now >= d) {
            s.search_deadline = None;
            run_search(s);
        }

        if s.popup_deadline.as_ref().is_some_and(|(d, _)| now >= *d) {
            let (_, popup) = s.popup_deadline.take().unwrap();
            tracing::debug!(label = %popup.label, "popup opened");
            s.map.popup = Some(popup);
        }
    }

    fn handle(&mut self, event: AppEvent) {
        let s = &mut self.state;

        // Help popup intercepts all events; only close keys pass through.
        if s.show_help {
            match event {
                AppEvent::Char('?') | AppEvent::Escape | AppEvent::Quit => {
                    tracing::debug!("help popup closed");
                    s.show_help = false;
                }
                _ => {}
            }
            return;
        }

        // Command mode intercepts all events.
        if s.focus == Focus::Command {
            match event {
                AppEvent::Escape => {
                    tracing::debug!("command bar cancelled");
                    s.command_bar.clear();
                    s.focus = s.prev_focus;
                }
                AppEvent::Enter => {
                    let input = s.command_bar.input.clone();
                    match Command::parse(&input) {
                        Ok(cmd) => {
                            tracing::debug!(command = ?cmd, "executing command");
                            s.command_bar.clear();
                            s.focus = s.prev_focus;
                            execute_command(s, cmd);
                        }
                        Err(msg) if msg.is_empty() => {
                            // Empty input — just close
                            s.command_bar.clear();
                            s.focus = s.prev_focus;
                        }
                        Err(msg) => {
                            // Show the error; bar stays open
                            s.command_bar.error = Some(msg);
                        }
                    }
                }
                other => s.command_bar.handle(&other),
            }
            return;
        }

        match event {
            // Toggle help (only when not typing in the search bar)
            AppEvent::Char('?') if s.focus != Focus::Search => {
                tracing::debug!("help popup opened");
                s.show_help = true;
            }

            // Enter command mode with `:` (not from the search bar)
            AppEvent::Char(':') if s.focus != Focus::Search => {
                tracing::debug!(prev_focus = ?s.focus, "entering command mode");
                s.prev_focus = s.focus;
                s.command_bar.clear();
                s.focus = Focus::Command;
            }

            AppEvent::Quit => {
                tracing::debug!("quit");
                s.quit = true;
            }

            // Close the popup, or return focus from the search bar
            AppEvent::Escape => {
                if s.map.popup.is_some() || s.popup_deadline.is_some() {
                    tracing::debug!("popup dismissed");
                    s.map.popup = None;
                    s.popup_deadline = None;
                } else if s.focus == Focus::Search {
                    tracing::debug!("focus: Search -> Layers");
                    s.focus = Focus::Layers;
                }
            }

            // Tab-cycle focus: Layers → Map → Search → Layers
            AppEvent::FocusNext => {
                let next = match s.focus {
                    Focus::Layers => Focus::Map,
                    Focus::Map => Focus::Search,
                    Focus::Search | Focus::Command => Focus::Layers,
                };
                tracing::debug!(from = ?s.focus, to = ?next, "focus cycle");
                s.focus = next;
            }

            // Jump to the search bar
            AppEvent::SearchFocus => {
                tracing::debug!("focus -> Search");
                s.focus = Focus::Search;
            }

            // Map-global controls work regardless of focus
            AppEvent::BasemapNext => s.map.next_basemap(),
            AppEvent::GridToggle => s.map.toggle_grid(),
            AppEvent::GridNext | AppEvent::GridPrev => s.map.handle(&event),
            AppEvent::ZoomIn | AppEvent::ZoomOut => s.map.handle(&event),
            AppEvent::FitVisible => fit_visible(s),

            // Terminal resize is handled automatically by ratatui
            AppEvent::Resize(_, _) => {}

            other => dispatch_to_focused(s, other),
        }
    }
}

/// Returns true when the current focus is on a text-input widget, meaning
/// alphabetic keys should produce characters rather than trigger shortcuts.
fn is_insert_mode(focus: Focus) -> bool {
    matches!(focus, Focus::Search | Focus::Command)
}

/// Route an event to the widget that owns the current focus.
fn dispatch_to_focused(s: &mut AppState, event: AppEvent) {
    match s.focus {
        Focus::Layers => s.tree.handle(&event),
        Focus::Map => s.map.handle(&event),
        Focus::Search => match event {
            AppEvent::Enter => select_search_hit(s),
            other => {
                if s.search.handle(&other) {
                    // Last call wins: every edit replaces the pending run
                    s.search_deadline = Some(
                        Instant::now() + Duration::from_millis(s.config.search.debounce_ms),
                    );
                }
            }
        },
        Focus::Command => {} // handled before dispatch, should not reach here
    }
}

/// Run the matcher for the current query. Called only after the debounce
/// quiet period.
fn run_search(s: &mut AppState) {
    let min_chars = s.config.search.min_query_chars;
    if normalize(&s.search.query).chars().count() < min_chars {
        s.search.set_results(Vec::new());
        return;
    }
    let results = s
        .index
        .search_limited(&s.search.query, s.config.search.max_results)
        .into_iter()
        .cloned()
        .collect();
    s.search.set_results(results);
}

/// Zoom/focus the map on the highlighted search hit, and schedule its
/// attribute popup so it opens after the transition settles.
fn select_search_hit(s: &mut AppState) {
    let Some(entry) = s.search.selected_entry().cloned() else {
        return;
    };
    let Some(feature) = s.registry.feature(entry.handle) else {
        return;
    };

    tracing::debug!(name = %entry.display_name, layer = %entry.source_layer, "search hit selected");
    let geometry = feature.geometry;
    s.map.focus(&geometry);
    s.map.highlight = Some(entry.handle);
    s.map.popup = None;
    s.popup_deadline = Some((
        Instant::now() + Duration::from_millis(s.config.search.popup_delay_ms),
        PopupState { handle: entry.handle, label: entry.display_name },
    ));
    s.focus = Focus::Map;
}

/// Fit the viewport to every layer whose checkbox is on. No visible layers,
/// no change.
pub fn fit_visible(s: &mut AppState) {
    let visible = s.tree.visible_layers();
    if let Some(bounds) = s
        .registry
        .bounds_where(|l| visible.iter().any(|v| v == &l.name))
    {
        s.map.viewport = bounds.pad(0.05, 0.02);
        tracing::debug!(viewport = ?s.map.viewport, "fitted to visible layers");
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn draw(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    // Vertical: 1-line basemap bar | body | 3-line search bar
    let vert = Layout::default()
        .direction(LayoutDir::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .split(area);

    frame.render_widget(
        BasemapBar::new(&state.map.basemaps, state.map.active_basemap, &state.theme),
        vert[0],
    );

    // Below the collapse threshold the layer pane gives way to the map
    let collapsed = area.width < state.config.ui.collapse_below_cols;
    let map_area = if collapsed {
        vert[1]
    } else {
        let pct = state.config.ui.layer_pane_width_pct;
        let horiz = Layout::default()
            .direction(LayoutDir::Horizontal)
            .constraints([Constraint::Percentage(pct), Constraint::Fill(1)])
            .split(vert[1]);
        frame.render_widget(
            LayerTree::new(&state.tree, state.focus == Focus::Layers, &state.theme),
            horiz[0],
        );
        horiz[1]
    };

    let visible = state.tree.visible_layers();
    let attribution = if state.config.ui.show_attribution {
        Some(format!("© {}", state.map.basemap().name))
    } else {
        None
    };
    frame.render_widget(
        MapView::new(
            &state.map,
            &state.registry,
            &visible,
            state.focus == Focus::Map,
            &state.theme,
            attribution.as_deref(),
        ),
        map_area,
    );

    frame.render_widget(
        SearchBar::new(&state.search, state.focus == Focus::Search, &state.theme),
        vert[2],
    );

    // Result list floats above the search bar while it has focus
    if state.focus == Focus::Search {
        let results = SearchResults::new(&state.search, &state.theme);
        if let Some(overlay) = results.overlay_area(vert[2]) {
            frame.render_widget(results, overlay);
        }
    }

    if state.show_help {
        frame.render_widget(
            HelpPopup::new(&state.title, state.generated, &state.theme),
            area,
        );
    }

    // Command bar overlays the bottom row of the screen
    if state.focus == Focus::Command {
        let cmd_area = Rect { y: area.bottom() - 1, height: 1, ..area };
        frame.render_widget(CommandBar::new(&state.command_bar, &state.theme), cmd_area);
        let col = state.command_bar.cursor_col(cmd_area);
        frame.set_cursor_position((col, cmd_area.y));
        return; // cursor is set; skip search-bar cursor below
    }

    // Position the terminal cursor when the search bar is focused
    if state.focus == Focus::Search {
        let sb = SearchBar::new(&state.search, true, &state.theme);
        let (cx, cy) = sb.cursor_position(vert[2]);
        frame.set_cursor_position((cx, cy));
    }
}

// ---------------------------------------------------------------------------
// Terminal helpers
// ---------------------------------------------------------------------------

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original(info);
    }));
}
