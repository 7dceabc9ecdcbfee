//! Colour theme for the gaz TUI.
//!
//! Themes are defined as TOML files. The default theme is embedded in the
//! binary via [`include_str!`] so the application works without any files on
//! disk. Call [`Theme::load_default`] at startup and pass the result through
//! the application as a shared reference.
//!
//! # Colour assignment for layers
//!
//! Layer names are hashed to a stable index into the palette so the same
//! layer always gets the same colour within a session, regardless of the
//! order in which layers load.

use std::collections::HashMap;

use config::{Config, File, FileFormat};
use gaz_core::Geometry;
use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

const DEFAULT_THEME_SRC: &str = include_str!("themes/default.toml");
const GRUVBOX_DARK_THEME_SRC: &str = include_str!("themes/gruvbox_dark.toml");

// ---------------------------------------------------------------------------
// Raw (serde) types — mirror the TOML structure
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawStyle {
    fg: Option<String>,
    bg: Option<String>,
    #[serde(default)]
    bold: bool,
    #[serde(default)]
    dim: bool,
    #[serde(default)]
    italic: bool,
    #[serde(default)]
    underlined: bool,
}

impl RawStyle {
    fn into_style(self) -> Style {
        let mut style = Style::default();
        if let Some(ref s) = self.fg {
            if let Some(c) = parse_color(s) {
                style = style.fg(c);
            }
        }
        if let Some(ref s) = self.bg {
            if let Some(c) = parse_color(s) {
                style = style.bg(c);
            }
        }
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.dim {
            style = style.add_modifier(Modifier::DIM);
        }
        if self.italic {
            style = style.add_modifier(Modifier::ITALIC);
        }
        if self.underlined {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        style
    }
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    point: RawStyle,
    line: RawStyle,
    area: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawBorders {
    focused: RawStyle,
    command_bar: RawStyle,
    unfocused: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawSearch {
    highlight: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawGrid {
    cell: RawStyle,
    highlight: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawLayers {
    palette: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawTheme {
    geometry: RawGeometry,
    borders: RawBorders,
    search: RawSearch,
    grid: RawGrid,
    layers: RawLayers,
    #[serde(default)]
    basemaps: HashMap<String, RawStyle>,
}

// ---------------------------------------------------------------------------
// Public Theme type
// ---------------------------------------------------------------------------

/// Application colour theme.
///
/// Load once at startup with [`Theme::load_default`] and pass as a shared
/// reference throughout the TUI. All styles are pre-resolved ratatui
/// [`Style`] values — no allocation at render time.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Styles for each geometry kind.
    pub geometry_point: Style,
    pub geometry_line: Style,
    pub geometry_area: Style,

    /// Border style for the currently focused pane.
    pub border_focused: Style,
    /// Border style for the command bar pane.
    pub border_command_bar: Style,
    /// Border style for unfocused panes.
    pub border_unfocused: Style,

    /// Highlight applied to the selected search hit on the map.
    pub search_highlight: Style,

    /// Grid cell outline and grid cursor styles.
    pub grid_cell: Style,
    pub grid_highlight: Style,

    /// Ordered colour palette used for layer colour cycling.
    layer_palette: Vec<Color>,
    /// Background styles per basemap style tag.
    basemaps: HashMap<String, Style>,
}

impl Theme {
    /// Load and parse the embedded default theme.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed. The default theme is
    /// embedded via `include_str!`, so this should never happen in practice.
    pub fn load_default() -> Self {
        Self::from_toml_str(DEFAULT_THEME_SRC).expect("embedded default theme must be valid TOML")
    }

    /// Load and parse the embedded Gruvbox Dark theme.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed.
    pub fn load_gruvbox_dark() -> Self {
        Self::from_toml_str(GRUVBOX_DARK_THEME_SRC)
            .expect("embedded gruvbox dark theme must be valid TOML")
    }

    /// Parse a theme from a TOML string.
    ///
    /// Returns an error if the string cannot be deserialised into a valid
    /// theme. Unknown keys are ignored so user themes can be
    /// forward-compatible with future theme additions.
    pub fn from_toml_str(src: &str) -> anyhow::Result<Self> {
        let raw: RawTheme = Config::builder()
            .add_source(File::from_str(src, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        Ok(Self {
            geometry_point: raw.geometry.point.into_style(),
            geometry_line: raw.geometry.line.into_style(),
            geometry_area: raw.geometry.area.into_style(),
            border_focused: raw.borders.focused.into_style(),
            border_command_bar: raw.borders.command_bar.into_style(),
            border_unfocused: raw.borders.unfocused.into_style(),
            search_highlight: raw.search.highlight.into_style(),
            grid_cell: raw.grid.cell.into_style(),
            grid_highlight: raw.grid.highlight.into_style(),
            layer_palette: raw
                .layers
                .palette
                .iter()
                .filter_map(|s| parse_color(s))
                .collect(),
            basemaps: raw
                .basemaps
                .into_iter()
                .map(|(k, v)| (k, v.into_style()))
                .collect(),
        })
    }

    /// Return the [`Style`] for a geometry kind.
    pub fn geometry_style(&self, geometry: &Geometry) -> Style {
        match geometry {
            Geometry::Point { .. } => self.geometry_point,
            Geometry::Line(_) => self.geometry_line,
            Geometry::Area(_) => self.geometry_area,
        }
    }

    /// Return a stable [`Style`] for a layer name.
    ///
    /// The colour is determined by hashing the name and taking the result
    /// modulo the palette length. The same name always maps to the same
    /// colour within a session, regardless of load order.
    pub fn layer_style(&self, layer: &str) -> Style {
        if self.layer_palette.is_empty() {
            return Style::default();
        }
        let idx = stable_hash(layer) % self.layer_palette.len();
        Style::default().fg(self.layer_palette[idx])
    }

    /// Background style for a basemap style tag, or the default style when
    /// the tag is unknown to the theme.
    pub fn basemap_style(&self, style_tag: &str) -> Style {
        self.basemaps.get(style_tag).copied().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Simple djb2-style hash that is stable across Rust versions and process
/// restarts, making layer colour assignment deterministic.
fn stable_hash(s: &str) -> usize {
    s.bytes().fold(5381usize, |acc, b| {
        acc.wrapping_mul(31).wrapping_add(b as usize)
    })
}

/// Parse a colour name into a ratatui [`Color`].
///
/// Accepts:
/// - Named terminal colours (case-insensitive): `red`, `dark_gray`, etc.
/// - Hex RGB: `#rrggbb`
/// - 256-colour indexed: `indexed:N`
fn parse_color(s: &str) -> Option<Color> {
    match s.to_ascii_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "dark_gray" | "darkgray" | "dark_grey" | "darkgrey" => Some(Color::DarkGray),
        "light_red" => Some(Color::LightRed),
        "light_green" => Some(Color::LightGreen),
        "light_yellow" => Some(Color::LightYellow),
        "light_blue" => Some(Color::LightBlue),
        "light_magenta" => Some(Color::LightMagenta),
        "light_cyan" => Some(Color::LightCyan),
        "white" => Some(Color::White),
        s if s.starts_with('#') && s.len() == 7 => {
            let r = u8::from_str_radix(&s[1..3], 16).ok()?;
            let g = u8::from_str_radix(&s[3..5], 16).ok()?;
            let b = u8::from_str_radix(&s[5..7], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        s if s.starts_with("indexed:") => {
            let n: u8 = s["indexed:".len()..].parse().ok()?;
            Some(Color::Indexed(n))
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
