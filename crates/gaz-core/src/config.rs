//! Configuration types for gaz.
//!
//! [`Config::load`] reads `~/.config/gaz/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::defaults`] returns
//! the same defaults without touching the filesystem (useful in tests).

use serde::Deserialize;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[ui]
layer_pane_width_pct = 28
collapse_below_cols  = 70
show_attribution     = true

[search]
debounce_ms     = 250
popup_delay_ms  = 400
max_results     = 10
min_query_chars = 2

[keybindings]
search_focus = "/"
basemap_next = "b"
grid_toggle  = "g"
zoom_in      = "+"
zoom_out     = "-"
fit_visible  = "F"
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration, loaded from `~/.config/gaz/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub search: SearchTuning,
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

/// `[ui]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_layer_pane_width_pct")]
    pub layer_pane_width_pct: u16,
    /// Below this terminal width the layer pane is not rendered at all.
    #[serde(default = "default_collapse_below_cols")]
    pub collapse_below_cols: u16,
    #[serde(default = "default_show_attribution")]
    pub show_attribution: bool,
}

fn default_layer_pane_width_pct() -> u16 { 28 }
fn default_collapse_below_cols() -> u16 { 70 }
fn default_show_attribution() -> bool { true }

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            layer_pane_width_pct: default_layer_pane_width_pct(),
            collapse_below_cols: default_collapse_below_cols(),
            show_attribution: default_show_attribution(),
        }
    }
}

/// `[search]` section of `config.toml` — timing and result shaping for the
/// interactive search flow.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchTuning {
    /// Quiet period after the last keystroke before the matcher runs.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Delay between zooming to a selected hit and opening its popup.
    #[serde(default = "default_popup_delay_ms")]
    pub popup_delay_ms: u64,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,
}

fn default_debounce_ms() -> u64 { 250 }
fn default_popup_delay_ms() -> u64 { 400 }
fn default_max_results() -> usize { crate::search::DEFAULT_MAX_RESULTS }
fn default_min_query_chars() -> usize { crate::search::MIN_QUERY_CHARS }

impl Default for SearchTuning {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            popup_delay_ms: default_popup_delay_ms(),
            max_results: default_max_results(),
            min_query_chars: default_min_query_chars(),
        }
    }
}

/// `[keybindings]` section of `config.toml`. Single-character bindings only;
/// structural keys (Tab, Escape, Enter, arrows) are fixed.
#[derive(Debug, Clone, Deserialize)]
pub struct KeybindingsConfig {
    #[serde(default = "default_search_focus")]
    pub search_focus: String,
    #[serde(default = "default_basemap_next")]
    pub basemap_next: String,
    #[serde(default = "default_grid_toggle")]
    pub grid_toggle: String,
    #[serde(default = "default_zoom_in")]
    pub zoom_in: String,
    #[serde(default = "default_zoom_out")]
    pub zoom_out: String,
    #[serde(default = "default_fit_visible")]
    pub fit_visible: String,
}

fn default_search_focus() -> String { "/".to_string() }
fn default_basemap_next() -> String { "b".to_string() }
fn default_grid_toggle() -> String { "g".to_string() }
fn default_zoom_in() -> String { "+".to_string() }
fn default_zoom_out() -> String { "-".to_string() }
fn default_fit_visible() -> String { "F".to_string() }

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            search_focus: default_search_focus(),
            basemap_next: default_basemap_next(),
            grid_toggle: default_grid_toggle(),
            zoom_in: default_zoom_in(),
            zoom_out: default_zoom_out(),
            fit_visible: default_fit_visible(),
        }
    }
}

impl KeybindingsConfig {
    /// First character of a configured binding, or `fallback` when the value
    /// is empty. Extra characters are ignored.
    pub fn char_or(&self, value: &str, fallback: char) -> char {
        value.chars().next().unwrap_or(fallback)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/gaz/config.toml`, layered on top of the built-in
    /// defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path.as_path()).required(false))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("gaz")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load() {
        let cfg = Config::defaults();
        assert_eq!(cfg.ui.layer_pane_width_pct, 28);
        assert_eq!(cfg.search.max_results, 10);
        assert_eq!(cfg.search.min_query_chars, 2);
        assert_eq!(cfg.keybindings.search_focus, "/");
        assert_eq!(cfg.keybindings.basemap_next, "b");
    }

    #[test]
    fn char_or_falls_back_on_empty() {
        let kb = KeybindingsConfig::default();
        assert_eq!(kb.char_or(&kb.grid_toggle, 'x'), 'g');
        assert_eq!(kb.char_or("", 'x'), 'x');
    }
}
