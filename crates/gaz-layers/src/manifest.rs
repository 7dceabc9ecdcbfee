//! Map manifest — the `map.toml` file a GIS export tool writes next to its
//! GeoJSON layers.
//!
//! The manifest is the only input configuration the viewer consumes: which
//! files are layers, which attribute fields are searchable, how layers group
//! into categories, which basemaps exist, and which layer (if any) is the
//! navigation grid.

use std::path::Path;

use chrono::{DateTime, Utc};
use gaz_core::SearchConfig;
use serde::Deserialize;

/// One overlay layer named by the manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct LayerSpec {
    pub name: String,
    /// GeoJSON file path, relative to the export directory.
    pub file: String,
    /// Category label the layer's checkbox appears under.
    #[serde(default = "default_category")]
    pub category: String,
    /// Whether the layer is on the map at startup.
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Ordered attribute fields to index for text search. Empty means the
    /// layer is not searchable.
    #[serde(default)]
    pub search_fields: Vec<String>,
}

fn default_category() -> String {
    "Overlays".to_string()
}

fn default_visible() -> bool {
    true
}

/// One selectable basemap. `style` names a background style in the theme
/// (`streets`, `satellite`, `dark`, …).
#[derive(Debug, Clone, Deserialize)]
pub struct BasemapSpec {
    pub name: String,
    #[serde(default)]
    pub style: String,
}

/// `[grid]` section — the designated grid layer, if the export has one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GridSpec {
    pub layer: Option<String>,
}

/// Parsed `map.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct MapManifest {
    #[serde(default = "default_title")]
    pub title: String,
    /// RFC 3339 export timestamp stamped by the export tool, if present.
    #[serde(default)]
    pub generated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub layers: Vec<LayerSpec>,
    #[serde(default)]
    pub basemaps: Vec<BasemapSpec>,
    #[serde(default)]
    pub grid: GridSpec,
}

fn default_title() -> String {
    "map".to_string()
}

impl MapManifest {
    /// Load and parse a manifest file. A missing or unparseable manifest is
    /// an error — there is no map without one.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from(path).format(config::FileFormat::Toml))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Parse a manifest from a TOML string (tests, embedded fixtures).
    pub fn from_toml_str(src: &str) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(src, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Derive the index builder's configuration: every layer with at least
    /// one search field, in manifest order.
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig::from_pairs(
            self.layers
                .iter()
                .filter(|l| !l.search_fields.is_empty())
                .map(|l| (l.name.clone(), l.search_fields.clone())),
        )
    }

    /// Distinct category labels in first-appearance order.
    pub fn categories(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for layer in &self.layers {
            if !out.contains(&layer.category.as_str()) {
                out.push(&layer.category);
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
