//! gaz — terminal gazetteer and viewer for GIS map exports.
//!
//! A map export is a directory of GeoJSON overlay layers plus a `map.toml`
//! manifest describing layers, categories, searchable fields, basemaps, and
//! an optional navigation grid. gaz renders the layers in a terminal map
//! pane and layers search, filtering, and grid navigation on top.
//!
//! # Architecture
//!
//! ```text
//! gaz-layers ──► LayerRegistry ──► gaz-core (index/search) ──► gaz-tui
//!                    │                                           │
//!                    └──────────── MapManifest ──────────────────┘
//! ```
//!
//! The three layers are separate crates so integration tests and benches can
//! import them directly; this crate re-exports the pieces they share.

pub use gaz_core::{
    normalize, Bounds, Feature, FeatureHandle, Geometry, Layer, LayerRegistry, SearchConfig,
    SearchEntry, SearchIndex,
};
pub use gaz_layers::{load_export, manifest::MapManifest, MapExport};
