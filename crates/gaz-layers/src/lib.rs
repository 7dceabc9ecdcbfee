//! gaz-layers — map export loading for gaz.
//!
//! A map export is a directory holding a `map.toml` manifest plus one
//! GeoJSON `FeatureCollection` file per overlay layer. This crate reads the
//! manifest, loads every layer it names into [`gaz_core::LayerRegistry`],
//! and derives the [`gaz_core::SearchConfig`] for the index builder.
//!
//! Loading is best-effort: a missing or malformed layer file is logged and
//! skipped, never fatal. Only a missing manifest aborts startup.

pub mod geojson;
pub mod manifest;

use std::path::Path;

use gaz_core::{Layer, LayerRegistry};
use manifest::MapManifest;

/// Everything loaded from a map export directory.
#[derive(Debug, Clone)]
pub struct MapExport {
    pub manifest: MapManifest,
    pub registry: LayerRegistry,
}

/// Load a map export directory: manifest first, then each layer it names.
///
/// Layers that fail to read or parse are skipped with a warning so the rest
/// of the map still works. The registry preserves manifest layer order.
pub fn load_export(dir: &Path) -> anyhow::Result<MapExport> {
    let manifest = MapManifest::load(&dir.join("map.toml"))?;

    let mut layers = Vec::new();
    for spec in &manifest.layers {
        let path = dir.join(&spec.file);
        match geojson::load_features(&path) {
            Ok(features) => {
                tracing::debug!(layer = %spec.name, count = features.len(), "layer loaded");
                let mut layer = Layer::new(spec.name.clone(), features);
                layer.visible = spec.visible;
                layers.push(layer);
            }
            Err(err) => {
                tracing::warn!(layer = %spec.name, path = %path.display(), %err, "skipping layer");
            }
        }
    }

    Ok(MapExport { manifest, registry: LayerRegistry::new(layers) })
}
