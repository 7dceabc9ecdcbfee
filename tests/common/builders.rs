//! Test builders — ergonomic constructors for features, layers, registries,
//! and search configs.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning
//! `Result`.

use gaz_core::{Bounds, Feature, Geometry, Layer, LayerRegistry, SearchConfig};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// FeatureBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Feature`] test fixtures.
///
/// # Example
///
/// ```rust
/// let feature = FeatureBuilder::point(7.4655, 9.0765)
///     .prop("name", "Wuse Market")
///     .prop("ward", "Wuse")
///     .build();
/// ```
pub struct FeatureBuilder {
    properties: HashMap<String, serde_json::Value>,
    geometry: Geometry,
}

impl FeatureBuilder {
    pub fn point(lon: f64, lat: f64) -> Self {
        Self {
            properties: HashMap::new(),
            geometry: Geometry::Point { lon, lat },
        }
    }

    pub fn line(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            properties: HashMap::new(),
            geometry: Geometry::Line(Bounds { west, south, east, north }),
        }
    }

    pub fn area(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            properties: HashMap::new(),
            geometry: Geometry::Area(Bounds { west, south, east, north }),
        }
    }

    pub fn prop(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> Feature {
        let mut feature = Feature::new(self.geometry);
        feature.properties = self.properties;
        feature
    }
}

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

/// Build a named point feature (POI marker).
pub fn poi(name: &str, lon: f64, lat: f64) -> Feature {
    FeatureBuilder::point(lon, lat).prop("name", name).build()
}

/// Build a named line feature (road).
pub fn road(name: &str, west: f64, south: f64, east: f64, north: f64) -> Feature {
    FeatureBuilder::line(west, south, east, north)
        .prop("name", name)
        .build()
}

/// Build a named area feature (district).
pub fn district(name: &str, west: f64, south: f64, east: f64, north: f64) -> Feature {
    FeatureBuilder::area(west, south, east, north)
        .prop("name", name)
        .build()
}

/// Build a registry from `(layer name, features)` pairs, all visible.
pub fn registry_of(layers: Vec<(&str, Vec<Feature>)>) -> LayerRegistry {
    LayerRegistry::new(
        layers
            .into_iter()
            .map(|(name, features)| Layer::new(name, features))
            .collect(),
    )
}

/// A search config indexing the `name` field of each given layer, in order.
pub fn name_fields(layers: &[&str]) -> SearchConfig {
    SearchConfig::from_pairs(layers.iter().map(|l| (*l, vec!["name"])))
}
