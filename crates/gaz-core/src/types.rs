//! Core types for gaz-core.
//!
//! This module defines the data structures shared across all layers: the
//! feature model loaded from a map export ([`Feature`], [`Layer`],
//! [`LayerRegistry`]) and the search-side view of it ([`SearchEntry`],
//! [`FeatureHandle`]).
//!
//! Ownership is one-directional: the registry owns every feature; the search
//! index holds [`FeatureHandle`] values and resolves them through the
//! registry on demand. Nothing downstream of the registry mutates a feature.

use std::collections::HashMap;

/// Geographic extent of a feature or of the map viewport, in degrees.
///
/// `west <= east` and `south <= north` for every bounds produced by this
/// crate; degenerate (zero-area) bounds are valid and arise from point
/// features.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl Bounds {
    /// A degenerate bounds containing exactly one position.
    pub fn from_point(lon: f64, lat: f64) -> Self {
        Self { west: lon, south: lat, east: lon, north: lat }
    }

    /// The smallest bounds containing both `self` and `other`.
    pub fn merge(&self, other: &Bounds) -> Bounds {
        Bounds {
            west: self.west.min(other.west),
            south: self.south.min(other.south),
            east: self.east.max(other.east),
            north: self.north.max(other.north),
        }
    }

    /// Extend to include a single position.
    pub fn include(&self, lon: f64, lat: f64) -> Bounds {
        self.merge(&Bounds::from_point(lon, lat))
    }

    /// Center position `(lon, lat)`.
    pub fn center(&self) -> (f64, f64) {
        ((self.west + self.east) / 2.0, (self.south + self.north) / 2.0)
    }

    /// Width and height in degrees.
    pub fn span(&self) -> (f64, f64) {
        (self.east - self.west, self.north - self.south)
    }

    /// Grow each side by `fraction` of the corresponding span. A zero-area
    /// bounds grows by `min_span` on each axis instead, so fitting the view
    /// to a point feature still yields a usable viewport.
    pub fn pad(&self, fraction: f64, min_span: f64) -> Bounds {
        let (w, h) = self.span();
        let dx = if w > 0.0 { w * fraction } else { min_span / 2.0 };
        let dy = if h > 0.0 { h * fraction } else { min_span / 2.0 };
        Bounds {
            west: self.west - dx,
            south: self.south - dy,
            east: self.east + dx,
            north: self.north + dy,
        }
    }

    /// True when the position falls inside (or on the edge of) the bounds.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.west && lon <= self.east && lat >= self.south && lat <= self.north
    }
}

/// Geometry of a map feature, reduced to what the viewer needs: a point to
/// center on, or an extent to fit the view to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    /// A single position (POI markers).
    Point { lon: f64, lat: f64 },
    /// A linear feature (roads, rivers), carried as its bounding box.
    Line(Bounds),
    /// An areal feature (districts, grid cells), carried as its bounding box.
    Area(Bounds),
}

impl Geometry {
    /// Bounds of the geometry. Points yield a degenerate bounds.
    pub fn bounds(&self) -> Bounds {
        match *self {
            Geometry::Point { lon, lat } => Bounds::from_point(lon, lat),
            Geometry::Line(b) | Geometry::Area(b) => b,
        }
    }

    pub fn is_point(&self) -> bool {
        matches!(self, Geometry::Point { .. })
    }
}

/// One feature from an overlay layer: an attribute map plus a geometry.
///
/// Attribute values keep their GeoJSON types (`serde_json::Value`); the
/// index builder decides which of them stringify into searchable text.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub properties: HashMap<String, serde_json::Value>,
    pub geometry: Geometry,
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self { properties: HashMap::new(), geometry }
    }

    /// Attribute value by name, if present.
    pub fn property(&self, name: &str) -> Option<&serde_json::Value> {
        self.properties.get(name)
    }
}

/// A named overlay layer: an ordered collection of features.
#[derive(Debug, Clone)]
pub struct Layer {
    pub name: String,
    /// Whether the layer is drawn on the map at startup. The layer tree's
    /// checkboxes are initialized from this flag.
    pub visible: bool,
    pub features: Vec<Feature>,
}

impl Layer {
    pub fn new(name: impl Into<String>, features: Vec<Feature>) -> Self {
        Self { name: name.into(), visible: true, features }
    }
}

/// Stable handle to one feature inside a [`LayerRegistry`].
///
/// Handles are plain indices; they stay valid because the registry is
/// append-only during load and frozen before the first query is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeatureHandle {
    pub layer: usize,
    pub feature: usize,
}

/// Ordered collection of loaded layers — the single owner of all features.
#[derive(Debug, Clone, Default)]
pub struct LayerRegistry {
    layers: Vec<Layer>,
}

impl LayerRegistry {
    pub fn new(layers: Vec<Layer>) -> Self {
        Self { layers }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Position of the layer named `name`, if loaded.
    pub fn layer_index(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.name == name)
    }

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layer_index(name).map(|i| &self.layers[i])
    }

    /// Resolve a handle back to its feature. Returns `None` for a handle
    /// that does not belong to this registry.
    pub fn feature(&self, handle: FeatureHandle) -> Option<&Feature> {
        self.layers.get(handle.layer)?.features.get(handle.feature)
    }

    /// Smallest bounds containing every feature of every layer for which
    /// `include` returns true. `None` when nothing matched.
    pub fn bounds_where(&self, include: impl Fn(&Layer) -> bool) -> Option<Bounds> {
        let mut acc: Option<Bounds> = None;
        for layer in &self.layers {
            if !include(layer) {
                continue;
            }
            for feature in &layer.features {
                let b = feature.geometry.bounds();
                acc = Some(match acc {
                    Some(prev) => prev.merge(&b),
                    None => b,
                });
            }
        }
        acc
    }
}

/// One indexed (field value, feature) pair.
///
/// `display_name` keeps the raw attribute text exactly as exported;
/// `normalized_name` is the matching form. `source_layer` and
/// `source_field` record provenance and feed the matcher's dedup key.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchEntry {
    pub display_name: String,
    pub normalized_name: String,
    pub handle: FeatureHandle,
    pub source_layer: String,
    pub source_field: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_takes_extremes() {
        let a = Bounds { west: 7.0, south: 9.0, east: 7.5, north: 9.2 };
        let b = Bounds { west: 7.2, south: 8.8, east: 7.8, north: 9.1 };
        let m = a.merge(&b);
        assert_eq!(m, Bounds { west: 7.0, south: 8.8, east: 7.8, north: 9.2 });
    }

    #[test]
    fn pad_grows_degenerate_bounds() {
        let b = Bounds::from_point(7.45, 9.05).pad(0.1, 0.02);
        let (w, h) = b.span();
        assert!(w > 0.0 && h > 0.0);
        assert!(b.contains(7.45, 9.05));
    }

    #[test]
    fn handle_resolves_to_feature() {
        let f = Feature::new(Geometry::Point { lon: 7.4, lat: 9.0 });
        let registry = LayerRegistry::new(vec![Layer::new("markets", vec![f.clone()])]);
        let handle = FeatureHandle { layer: 0, feature: 0 };
        assert_eq!(registry.feature(handle), Some(&f));
        assert_eq!(registry.feature(FeatureHandle { layer: 1, feature: 0 }), None);
    }

    #[test]
    fn bounds_where_filters_layers() {
        let near = Feature::new(Geometry::Point { lon: 7.0, lat: 9.0 });
        let far = Feature::new(Geometry::Point { lon: 10.0, lat: 12.0 });
        let registry = LayerRegistry::new(vec![
            Layer::new("a", vec![near]),
            Layer::new("b", vec![far]),
        ]);
        let only_a = registry.bounds_where(|l| l.name == "a").unwrap();
        assert_eq!(only_a, Bounds::from_point(7.0, 9.0));
        let all = registry.bounds_where(|_| true).unwrap();
        assert_eq!(all, Bounds { west: 7.0, south: 9.0, east: 10.0, north: 12.0 });
    }
}
