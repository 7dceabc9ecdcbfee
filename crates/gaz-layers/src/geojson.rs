//! GeoJSON layer adapter — parses an exported `FeatureCollection` file into
//! [`gaz_core::Feature`] values.
//!
//! Only what the viewer needs survives parsing: the attribute map and a
//! reduced geometry (a point position, or the bounding box of everything
//! else). Features the viewer cannot act on — no geometry, no coordinates —
//! are dropped.

use std::collections::HashMap;
use std::path::Path;

use gaz_core::{Bounds, Feature, Geometry};
use serde::Deserialize;
use thiserror::Error;

/// Why a layer file could not be loaded.
#[derive(Debug, Error)]
pub enum LayerError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// Raw (serde) types — mirror the GeoJSON structure
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawCollection {
    #[serde(default)]
    features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    #[serde(default)]
    properties: Option<HashMap<String, serde_json::Value>>,
    #[serde(default)]
    geometry: Option<RawGeometry>,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    coordinates: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Read and parse one layer file.
pub fn load_features(path: &Path) -> Result<Vec<Feature>, LayerError> {
    let text = std::fs::read_to_string(path).map_err(|source| LayerError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let collection: RawCollection =
        serde_json::from_str(&text).map_err(|source| LayerError::Parse {
            path: path.display().to_string(),
            source,
        })?;
    Ok(features_from_collection(collection))
}

/// Parse a `FeatureCollection` from a JSON string.
pub fn parse_features(text: &str) -> Result<Vec<Feature>, serde_json::Error> {
    let collection: RawCollection = serde_json::from_str(text)?;
    Ok(features_from_collection(collection))
}

fn features_from_collection(collection: RawCollection) -> Vec<Feature> {
    collection
        .features
        .into_iter()
        .filter_map(|raw| {
            let geometry = raw.geometry.as_ref().and_then(reduce_geometry)?;
            let mut feature = Feature::new(geometry);
            if let Some(props) = raw.properties {
                feature.properties = props;
            }
            Some(feature)
        })
        .collect()
}

/// Reduce a raw GeoJSON geometry to the viewer's model.
///
/// `Point` keeps its position; `LineString`/`MultiLineString` become
/// [`Geometry::Line`] over their bounds; everything else with coordinates
/// becomes [`Geometry::Area`] over its bounds. Geometries whose coordinates
/// hold no positions yield `None` and the feature is dropped.
fn reduce_geometry(raw: &RawGeometry) -> Option<Geometry> {
    match raw.ty.as_str() {
        "Point" => {
            let (lon, lat) = position(&raw.coordinates)?;
            Some(Geometry::Point { lon, lat })
        }
        "LineString" | "MultiLineString" => coordinate_bounds(&raw.coordinates).map(Geometry::Line),
        _ => coordinate_bounds(&raw.coordinates).map(Geometry::Area),
    }
}

/// A `[lon, lat, ...]` position, if this value is one.
fn position(value: &serde_json::Value) -> Option<(f64, f64)> {
    let arr = value.as_array()?;
    match (arr.first()?.as_f64(), arr.get(1)?.as_f64()) {
        (Some(lon), Some(lat)) => Some((lon, lat)),
        _ => None,
    }
}

/// Bounds of every position in an arbitrarily nested coordinate array.
///
/// GeoJSON nests coordinates one level deeper per geometry rank (LineString:
/// positions, Polygon: rings of positions, MultiPolygon: …); walking the
/// value tree handles every rank with one traversal.
fn coordinate_bounds(value: &serde_json::Value) -> Option<Bounds> {
    if let Some((lon, lat)) = position(value) {
        return Some(Bounds::from_point(lon, lat));
    }
    let arr = value.as_array()?;
    let mut acc: Option<Bounds> = None;
    for item in arr {
        if let Some(b) = coordinate_bounds(item) {
            acc = Some(match acc {
                Some(prev) => prev.merge(&b),
                None => b,
            });
        }
    }
    acc
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn point_feature_parses() {
        let text = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature",
             "properties":{"name":"Wuse Market"},
             "geometry":{"type":"Point","coordinates":[7.4655,9.0765]}}
        ]}"#;
        let features = parse_features(text).unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(
            features[0].geometry,
            Geometry::Point { lon: 7.4655, lat: 9.0765 }
        );
        assert_eq!(
            features[0].property("name"),
            Some(&serde_json::json!("Wuse Market"))
        );
    }

    #[test]
    fn linestring_reduces_to_line_bounds() {
        let text = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"name":"Nyanya-Karshi Road"},
             "geometry":{"type":"LineString",
                         "coordinates":[[7.55,8.98],[7.60,9.02],[7.58,9.05]]}}
        ]}"#;
        let features = parse_features(text).unwrap();
        assert_eq!(
            features[0].geometry,
            Geometry::Line(Bounds { west: 7.55, south: 8.98, east: 7.60, north: 9.05 })
        );
    }

    #[test]
    fn multipolygon_reduces_to_area_bounds() {
        let text = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{},
             "geometry":{"type":"MultiPolygon",
                         "coordinates":[[[[7.0,9.0],[7.2,9.0],[7.2,9.1],[7.0,9.0]]],
                                        [[[7.4,9.2],[7.5,9.2],[7.5,9.3],[7.4,9.2]]]]}}
        ]}"#;
        let features = parse_features(text).unwrap();
        assert_eq!(
            features[0].geometry,
            Geometry::Area(Bounds { west: 7.0, south: 9.0, east: 7.5, north: 9.3 })
        );
    }

    #[test]
    fn geometryless_feature_is_dropped() {
        let text = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"name":"orphan"},"geometry":null},
            {"type":"Feature","properties":{"name":"kept"},
             "geometry":{"type":"Point","coordinates":[7.4,9.0]}}
        ]}"#;
        let features = parse_features(text).unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].property("name"), Some(&serde_json::json!("kept")));
    }

    #[test]
    fn empty_coordinates_drop_the_feature() {
        let text = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{},
             "geometry":{"type":"LineString","coordinates":[]}}
        ]}"#;
        assert!(parse_features(text).unwrap().is_empty());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(parse_features("not geojson").is_err());
    }
}
