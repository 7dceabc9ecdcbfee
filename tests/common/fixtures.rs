//! Static fixtures used across harnesses: a small municipal map export
//! (manifest + GeoJSON layers) and a prebuilt registry of the same data.

use gaz_core::{LayerRegistry, SearchConfig, SearchIndex};

use super::builders::{district, registry_of, road, FeatureBuilder};

/// The manifest for the fixture export. Mirrors what a GIS export tool
/// writes next to its GeoJSON files.
pub const MANIFEST_TOML: &str = r#"
title = "Abuja municipal map"
generated = "2025-11-02T14:30:00Z"

[[basemaps]]
name = "OpenStreetMap"
style = "streets"

[[basemaps]]
name = "Esri Satellite"
style = "satellite"

[[layers]]
name = "markets"
file = "markets.geojson"
category = "Points of interest"
search_fields = ["name", "ward"]

[[layers]]
name = "roads"
file = "roads.geojson"
category = "Transport"
search_fields = ["name"]

[[layers]]
name = "districts"
file = "districts.geojson"
category = "Boundaries"
visible = false
search_fields = ["name"]

[[layers]]
name = "grid"
file = "grid.geojson"
category = "Reference"
visible = false

[grid]
layer = "grid"
"#;

pub const MARKETS_GEOJSON: &str = r#"{"type":"FeatureCollection","features":[
  {"type":"Feature","properties":{"name":"Wuse Market","ward":"Wuse"},
   "geometry":{"type":"Point","coordinates":[7.4655,9.0765]}},
  {"type":"Feature","properties":{"name":"Garki Market","ward":"Garki"},
   "geometry":{"type":"Point","coordinates":[7.4893,9.0338]}},
  {"type":"Feature","properties":{"name":"Nyanya Market","ward":"Nyanya"},
   "geometry":{"type":"Point","coordinates":[7.5706,8.9917]}}
]}"#;

pub const ROADS_GEOJSON: &str = r#"{"type":"FeatureCollection","features":[
  {"type":"Feature","properties":{"name":"Nyanya-Karshi Road"},
   "geometry":{"type":"LineString","coordinates":[[7.5706,8.9917],[7.6402,8.9561]]}},
  {"type":"Feature","properties":{"name":"Ahmadu Bello Way"},
   "geometry":{"type":"LineString","coordinates":[[7.4787,9.0260],[7.4951,9.0821]]}}
]}"#;

pub const DISTRICTS_GEOJSON: &str = r#"{"type":"FeatureCollection","features":[
  {"type":"Feature","properties":{"name":"Wuse II"},
   "geometry":{"type":"Polygon",
               "coordinates":[[[7.4550,9.0700],[7.4780,9.0700],[7.4780,9.0900],[7.4550,9.0900],[7.4550,9.0700]]]}},
  {"type":"Feature","properties":{"name":"Maitama"},
   "geometry":{"type":"Polygon",
               "coordinates":[[[7.4850,9.0750],[7.5150,9.0750],[7.5150,9.1050],[7.4850,9.1050],[7.4850,9.0750]]]}}
]}"#;

pub const GRID_GEOJSON: &str = r#"{"type":"FeatureCollection","features":[
  {"type":"Feature","properties":{"cell":"A1"},
   "geometry":{"type":"Polygon",
               "coordinates":[[[7.40,9.00],[7.50,9.00],[7.50,9.10],[7.40,9.10],[7.40,9.00]]]}},
  {"type":"Feature","properties":{"cell":"A2"},
   "geometry":{"type":"Polygon",
               "coordinates":[[[7.50,9.00],[7.60,9.00],[7.60,9.10],[7.50,9.10],[7.50,9.00]]]}}
]}"#;

/// The fixture registry, built in-process (no files).
pub fn abuja_registry() -> LayerRegistry {
    registry_of(vec![
        (
            "markets",
            vec![
                FeatureBuilder::point(7.4655, 9.0765)
                    .prop("name", "Wuse Market")
                    .prop("ward", "Wuse")
                    .build(),
                FeatureBuilder::point(7.4893, 9.0338)
                    .prop("name", "Garki Market")
                    .prop("ward", "Garki")
                    .build(),
                FeatureBuilder::point(7.5706, 8.9917)
                    .prop("name", "Nyanya Market")
                    .prop("ward", "Nyanya")
                    .build(),
            ],
        ),
        (
            "roads",
            vec![
                road("Nyanya-Karshi Road", 7.5706, 8.9561, 7.6402, 8.9917),
                road("Ahmadu Bello Way", 7.4787, 9.0260, 7.4951, 9.0821),
            ],
        ),
        (
            "districts",
            vec![
                district("Wuse II", 7.4550, 9.0700, 7.4780, 9.0900),
                district("Maitama", 7.4850, 9.0750, 7.5150, 9.1050),
            ],
        ),
    ])
}

/// Search config matching [`abuja_registry`]: the `name` field of each layer.
pub fn abuja_search_config() -> SearchConfig {
    super::builders::name_fields(&["markets", "roads", "districts"])
}

/// Index over the fixture registry.
pub fn abuja_index(registry: &LayerRegistry) -> SearchIndex {
    SearchIndex::build(registry, &abuja_search_config())
}
