//! gaz-core — core library for gaz.
//!
//! This crate owns the data model of a loaded map export and the one piece
//! of real data flow in the application: the text search pipeline.
//!
//! # Architecture
//!
//! ```text
//! LayerRegistry ──► SearchIndex ──► matcher ──► UI
//!       ▲
//!   gaz-layers (manifest + GeoJSON loading)
//! ```
//!
//! The registry is built once per run and owns every feature; the index
//! holds handles into it and is immutable after construction. Everything in
//! this crate is synchronous and side-effect-free past config loading.

pub mod config;
pub mod index;
pub mod normalize;
pub mod search;
pub mod types;

pub use index::{LayerFields, SearchConfig, SearchIndex};
pub use normalize::normalize;
pub use types::{Bounds, Feature, FeatureHandle, Geometry, Layer, LayerRegistry, SearchEntry};
