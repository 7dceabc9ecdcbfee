//! Index builder — turns configured layer attributes into a flat list of
//! [`SearchEntry`](crate::SearchEntry) values.
//!
//! The index is built once at startup from whatever layers actually loaded
//! and is immutable afterwards; there are no incremental updates. Layers or
//! fields named by the configuration but absent from the registry are
//! skipped without error — the index is best-effort over the data present.

use crate::normalize::normalize;
use crate::types::{FeatureHandle, LayerRegistry, SearchEntry};

/// Which attribute fields of which layers are searchable, in order.
///
/// Ordering is significant: entries are emitted in config layer order, then
/// feature order within the layer, then field order — so two builds over the
/// same registry yield byte-identical indexes.
#[derive(Debug, Clone, Default)]
pub struct SearchConfig {
    pub layers: Vec<LayerFields>,
}

/// Ordered searchable fields for one named layer.
#[derive(Debug, Clone)]
pub struct LayerFields {
    pub layer: String,
    pub fields: Vec<String>,
}

impl SearchConfig {
    /// Convenience constructor for tests and small configs.
    pub fn from_pairs<L, F>(pairs: impl IntoIterator<Item = (L, Vec<F>)>) -> Self
    where
        L: Into<String>,
        F: Into<String>,
    {
        Self {
            layers: pairs
                .into_iter()
                .map(|(layer, fields)| LayerFields {
                    layer: layer.into(),
                    fields: fields.into_iter().map(Into::into).collect(),
                })
                .collect(),
        }
    }
}

/// Flat, ordered, immutable sequence of search entries.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    entries: Vec<SearchEntry>,
}

impl SearchIndex {
    /// Build the index from a registry and a search configuration.
    ///
    /// For every configured layer present in the registry, for every feature
    /// in that layer, for every configured field present and non-empty on
    /// that feature, one entry is emitted. Everything else is skipped.
    pub fn build(registry: &LayerRegistry, config: &SearchConfig) -> Self {
        let mut entries = Vec::new();

        for layer_fields in &config.layers {
            let Some(layer_idx) = registry.layer_index(&layer_fields.layer) else {
                continue;
            };
            let layer = &registry.layers()[layer_idx];

            for (feature_idx, feature) in layer.features.iter().enumerate() {
                for field in &layer_fields.fields {
                    let Some(value) = feature.property(field) else {
                        continue;
                    };
                    let Some(display_name) = value_text(value) else {
                        continue;
                    };
                    entries.push(SearchEntry {
                        normalized_name: normalize(&display_name),
                        display_name,
                        handle: FeatureHandle { layer: layer_idx, feature: feature_idx },
                        source_layer: layer.name.clone(),
                        source_field: field.clone(),
                    });
                }
            }
        }

        Self { entries }
    }

    pub fn entries(&self) -> &[SearchEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Stringify an attribute value into searchable text.
///
/// Strings index verbatim (empty ones are skipped); numbers and booleans
/// stringify. Null, arrays, and objects are not meaningful search text and
/// yield `None`.
fn value_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
