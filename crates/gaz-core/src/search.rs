//! Query matcher — answers text queries against a prebuilt
//! [`SearchIndex`](crate::SearchIndex).
//!
//! Matching is plain contiguous-substring containment over normalized text —
//! no token splitting, no edit distance. Results come back in index order,
//! deduplicated, and capped. The matcher is pure: the same query against the
//! same index always yields the same sequence.

use std::collections::HashSet;

use crate::index::SearchIndex;
use crate::normalize::normalize;
use crate::types::SearchEntry;

/// Default result cap.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Queries shorter than this (after normalization) return nothing; single
/// characters match too noisily to be useful.
pub const MIN_QUERY_CHARS: usize = 2;

impl SearchIndex {
    /// Search with the default result cap.
    pub fn search(&self, query: &str) -> Vec<&SearchEntry> {
        self.search_limited(query, DEFAULT_MAX_RESULTS)
    }

    /// Search, returning at most `max_results` entries.
    ///
    /// An entry matches when its normalized name contains the normalized
    /// query as a contiguous substring. Two matches sharing the same
    /// normalized display name and source layer are duplicates; the first in
    /// index order is kept. Queries normalizing to fewer than
    /// [`MIN_QUERY_CHARS`] characters yield an empty result.
    pub fn search_limited(&self, query: &str, max_results: usize) -> Vec<&SearchEntry> {
        let needle = normalize(query);
        if needle.chars().count() < MIN_QUERY_CHARS {
            return Vec::new();
        }

        let mut seen: HashSet<(&str, &str)> = HashSet::new();
        let mut out = Vec::new();

        for entry in self.entries() {
            if out.len() >= max_results {
                break;
            }
            if !entry.normalized_name.contains(&needle) {
                continue;
            }
            if seen.insert((entry.normalized_name.as_str(), entry.source_layer.as_str())) {
                out.push(entry);
            }
        }

        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::SearchConfig;
    use crate::types::{Feature, Geometry, Layer, LayerRegistry};
    use serde_json::json;

    fn named(name: &str) -> Feature {
        let mut f = Feature::new(Geometry::Point { lon: 7.45, lat: 9.05 });
        f.properties.insert("name".to_string(), json!(name));
        f
    }

    fn market_index(names: &[&str]) -> SearchIndex {
        let features = names.iter().map(|n| named(n)).collect();
        let registry = LayerRegistry::new(vec![Layer::new("markets", features)]);
        SearchIndex::build(&registry, &SearchConfig::from_pairs([("markets", vec!["name"])]))
    }

    #[test]
    fn two_char_query_matches() {
        let index = market_index(&["Nyanya Market"]);
        assert_eq!(index.search("ny").len(), 1);
    }

    #[test]
    fn one_char_query_is_empty() {
        let index = market_index(&["Nyanya Market"]);
        assert!(index.search("n").is_empty());
    }

    #[test]
    fn punctuation_only_query_is_empty() {
        // Normalizes to "" — below the threshold even though the raw string
        // is longer than two characters.
        let index = market_index(&["Nyanya Market"]);
        assert!(index.search("--!").is_empty());
    }

    #[test]
    fn substring_matches_anywhere() {
        let index = market_index(&["Nyanya-Karshi Road"]);
        assert_eq!(index.search("karshi").len(), 1);
        assert_eq!(index.search("nyanya karshi").len(), 1);
        assert!(index.search("karshi nyanya").is_empty());
    }

    #[test]
    fn separator_variants_dedupe_to_one() {
        let index = market_index(&["Nyanya Karshi Road", "NYANYA-KARSHI ROAD"]);
        let hits = index.search("karshi");
        assert_eq!(hits.len(), 1);
        // First occurrence in index order wins.
        assert_eq!(hits[0].display_name, "Nyanya Karshi Road");
    }

    #[test]
    fn same_name_on_different_layers_is_not_a_duplicate() {
        let registry = LayerRegistry::new(vec![
            Layer::new("markets", vec![named("Wuse")]),
            Layer::new("districts", vec![named("Wuse")]),
        ]);
        let config =
            SearchConfig::from_pairs([("markets", vec!["name"]), ("districts", vec!["name"])]);
        let index = SearchIndex::build(&registry, &config);
        assert_eq!(index.search("wuse").len(), 2);
    }

    #[test]
    fn results_come_back_in_index_order() {
        let index = market_index(&["Wuse Market", "Wuse II"]);
        let hits = index.search("wuse");
        let names: Vec<&str> = hits.iter().map(|e| e.display_name.as_str()).collect();
        assert_eq!(names, vec!["Wuse Market", "Wuse II"]);
    }

    #[test]
    fn cap_truncates_at_max_results() {
        let names: Vec<String> = (0..25).map(|i| format!("Stall {i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let index = market_index(&refs);
        assert_eq!(index.search("stall").len(), DEFAULT_MAX_RESULTS);
        assert_eq!(index.search_limited("stall", 3).len(), 3);
    }

    #[test]
    fn repeated_queries_are_stable() {
        let index = market_index(&["Wuse Market", "Wuse II", "Garki Market"]);
        assert_eq!(index.search("market"), index.search("market"));
    }
}
