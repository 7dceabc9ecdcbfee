//! Matcher integration harness.
//!
//! # What this covers
//!
//! This is the most important harness in the suite: the matcher's dedup,
//! cap, and ordering rules are the behavior users actually see in the
//! result list.
//!
//! - **Threshold**: a query normalizing to two characters matches; one
//!   character (or punctuation-only input) returns nothing.
//! - **Substring rule**: contiguous containment over normalized text, no
//!   token logic, no edit distance.
//! - **Dedup**: same normalized name + same source layer collapses to the
//!   first occurrence; the same name on different layers does not.
//! - **Cap and order**: never more than `max_results`, always index order,
//!   identical output on repeated runs.
//! - **Property: results ⊆ index** — every hit resolves in the registry;
//!   search never fabricates entries.
//!
//! # Running
//!
//! ```sh
//! cargo test --test search_harness
//! ```

mod common;
use common::*;

use gaz_core::{search::DEFAULT_MAX_RESULTS, SearchIndex};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Threshold
// ---------------------------------------------------------------------------

#[test]
fn two_characters_pass_the_threshold() {
    let registry = abuja_registry();
    let index = abuja_index(&registry);
    let hits = index.search("ny");
    assert_hit_names!(hits, ["Nyanya Market", "Nyanya-Karshi Road"]);
}

#[test]
fn one_character_returns_nothing() {
    let registry = abuja_registry();
    let index = abuja_index(&registry);
    assert!(index.search("n").is_empty());
}

#[test]
fn queries_that_normalize_to_nothing_return_nothing() {
    let registry = abuja_registry();
    let index = abuja_index(&registry);
    for q in ["", "-", "--__--", "!?."] {
        assert!(index.search(q).is_empty(), "query {q:?} should yield nothing");
    }
}

// ---------------------------------------------------------------------------
// Substring rule
// ---------------------------------------------------------------------------

#[test]
fn matches_are_case_and_separator_insensitive() {
    let registry = abuja_registry();
    let index = abuja_index(&registry);
    assert_hit_names!(index.search("KARSHI"), ["Nyanya-Karshi Road"]);
    assert_hit_names!(index.search("nyanya_karshi"), ["Nyanya-Karshi Road"]);
}

#[test]
fn containment_is_contiguous_not_tokenized() {
    let registry = abuja_registry();
    let index = abuja_index(&registry);
    // "karshi road" is a contiguous run of the normalized name…
    assert_eq!(index.search("karshi road").len(), 1);
    // …"nyanya road" is not, even though both words appear.
    assert!(index.search("nyanya road").is_empty());
}

// ---------------------------------------------------------------------------
// Dedup
// ---------------------------------------------------------------------------

#[test]
fn separator_variants_on_one_layer_dedupe() {
    let registry = registry_of(vec![(
        "roads",
        vec![
            road("Nyanya Karshi Road", 7.55, 8.95, 7.64, 9.00),
            road("NYANYA-KARSHI ROAD", 7.55, 8.95, 7.64, 9.00),
        ],
    )]);
    let index = SearchIndex::build(&registry, &name_fields(&["roads"]));
    let hits = index.search("karshi");
    assert_hit_names!(hits, ["Nyanya Karshi Road"]);
}

#[test]
fn same_name_on_two_layers_stays_distinct() {
    let registry = registry_of(vec![
        ("markets", vec![poi("Wuse", 7.46, 9.07)]),
        ("districts", vec![district("Wuse", 7.45, 9.07, 7.48, 9.09)]),
    ]);
    let index = SearchIndex::build(&registry, &name_fields(&["markets", "districts"]));
    let hits = index.search("wuse");
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].source_layer, "markets");
    assert_eq!(hits[1].source_layer, "districts");
}

#[test]
fn equal_text_in_two_fields_of_one_feature_dedupes() {
    // The dedup key ignores the source field, so a feature whose name and
    // alt name hold the same text yields one hit, not two.
    let feature = FeatureBuilder::point(7.46, 9.07)
        .prop("name", "Jabi Lake")
        .prop("alt_name", "Jabi Lake")
        .build();
    let registry = registry_of(vec![("water", vec![feature])]);
    let config = gaz_core::SearchConfig::from_pairs([("water", vec!["name", "alt_name"])]);
    let index = SearchIndex::build(&registry, &config);
    assert_eq!(index.len(), 2);
    assert_hit_names!(index.search("jabi"), ["Jabi Lake"]);
}

// ---------------------------------------------------------------------------
// Cap and order
// ---------------------------------------------------------------------------

#[test]
fn wuse_scenario_returns_both_in_index_order() {
    let registry = registry_of(vec![(
        "markets",
        vec![poi("Wuse Market", 7.46, 9.07), poi("Wuse II", 7.47, 9.08)],
    )]);
    let index = SearchIndex::build(&registry, &name_fields(&["markets"]));
    assert_hit_names!(index.search("wuse"), ["Wuse Market", "Wuse II"]);
}

#[test]
fn default_cap_is_ten() {
    let features: Vec<_> = (0..30)
        .map(|i| poi(&format!("Stall {i}"), 7.4 + i as f64 * 0.001, 9.0))
        .collect();
    let registry = registry_of(vec![("stalls", features)]);
    let index = SearchIndex::build(&registry, &name_fields(&["stalls"]));
    let hits = index.search("stall");
    assert_eq!(hits.len(), DEFAULT_MAX_RESULTS);
    // The first ten in index order, specifically.
    assert_eq!(hits[0].display_name, "Stall 0");
    assert_eq!(hits[9].display_name, "Stall 9");
}

#[test]
fn explicit_cap_is_honored() {
    let registry = abuja_registry();
    let index = abuja_index(&registry);
    assert_eq!(index.search_limited("market", 1).len(), 1);
    assert_eq!(index.search_limited("market", 0).len(), 0);
}

#[test]
fn duplicates_do_not_consume_the_cap() {
    // Two copies of each of three names on one layer: dedup leaves three
    // hits, and a cap of three returns all three distinct names.
    let names = ["Wuse Market", "Garki Market", "Utako Market"];
    let features: Vec<_> = names
        .iter()
        .chain(names.iter())
        .map(|n| poi(n, 7.45, 9.05))
        .collect();
    let registry = registry_of(vec![("markets", features)]);
    let index = SearchIndex::build(&registry, &name_fields(&["markets"]));
    let hits = index.search_limited("market", 3);
    assert_hit_names!(hits, ["Wuse Market", "Garki Market", "Utako Market"]);
}

#[test]
fn repeated_runs_are_identical() {
    let registry = abuja_registry();
    let index = abuja_index(&registry);
    let first = index.search("wuse");
    let second = index.search("wuse");
    assert_eq!(first, second);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    /// Search never returns more than the cap, never fabricates an entry,
    /// and is stable across runs — for arbitrary queries over the fixture
    /// export.
    #[test]
    fn hits_are_capped_real_and_stable(query in ".{0,24}", cap in 0usize..15) {
        let registry = abuja_registry();
        let index = abuja_index(&registry);

        let hits = index.search_limited(&query, cap);
        prop_assert!(hits.len() <= cap);
        for hit in &hits {
            prop_assert!(registry.feature(hit.handle).is_some());
        }
        prop_assert_eq!(hits, index.search_limited(&query, cap));
    }

    /// Every hit's normalized name really contains the normalized query.
    #[test]
    fn hits_contain_the_needle(query in "[a-z ]{2,12}") {
        let registry = abuja_registry();
        let index = abuja_index(&registry);
        let needle = gaz_core::normalize(&query);
        for hit in index.search(&query) {
            prop_assert!(
                hit.normalized_name.contains(&needle),
                "{:?} does not contain {:?}", hit.normalized_name, needle
            );
        }
    }
}
