//! Domain-specific assertion macros for gaz harnesses.
//!
//! These wrap plain assertions with context-rich failure messages that make
//! it clear *which* search invariant was violated.

/// Assert that a slice of search hits has exactly these display names, in
/// order.
///
/// ```rust
/// assert_hit_names!(index.search("wuse"), ["Wuse Market", "Wuse II"]);
/// ```
#[macro_export]
macro_rules! assert_hit_names {
    ($hits:expr, [$($name:expr),* $(,)?]) => {{
        let actual: Vec<&str> = $hits.iter().map(|e| e.display_name.as_str()).collect();
        let expected: Vec<&str> = vec![$($name),*];
        assert_eq!(
            actual, expected,
            "assert_hit_names! failed:\n  expected hits: {:?}\n  actual hits:   {:?}",
            expected, actual
        );
    }};
}

/// Assert that a feature carries a property with an expected value.
#[macro_export]
macro_rules! assert_has_prop {
    ($feature:expr, $key:expr, $value:expr) => {{
        let feature: &gaz_core::Feature = &$feature;
        let key: &str = $key;
        let expected = serde_json::json!($value);
        match feature.property(key) {
            Some(actual) if *actual == expected => {}
            Some(actual) => panic!(
                "assert_has_prop! failed:\n  properties[{:?}]\n  expected: {}\n  actual:   {}",
                key, expected, actual
            ),
            None => panic!(
                "assert_has_prop! failed: property {:?} not found.\n  Available: {:?}",
                key,
                feature.properties.keys().collect::<Vec<_>>()
            ),
        }
    }};
}

/// Assert that every hit's handle resolves inside the registry — search must
/// never fabricate entries.
#[macro_export]
macro_rules! assert_hits_resolve {
    ($hits:expr, $registry:expr) => {{
        for hit in $hits.iter() {
            assert!(
                $registry.feature(hit.handle).is_some(),
                "assert_hits_resolve! failed: hit {:?} does not resolve in the registry",
                hit.display_name
            );
        }
    }};
}
