//! Predicate language behavior, end to end
//!
//! The documented truth table for the filter subset, exercised through
//! the store's `list` so parsing, path resolution and evaluation are all
//! in the loop.

use revstore::{Store, StoreError};
use serde_json::{json, Value};

/// Returns the keys whose latest version matches the filter.
fn matching_keys(store: &Store, filter: &str) -> Vec<String> {
    store
        .list(true, Some(filter))
        .unwrap()
        .map(|(key, _)| key)
        .collect()
}

fn store_with(rows: &[(&str, Value)]) -> Store {
    let store = Store::in_memory();
    for (key, value) in rows {
        store.put(key, value.clone()).unwrap();
    }
    store
}

#[test]
fn test_numeric_comparison_truth_table() {
    let store = store_with(&[
        ("thirty", json!({"age": 30})),
        ("twenty", json!({"age": 20})),
        ("empty", json!({})),
    ]);
    assert_eq!(matching_keys(&store, "value.age > 25"), ["thirty"]);
}

#[test]
fn test_is_null_truth_table() {
    let store = store_with(&[
        ("explicit", json!({"email": null})),
        ("absent", json!({})),
        ("present", json!({"email": "x"})),
    ]);
    assert_eq!(
        matching_keys(&store, "value.email IS NULL"),
        ["absent", "explicit"]
    );
    assert_eq!(
        matching_keys(&store, "value.email IS NOT NULL"),
        ["present"]
    );
}

#[test]
fn test_in_list_truth_table() {
    let store = store_with(&[
        ("first", json!({"status": "a"})),
        ("third", json!({"status": "c"})),
    ]);
    assert_eq!(matching_keys(&store, "value.status IN ('a','b')"), ["first"]);
    assert_eq!(
        matching_keys(&store, "value.status NOT IN ('a','b')"),
        ["third"]
    );
}

#[test]
fn test_between_truth_table() {
    let store = store_with(&[
        ("lo", json!({"age": 25})),
        ("mid", json!({"age": 30})),
        ("hi", json!({"age": 50})),
        ("under", json!({"age": 10})),
        ("over", json!({"age": 60})),
    ]);
    assert_eq!(
        matching_keys(&store, "value.age BETWEEN 25 AND 50"),
        ["hi", "lo", "mid"]
    );
}

#[test]
fn test_nested_paths_and_string_equality() {
    let store = store_with(&[
        ("berlin", json!({"address": {"city": "Berlin"}})),
        ("paris", json!({"address": {"city": "Paris"}})),
        ("flat", json!({"address": "Berlin"})),
    ]);
    assert_eq!(
        matching_keys(&store, "value.address.city = 'Berlin'"),
        ["berlin"]
    );
}

#[test]
fn test_type_mismatch_matches_nothing() {
    let store = store_with(&[("str", json!({"age": "thirty"})), ("num", json!({"age": 30}))]);
    assert_eq!(matching_keys(&store, "value.age > 25"), ["num"]);
}

#[test]
fn test_malformed_filters_reject_the_query() {
    let store = store_with(&[("k", json!({}))]);
    for bad in [
        "",
        "age > 25",
        "value.age >",
        "value.age BETWEEN 1",
        "value.status IN ()",
        "value.name = 'unterminated",
        "value.age > 25 AND value.age < 50", // single term only
    ] {
        assert!(
            matches!(store.list(true, Some(bad)), Err(StoreError::Parse(_))),
            "filter {:?} should be rejected",
            bad
        );
    }
}

#[test]
fn test_filter_applies_to_historical_versions_too() {
    let store = Store::in_memory();
    store.put("k", json!({"state": "draft"})).unwrap();
    store.put("k", json!({"state": "published"})).unwrap();

    let versions: Vec<u64> = store
        .list(false, Some("value.state = 'draft'"))
        .unwrap()
        .map(|(_, version)| version.number())
        .collect();
    assert_eq!(versions, vec![1]);
}
