//! Concurrent access
//!
//! Writers serialize through the mutation barrier; readers and GC run
//! alongside them. Whatever the interleaving, per-key chains stay
//! contiguous and the global txn sequence stays strictly increasing.

use std::sync::Arc;
use std::thread;

use revstore::{RetentionPolicy, Store, StoreError};
use serde_json::json;

/// A GC sweep interleaved with writers to distinct keys never breaks
/// chain contiguity for any key.
#[test]
fn test_gc_interleaved_with_writers_keeps_chains_contiguous() {
    let store = Arc::new(Store::in_memory());
    let writers = 4;
    let writes_per_key = 30u64;

    // seed every key so the sweeps always have chains to look at
    for w in 0..writers {
        store.put(&format!("w{}", w), json!({ "n": 0 })).unwrap();
    }

    let mut handles = Vec::new();
    for w in 0..writers {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            let key = format!("w{}", w);
            for n in 1..writes_per_key {
                store.put(&key, json!({ "n": n })).unwrap();
            }
        }));
    }

    let sweeper = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for _ in 0..10 {
                store
                    .garbage_collect(&RetentionPolicy::keep_latest(2))
                    .unwrap();
                thread::yield_now();
            }
        })
    };

    for handle in handles {
        handle.join().unwrap();
    }
    sweeper.join().unwrap();

    // final sweep so every chain is trimmed at least once
    store
        .garbage_collect(&RetentionPolicy::keep_latest(2))
        .unwrap();

    for w in 0..writers {
        let key = format!("w{}", w);
        let latest = store.get(&key, None).unwrap();
        assert_eq!(latest.number(), writes_per_key);

        // below the watermark everything is Purged, above it everything
        // is Found: the purged region is a prefix, never a hole
        let mut seen_retained = false;
        for n in 1..=writes_per_key {
            match store.get(&key, Some(n)) {
                Ok(version) => {
                    seen_retained = true;
                    assert_eq!(version.number(), n);
                }
                Err(StoreError::VersionPurged { .. }) => {
                    assert!(!seen_retained, "purged version {} above retained ones", n);
                }
                Err(err) => panic!("unexpected error for version {}: {}", n, err),
            }
        }
        assert!(seen_retained);
    }
}

/// Interleaved writers across keys produce a strictly increasing,
/// gap-free txn sequence in the change log.
#[test]
fn test_interleaved_writers_produce_dense_txn_order() {
    let store = Arc::new(Store::in_memory());
    let writers = 8;
    let writes_each = 25;

    let mut handles = Vec::new();
    for w in 0..writers {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            let key = format!("key{}", w);
            for n in 0..writes_each {
                store.put(&key, json!({ "n": n })).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let txns: Vec<u64> = store
        .changes(None, None)
        .unwrap()
        .map(|r| r.txn_id.value())
        .collect();
    let expected: Vec<u64> = (1..=(writers * writes_each) as u64).collect();
    assert_eq!(txns, expected);
}

/// Readers run while a writer commits and always see complete state:
/// either a version is fully visible or not there yet.
#[test]
fn test_readers_race_writer_safely() {
    let store = Arc::new(Store::in_memory());
    store.put("k", json!({ "n": 0 })).unwrap();

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for n in 1..200u64 {
                store.put("k", json!({ "n": n })).unwrap();
            }
        })
    };

    let reader = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            let mut last_seen = 0;
            for _ in 0..500 {
                let version = store.get("k", None).unwrap();
                let n = version.document().unwrap()["n"].as_u64().unwrap();
                // the version number and payload always agree
                assert_eq!(version.number(), n + 1);
                // observed state never goes backwards
                assert!(n >= last_seen);
                last_seen = n;
            }
        })
    };

    writer.join().unwrap();
    reader.join().unwrap();
}
