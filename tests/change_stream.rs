//! Change-stream semantics
//!
//! The log is the replayable history: every committed mutation appears
//! exactly once, in txn order, with the operation kind inferred at commit
//! time. Cursors below the retained floor expire loudly.

use revstore::{Operation, Store, StoreError};
use serde_json::json;

fn seeded_store() -> Store {
    let store = Store::in_memory();
    store.put("user:1", json!({"name": "Ada", "age": 36})).unwrap(); // txn 1, insert
    store.put("user:2", json!({"name": "Grace", "age": 45})).unwrap(); // txn 2, insert
    store.put("user:1", json!({"name": "Ada", "age": 37})).unwrap(); // txn 3, update
    store.delete("user:2").unwrap(); // txn 4, delete
    store
}

/// changes(0) returns every committed record in commit order.
#[test]
fn test_changes_from_zero_replays_everything() {
    let store = seeded_store();
    let records: Vec<_> = store.changes(None, None).unwrap().collect();

    let txns: Vec<u64> = records.iter().map(|r| r.txn_id.value()).collect();
    assert_eq!(txns, vec![1, 2, 3, 4]);

    let ops: Vec<Operation> = records.iter().map(|r| r.operation).collect();
    assert_eq!(
        ops,
        vec![
            Operation::Insert,
            Operation::Insert,
            Operation::Update,
            Operation::Delete
        ]
    );
}

/// changes(x) returns exactly the records with txn_id > x.
#[test]
fn test_changes_since_cursor_is_exact() {
    let store = seeded_store();
    for start in 0..=4u64 {
        let txns: Vec<u64> = store
            .changes(Some(start), None)
            .unwrap()
            .map(|r| r.txn_id.value())
            .collect();
        let expected: Vec<u64> = (start + 1..=4).collect();
        assert_eq!(txns, expected, "cursor {}", start);
    }
}

/// Delete records carry a null value and the tombstone's version number.
#[test]
fn test_delete_record_shape() {
    let store = seeded_store();
    let record = store
        .changes(Some(3), None)
        .unwrap()
        .next()
        .expect("one record after txn 3");
    assert_eq!(record.key, "user:2");
    assert_eq!(record.operation, Operation::Delete);
    assert_eq!(record.version_number, 2);
    assert!(record.value.is_null());
}

/// The stream filter applies to each record's value.
#[test]
fn test_changes_with_filter() {
    let store = seeded_store();
    let keys: Vec<String> = store
        .changes(None, Some("value.age > 40"))
        .unwrap()
        .map(|r| r.key)
        .collect();
    assert_eq!(keys, ["user:2"]);
}

/// Truncation raises the floor; stale cursors expire instead of
/// silently skipping records.
#[test]
fn test_truncated_cursor_expires() {
    let store = seeded_store();
    assert_eq!(store.truncate_changes(2).unwrap(), 2);

    assert!(matches!(
        store.changes(Some(1), None),
        Err(StoreError::CursorExpired { start: 1, floor: 2 })
    ));
    assert!(matches!(
        store.changes(None, None),
        Err(StoreError::CursorExpired { start: 0, floor: 2 })
    ));

    // a cursor at or past the floor still works
    let txns: Vec<u64> = store
        .changes(Some(2), None)
        .unwrap()
        .map(|r| r.txn_id.value())
        .collect();
    assert_eq!(txns, vec![3, 4]);
}

/// head_txn_id is the consumer's resync point after an expiry.
#[test]
fn test_head_txn_id_tracks_commits() {
    let store = Store::in_memory();
    assert_eq!(store.head_txn_id(), 0);
    store.put("a", json!(1)).unwrap();
    store.put("b", json!(2)).unwrap();
    assert_eq!(store.head_txn_id(), 2);

    store.truncate_changes(2).unwrap();
    assert_eq!(store.head_txn_id(), 2);
    assert_eq!(store.changes(Some(2), None).unwrap().count(), 0);
}
