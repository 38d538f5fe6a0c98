//! The append-only change log
//!
//! Records are held in ascending txn order. Truncation drops a prefix and
//! raises the retained floor; a cursor that predates the floor can no
//! longer be served exactly, so `changes_since` fails it with
//! `CursorExpired` instead of silently skipping records.

use crate::error::StoreError;

use super::ChangeRecord;

/// Globally ordered change records with a retention floor.
#[derive(Debug, Default)]
pub struct ChangeLog {
    /// Retained records, ascending by txn id.
    records: Vec<ChangeRecord>,
    /// Highest dropped txn id; 0 when nothing was ever dropped.
    floor: u64,
}

impl ChangeLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of retained records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no records are retained.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Highest dropped txn id (the retention floor).
    pub fn floor(&self) -> u64 {
        self.floor
    }

    /// Highest retained txn id, or the floor if the log is empty.
    pub fn head(&self) -> u64 {
        self.records
            .last()
            .map(|record| record.txn_id.value())
            .unwrap_or(self.floor)
    }

    /// Appends a committed record.
    ///
    /// Records arrive from the single commit point already carrying their
    /// txn id; strict ascending order is an invariant of that path.
    pub fn append(&mut self, record: ChangeRecord) {
        debug_assert!(record.txn_id.value() > self.head());
        self.records.push(record);
    }

    /// Validates a change-stream cursor against the retention floor.
    pub fn check_cursor(&self, start: u64) -> Result<(), StoreError> {
        if start < self.floor {
            return Err(StoreError::CursorExpired {
                start,
                floor: self.floor,
            });
        }
        Ok(())
    }

    /// Records with `txn_id > start`, ascending.
    ///
    /// Callers must have validated the cursor with `check_cursor`.
    pub fn records_after(&self, start: u64) -> &[ChangeRecord] {
        // records are ascending by txn id, so the suffix starts at the
        // first record past the cursor
        let begin = self
            .records
            .partition_point(|record| record.txn_id.value() <= start);
        &self.records[begin..]
    }

    /// Drops every record with `txn_id <= up_to` and raises the floor.
    ///
    /// Returns the number of records dropped.
    pub fn truncate(&mut self, up_to: u64) -> usize {
        let cut = self
            .records
            .partition_point(|record| record.txn_id.value() <= up_to);
        self.records.drain(..cut);
        self.floor = self.floor.max(up_to);
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changelog::Operation;
    use crate::mvcc::TxnId;
    use chrono::Utc;
    use serde_json::json;

    fn record(txn: u64, key: &str) -> ChangeRecord {
        ChangeRecord {
            txn_id: TxnId::new(txn),
            key: key.to_string(),
            version_number: 1,
            operation: Operation::Insert,
            value: json!({ "k": key }),
            timestamp: Utc::now(),
        }
    }

    fn log_with(txns: &[u64]) -> ChangeLog {
        let mut log = ChangeLog::new();
        for txn in txns {
            log.append(record(*txn, "k"));
        }
        log
    }

    #[test]
    fn test_records_after_cursor() {
        let log = log_with(&[1, 2, 3, 4]);
        let txns: Vec<u64> = log
            .records_after(2)
            .iter()
            .map(|r| r.txn_id.value())
            .collect();
        assert_eq!(txns, vec![3, 4]);
        assert_eq!(log.records_after(0).len(), 4);
        assert_eq!(log.records_after(4).len(), 0);
    }

    #[test]
    fn test_truncate_drops_prefix_and_raises_floor() {
        let mut log = log_with(&[1, 2, 3, 4]);
        assert_eq!(log.truncate(2), 2);
        assert_eq!(log.floor(), 2);
        assert_eq!(log.len(), 2);
        assert_eq!(log.records_after(2).len(), 2);
    }

    #[test]
    fn test_cursor_below_floor_is_expired() {
        let mut log = log_with(&[1, 2, 3, 4]);
        log.truncate(2);
        assert!(matches!(
            log.check_cursor(1),
            Err(StoreError::CursorExpired { start: 1, floor: 2 })
        ));
        // a cursor exactly at the floor has missed nothing
        assert!(log.check_cursor(2).is_ok());
        assert!(log.check_cursor(9).is_ok());
    }

    #[test]
    fn test_truncate_never_lowers_floor() {
        let mut log = log_with(&[1, 2, 3]);
        log.truncate(3);
        log.truncate(1);
        assert_eq!(log.floor(), 3);
    }

    #[test]
    fn test_head_tracks_last_record_or_floor() {
        let mut log = log_with(&[1, 2, 3]);
        assert_eq!(log.head(), 3);
        log.truncate(3);
        assert_eq!(log.head(), 3);
        assert_eq!(ChangeLog::new().head(), 0);
    }
}
