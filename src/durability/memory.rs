//! In-memory sink
//!
//! Keeps the journal in a vector. Used for tests and for stores that do
//! not need to survive the process. Supports injected append failures so
//! commit-failure atomicity can be exercised without touching a disk.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::changelog::ChangeRecord;
use crate::mvcc::Version;

use super::{ControlEvent, DurableSink, JournalEntry, SinkError, SinkResult};

/// A sink that records entries in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<JournalEntry>>,
    fail_appends: AtomicBool,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, every append fails without recording anything.
    pub fn set_fail_appends(&self, fail: bool) {
        self.fail_appends.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of everything appended so far.
    pub fn entries(&self) -> Vec<JournalEntry> {
        self.lock_entries().clone()
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, Vec<JournalEntry>> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn append(&self, entry: JournalEntry) -> SinkResult<()> {
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(SinkError::AppendFailed("injected append failure".into()));
        }
        self.lock_entries().push(entry);
        Ok(())
    }
}

impl DurableSink for MemorySink {
    fn append_commit(&self, version: &Version, record: &ChangeRecord) -> SinkResult<()> {
        self.append(JournalEntry::Commit {
            version: version.clone(),
            record: record.clone(),
        })
    }

    fn append_control(&self, event: &ControlEvent) -> SinkResult<()> {
        self.append(JournalEntry::Control(event.clone()))
    }

    fn replay(&self) -> SinkResult<Vec<JournalEntry>> {
        Ok(self.entries())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mvcc::TxnId;
    use chrono::Utc;
    use serde_json::json;

    fn commit(txn: u64) -> (Version, ChangeRecord) {
        let version = Version::with_document("k", txn, json!({}), TxnId::new(txn), Utc::now());
        let record = ChangeRecord::for_version(&version);
        (version, record)
    }

    #[test]
    fn test_appends_replay_in_order() {
        let sink = MemorySink::new();
        let (v1, r1) = commit(1);
        let (v2, r2) = commit(2);
        sink.append_commit(&v1, &r1).unwrap();
        sink.append_control(&ControlEvent::TruncateLog { up_to: 1 }).unwrap();
        sink.append_commit(&v2, &r2).unwrap();

        let entries = sink.replay().unwrap();
        assert_eq!(entries.len(), 3);
        assert!(matches!(&entries[0], JournalEntry::Commit { version, .. } if version == &v1));
        assert!(matches!(
            &entries[1],
            JournalEntry::Control(ControlEvent::TruncateLog { up_to: 1 })
        ));
    }

    #[test]
    fn test_injected_failure_records_nothing() {
        let sink = MemorySink::new();
        sink.set_fail_appends(true);
        let (version, record) = commit(1);
        assert!(sink.append_commit(&version, &record).is_err());
        assert!(sink.replay().unwrap().is_empty());

        sink.set_fail_appends(false);
        sink.append_commit(&version, &record).unwrap();
        assert_eq!(sink.replay().unwrap().len(), 1);
    }
}
