//! Durable-append seam
//!
//! The core never touches a concrete file format directly; it requires
//! only the `DurableSink` capability: append a committed write as one
//! atomic unit, append control events (GC, eviction, log truncation), and
//! replay everything at startup. Transport and wire shapes stay outside.
//!
//! Two collaborators ship with the crate: `MemorySink` for tests and
//! ephemeral stores, and `FileJournal`, an append-only checksummed file
//! with an fsync after every append.

mod errors;
mod journal;
mod memory;

use crate::changelog::ChangeRecord;
use crate::mvcc::Version;

use serde::{Deserialize, Serialize};

pub use errors::{SinkError, SinkResult};
pub use journal::FileJournal;
pub use memory::MemorySink;

/// A non-commit event the store must be able to replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ControlEvent {
    /// Garbage collection removed every version of `key` below `below`.
    Purge { key: String, below: u64 },
    /// The key's entire history was removed without a tombstone.
    Evict { key: String },
    /// The change log dropped records with `txn_id <= up_to`.
    TruncateLog { up_to: u64 },
}

/// One replayable journal entry, in append order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entry", rename_all = "snake_case")]
pub enum JournalEntry {
    /// A committed write: exactly one version plus its change record.
    Commit {
        version: Version,
        record: ChangeRecord,
    },
    /// A garbage-collection, eviction or truncation event.
    Control(ControlEvent),
}

/// Abstract durable-append capability.
///
/// `append_commit` must be all-or-nothing: either the paired version and
/// change record are durably recorded together, or neither is and an error
/// is returned. The store treats an error as "nothing happened" and
/// surfaces it as a retryable commit failure.
pub trait DurableSink: Send + Sync {
    /// Durably appends one committed write as a single atomic unit.
    fn append_commit(&self, version: &Version, record: &ChangeRecord) -> SinkResult<()>;

    /// Durably appends a control event.
    fn append_control(&self, event: &ControlEvent) -> SinkResult<()>;

    /// Replays every entry in append order for startup reload.
    fn replay(&self) -> SinkResult<Vec<JournalEntry>>;
}
