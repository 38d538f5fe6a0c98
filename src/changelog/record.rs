//! Change records
//!
//! One record per committed mutation. The operation kind is inferred at
//! commit time from the version it describes: version 1 is an insert, a
//! tombstone is a delete, anything else is an update. A re-insert
//! after a delete reads as an update, matching the version numbering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::mvcc::{TxnId, Version};

/// The kind of mutation a change record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Insert,
    Update,
    Delete,
}

impl Operation {
    /// Infers the operation for a freshly committed version.
    pub fn infer(version: &Version) -> Self {
        if version.is_tombstone() {
            Operation::Delete
        } else if version.number() == 1 {
            Operation::Insert
        } else {
            Operation::Update
        }
    }

    /// Lowercase name, as it appears in the change stream.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Insert => "insert",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

/// One committed mutation in the change stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Global commit-order position.
    pub txn_id: TxnId,
    /// The mutated key.
    pub key: String,
    /// The per-key version this mutation produced.
    pub version_number: u64,
    /// Insert, update or delete.
    pub operation: Operation,
    /// The committed value; null for a delete.
    pub value: Value,
    /// Commit wall-clock timestamp.
    pub timestamp: DateTime<Utc>,
}

impl ChangeRecord {
    /// Builds the record paired with a committed version.
    pub fn for_version(version: &Version) -> Self {
        Self {
            txn_id: version.txn_id(),
            key: version.key().to_string(),
            version_number: version.number(),
            operation: Operation::infer(version),
            value: version.query_value().clone(),
            timestamp: version.timestamp(),
        }
    }
}
