//! Version - immutable snapshot of a key's value
//!
//! A version is created once at commit time and never changes afterwards.
//! Updates create new versions; deletes create explicit tombstone
//! versions, fully ordered in the chain. A tombstone is its own payload
//! variant, never an `Option`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TxnId;

/// The payload of a version: a document or an explicit deletion marker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum VersionPayload {
    /// A complete document value.
    Document(Value),
    /// An explicit deletion marker.
    Tombstone,
}

impl VersionPayload {
    /// Returns true if this payload is a tombstone.
    #[inline]
    pub fn is_tombstone(&self) -> bool {
        matches!(self, VersionPayload::Tombstone)
    }
}

/// A single immutable version of a key.
///
/// All fields are private to enforce immutability after construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Version {
    key: String,
    number: u64,
    payload: VersionPayload,
    txn_id: TxnId,
    timestamp: DateTime<Utc>,
}

impl Version {
    /// Creates a document version.
    pub fn with_document(
        key: impl Into<String>,
        number: u64,
        value: Value,
        txn_id: TxnId,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            key: key.into(),
            number,
            payload: VersionPayload::Document(value),
            txn_id,
            timestamp,
        }
    }

    /// Creates a tombstone version.
    pub fn with_tombstone(
        key: impl Into<String>,
        number: u64,
        txn_id: TxnId,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            key: key.into(),
            number,
            payload: VersionPayload::Tombstone,
            txn_id,
            timestamp,
        }
    }

    /// The key this version belongs to.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The per-key version number (contiguous from 1).
    #[inline]
    pub fn number(&self) -> u64 {
        self.number
    }

    /// The payload: document or tombstone.
    #[inline]
    pub fn payload(&self) -> &VersionPayload {
        &self.payload
    }

    /// The transaction that committed this version.
    #[inline]
    pub fn txn_id(&self) -> TxnId {
        self.txn_id
    }

    /// Commit wall-clock timestamp.
    #[inline]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns true if this version is a tombstone.
    #[inline]
    pub fn is_tombstone(&self) -> bool {
        self.payload.is_tombstone()
    }

    /// The document value, if this is not a tombstone.
    pub fn document(&self) -> Option<&Value> {
        match &self.payload {
            VersionPayload::Document(value) => Some(value),
            VersionPayload::Tombstone => None,
        }
    }

    /// The value seen by filter predicates: the document, or null for a
    /// tombstone.
    pub fn query_value(&self) -> &Value {
        static NULL: Value = Value::Null;
        self.document().unwrap_or(&NULL)
    }
}
