//! Store error taxonomy
//!
//! Every failure the store can hand a caller, surfaced explicitly; none
//! are swallowed internally. Only `Commit` is safely retried: nothing was
//! committed and no txn id was consumed, so re-issuing the write cannot
//! duplicate effects. `Parse` and `TypeMismatch` are caller-input
//! conditions and are never retried internally.

use thiserror::Error;

use crate::durability::SinkError;
use crate::predicate::ParseError;
use crate::value::TypeMismatch;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by the store façade.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Key or version absent from the caller's view.
    #[error("key '{key}' not found")]
    NotFound { key: String },

    /// The version existed once and was reclaimed by garbage collection.
    #[error("version {version} was removed by garbage collection")]
    VersionPurged { version: u64 },

    /// Malformed filter string; the query is rejected.
    #[error("filter parse error: {0}")]
    Parse(#[from] ParseError),

    /// Incompatible comparison operand types. During predicate evaluation
    /// this resolves the term to false instead of surfacing; it reaches
    /// callers only through direct use of the value-model comparisons.
    #[error("type mismatch: {0}")]
    TypeMismatch(#[from] TypeMismatch),

    /// Change-stream cursor older than the retained log floor. The
    /// consumer must resynchronize (e.g. re-list and restart from the
    /// current head).
    #[error("cursor {start} expired: the log is truncated up to txn {floor}")]
    CursorExpired { start: u64, floor: u64 },

    /// The atomic version+change append did not complete. Nothing was
    /// committed; the write may be retried.
    #[error("commit failed: {0}")]
    Commit(#[from] SinkError),
}

impl StoreError {
    /// Builds a `NotFound` for the given key.
    pub fn not_found(key: impl Into<String>) -> Self {
        StoreError::NotFound { key: key.into() }
    }
}
