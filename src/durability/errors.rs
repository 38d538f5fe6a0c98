//! Durability errors

use thiserror::Error;

/// Result type for sink operations.
pub type SinkResult<T> = Result<T, SinkError>;

/// Errors from the durable-append seam.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The append did not complete; nothing was recorded.
    #[error("append failed: {0}")]
    AppendFailed(String),

    /// A journal entry that cannot be decoded or fails its checksum.
    /// Corruption anywhere before the final entry is fatal.
    #[error("journal corrupt at line {line}: {reason}")]
    Corrupt { line: usize, reason: String },

    /// Replayed entries that decode but violate store invariants
    /// (non-monotonic txn ids, version gaps, unknown keys).
    #[error("replay validation failed: {0}")]
    Invalid(String),

    /// Underlying I/O failure.
    #[error("journal I/O error: {0}")]
    Io(#[from] std::io::Error),
}
