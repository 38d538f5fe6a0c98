//! TxnAuthority - transaction id allocation
//!
//! A single owned allocator held by the store façade and touched only
//! inside the mutation barrier, never as ambient process-wide state. Ids are
//! handed out at the commit point and advanced only after the paired
//! version+change append is durable, so a failed commit consumes nothing
//! and a retry cannot leave a gap.
//!
//! During startup the authority is rebuilt by observing replayed records
//! in journal order; replay must be strictly increasing.

use thiserror::Error;

use super::TxnId;

/// Errors from replaying transaction ids at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TxnAuthorityError {
    /// A replayed id was not strictly greater than the highest seen.
    #[error("non-monotonic txn id: observed {observed} but highest is {highest}")]
    NonMonotonic { observed: u64, highest: u64 },
}

/// Allocator for the global monotonic transaction counter.
#[derive(Debug, Default)]
pub struct TxnAuthority {
    /// Highest committed (or replayed) transaction id; 0 before any commit.
    highest: u64,
}

impl TxnAuthority {
    /// Creates an authority for a fresh store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next commit will carry.
    ///
    /// Pure read: nothing is consumed until `mark_committed`.
    pub fn next_txn_id(&self) -> TxnId {
        TxnId::new(self.highest + 1)
    }

    /// Advances the counter after the commit is durable and published.
    ///
    /// Callers hold the mutation barrier, so the committed id is always
    /// the one just allocated.
    pub fn mark_committed(&mut self, txn_id: TxnId) {
        debug_assert_eq!(txn_id.value(), self.highest + 1);
        self.highest = txn_id.value();
    }

    /// Observes a replayed commit during startup.
    pub fn observe_replayed(&mut self, txn_id: TxnId) -> Result<(), TxnAuthorityError> {
        if txn_id.value() <= self.highest {
            return Err(TxnAuthorityError::NonMonotonic {
                observed: txn_id.value(),
                highest: self.highest,
            });
        }
        self.highest = txn_id.value();
        Ok(())
    }

    /// Highest committed id, 0 when nothing has committed.
    pub fn head(&self) -> u64 {
        self.highest
    }
}
