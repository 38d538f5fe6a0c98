//! TxnId - totally ordered transaction identity
//!
//! Every committed mutation carries a transaction id. The ids form a
//! strict global total order that is the sole authority for change-stream
//! ordering, independent of wall-clock time, and reproducible by journal
//! replay.

use serde::{Deserialize, Serialize};

/// A totally ordered transaction identity.
///
/// Allocated only by the store's `TxnAuthority` at the commit point.
/// No two commits share an id; no id is ever reused.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxnId(u64);

impl TxnId {
    /// Creates a TxnId with the given value.
    #[inline]
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying value.
    #[inline]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TxnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_txn_id_ordering() {
        assert!(TxnId::new(1) < TxnId::new(2));
        assert!(TxnId::new(10) > TxnId::new(2));
    }

    #[test]
    fn test_txn_id_equality() {
        assert_eq!(TxnId::new(7), TxnId::new(7));
        assert_ne!(TxnId::new(7), TxnId::new(8));
    }

    #[test]
    fn test_txn_id_serializes_transparently() {
        let json = serde_json::to_string(&TxnId::new(42)).unwrap();
        assert_eq!(json, "42");
        let back: TxnId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TxnId::new(42));
    }
}
