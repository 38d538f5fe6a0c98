//! Versioned storage domain types
//!
//! This module defines the version-store vocabulary in code:
//! - `TxnId` - totally ordered transaction identity
//! - `Version` - immutable snapshot of a key's value (or a tombstone)
//! - `VersionChain` - contiguous per-key history with a purge watermark
//! - `VersionStore` - ordered map of chains
//! - `TxnAuthority` - the single owned txn counter
//! - `RetentionPolicy` / `GcReport` - garbage collection rules and results

mod gc;
mod txn_authority;
mod txn_id;
mod version;
mod version_chain;
mod version_store;

pub use gc::{GcReport, RetentionPolicy};
pub use txn_authority::{TxnAuthority, TxnAuthorityError};
pub use txn_id::TxnId;
pub use version::{Version, VersionPayload};
pub use version_chain::{VersionChain, VersionLookup};
pub use version_store::VersionStore;
