//! revstore - a versioned key-value store with a replayable change stream
//!
//! Every mutation commits an immutable version into its key's chain plus
//! one change record into a globally txn-ordered log, as one atomic unit.
//! History is queryable with a small SQL-like predicate language and
//! reclaimed by an explicitly triggered garbage collector.
//!
//! The [`store::Store`] façade is the sole interface for external
//! collaborators; persistence goes through the abstract
//! [`durability::DurableSink`] seam.

pub mod changelog;
pub mod durability;
pub mod error;
pub mod mvcc;
pub mod observability;
pub mod predicate;
pub mod store;
pub mod value;

pub use changelog::{ChangeRecord, Operation};
pub use error::{StoreError, StoreResult};
pub use mvcc::{GcReport, RetentionPolicy, TxnId, Version};
pub use store::Store;
