//! Observability
//!
//! Structured, synchronous JSON logging. One log line per event,
//! deterministic key ordering, no buffering.

mod logger;

pub use logger::{Logger, Severity};
