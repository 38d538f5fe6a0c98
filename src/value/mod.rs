//! Semi-structured value model
//!
//! Documents are `serde_json::Value` trees. This module owns the pure logic
//! the rest of the store builds on: dotted-path resolution with an explicit
//! `Missing` sentinel, deep equality, and type-aware ordering.
//!
//! No I/O happens here.

mod compare;
mod path;

pub use compare::{deep_eq, ordering, TypeMismatch};
pub use path::{FieldPath, Resolved};
