//! Predicate evaluation
//!
//! Pure structural recursion over the AST. The rules for awkward inputs
//! are fixed and total:
//! - `IS NULL` is true for an explicit null and for a missing path;
//!   `IS NOT NULL` is its exact negation.
//! - Every other operator is false against a missing path, including
//!   `!=` and `NOT IN`.
//! - A type mismatch resolves the term to false, never to an error.
//! - `BETWEEN` is inclusive on both bounds.

use std::cmp::Ordering;

use serde_json::Value;

use crate::value::{deep_eq, ordering, Resolved};

use super::ast::{CompareOp, Predicate};

pub(super) fn matches(predicate: &Predicate, document: &Value) -> bool {
    match predicate {
        Predicate::NullCheck { path, negated } => {
            let is_null = match path.resolve(document) {
                Resolved::Missing => true,
                Resolved::Found(value) => value.is_null(),
            };
            is_null != *negated
        }
        Predicate::Compare { path, op, literal } => match path.resolve(document).value() {
            Some(actual) => compare(actual, *op, literal),
            None => false,
        },
        Predicate::InList {
            path,
            negated,
            items,
        } => match path.resolve(document).value() {
            Some(actual) => {
                let found = items.iter().any(|item| deep_eq(actual, item));
                found != *negated
            }
            None => false,
        },
        Predicate::Between { path, low, high } => match path.resolve(document).value() {
            Some(actual) => {
                within(actual, low, Ordering::Less) && within(actual, high, Ordering::Greater)
            }
            None => false,
        },
    }
}

fn compare(actual: &Value, op: CompareOp, literal: &Value) -> bool {
    match op {
        CompareOp::Eq => deep_eq(actual, literal),
        CompareOp::NotEq => !deep_eq(actual, literal),
        CompareOp::Gt => is_ordered(actual, literal, &[Ordering::Greater]),
        CompareOp::Gte => is_ordered(actual, literal, &[Ordering::Greater, Ordering::Equal]),
        CompareOp::Lt => is_ordered(actual, literal, &[Ordering::Less]),
        CompareOp::Lte => is_ordered(actual, literal, &[Ordering::Less, Ordering::Equal]),
    }
}

fn is_ordered(actual: &Value, literal: &Value, accept: &[Ordering]) -> bool {
    match ordering(actual, literal) {
        Ok(result) => accept.contains(&result),
        Err(_) => false,
    }
}

/// True unless `actual` is on the `reject` side of `bound`.
fn within(actual: &Value, bound: &Value, reject: Ordering) -> bool {
    match ordering(actual, bound) {
        Ok(result) => result != reject,
        Err(_) => false,
    }
}
