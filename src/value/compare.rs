//! Comparison semantics for document values
//!
//! Equality is deep and numeric-aware: `1` equals `1.0`, but no value is
//! ever equal to a value of another type. Ordering is defined for numbers
//! (numeric) and strings (lexicographic) only; any other pairing is a
//! `TypeMismatch`, which predicate evaluation resolves to "no match"
//! rather than a query failure.

use std::cmp::Ordering;

use serde_json::Value;
use thiserror::Error;

/// Two operands that cannot be ordered against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot order {left} against {right}")]
pub struct TypeMismatch {
    /// Type name of the left operand.
    pub left: &'static str,
    /// Type name of the right operand.
    pub right: &'static str,
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Deep equality with numeric-aware number comparison.
///
/// Cross-type equality is never true.
pub fn deep_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(xi), Some(yi)) => xi == yi,
            _ => match (x.as_f64(), y.as_f64()) {
                (Some(xf), Some(yf)) => xf == yf,
                _ => false,
            },
        },
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| deep_eq(l, r))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, l)| y.get(k).map_or(false, |r| deep_eq(l, r)))
        }
        _ => false,
    }
}

/// Type-aware ordering: numbers numerically, strings lexicographically.
///
/// Everything else, including any cross-type pairing, is a `TypeMismatch`.
pub fn ordering(a: &Value, b: &Value) -> Result<Ordering, TypeMismatch> {
    let mismatch = TypeMismatch {
        left: type_name(a),
        right: type_name(b),
    };
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(xi), Some(yi)) = (x.as_i64(), y.as_i64()) {
                return Ok(xi.cmp(&yi));
            }
            match (x.as_f64(), y.as_f64()) {
                // serde_json numbers are never NaN, so partial_cmp cannot
                // fail for two representable floats.
                (Some(xf), Some(yf)) => xf.partial_cmp(&yf).ok_or(mismatch),
                _ => Err(mismatch),
            }
        }
        (Value::String(x), Value::String(y)) => Ok(x.cmp(y)),
        _ => Err(mismatch),
    }
}
