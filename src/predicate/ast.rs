//! Predicate AST
//!
//! The parsed representation of one filter term. Construction goes through
//! `Predicate::parse`; evaluation through `Predicate::matches`.

use serde_json::Value;

use crate::value::FieldPath;

use super::errors::ParseResult;
use super::{eval, parser};

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    /// Source spelling, used in error and debug output.
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "!=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
        }
    }

    /// Returns true for the ordering operators (everything but `=`/`!=`).
    pub fn is_ordering(&self) -> bool {
        !matches!(self, CompareOp::Eq | CompareOp::NotEq)
    }
}

/// One parsed predicate term.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `path <op> literal`
    Compare {
        path: FieldPath,
        op: CompareOp,
        literal: Value,
    },
    /// `path IS [NOT] NULL`
    NullCheck { path: FieldPath, negated: bool },
    /// `path [NOT] IN (literal, ...)`
    InList {
        path: FieldPath,
        negated: bool,
        items: Vec<Value>,
    },
    /// `path BETWEEN low AND high`, inclusive on both bounds.
    Between {
        path: FieldPath,
        low: Value,
        high: Value,
    },
}

impl Predicate {
    /// Parses a filter string into a predicate.
    pub fn parse(input: &str) -> ParseResult<Self> {
        parser::parse(input)
    }

    /// Evaluates this predicate against a document.
    ///
    /// Pure: no I/O, no mutation, and never an error. Unresolvable or
    /// mistyped comparisons evaluate to false.
    pub fn matches(&self, document: &Value) -> bool {
        eval::matches(self, document)
    }

    /// Convenience constructor for an equality comparison.
    pub fn eq(path: FieldPath, literal: Value) -> Self {
        Predicate::Compare {
            path,
            op: CompareOp::Eq,
            literal,
        }
    }
}
