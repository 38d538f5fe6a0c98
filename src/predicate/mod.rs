//! Filter predicate engine
//!
//! Parses and evaluates the SQL-like WHERE subset used by `list` and
//! `changes`. Each query is exactly one predicate term:
//!
//! ```text
//! predicate := comparison | nullcheck | inlist | between
//! comparison := path ('='|'!='|'>'|'>='|'<'|'<=') literal
//! nullcheck  := path 'IS' ['NOT'] 'NULL'
//! inlist     := path ['NOT'] 'IN' '(' literal (',' literal)* ')'
//! between    := path 'BETWEEN' literal 'AND' literal
//! path       := 'value' ('.' identifier)*
//! literal    := number | quoted-string | 'true' | 'false' | 'null'
//! ```
//!
//! Parsing is a hand-written lexer plus recursive descent producing an AST;
//! malformed input is rejected with `ParseError`. Evaluation is a pure
//! function of the AST and a document; type mismatches resolve the term to
//! false, never to an error.

mod ast;
mod errors;
mod eval;
mod lexer;
mod parser;

pub use ast::{CompareOp, Predicate};
pub use errors::{ParseError, ParseResult};
