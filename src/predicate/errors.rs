//! Filter parsing errors
//!
//! A malformed filter string always rejects the query; nothing is
//! silently ignored.

use thiserror::Error;

/// Result type for filter parsing.
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors raised while lexing or parsing a filter string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A character the grammar has no use for.
    #[error("unexpected character '{ch}' at byte {at}")]
    UnexpectedChar { ch: char, at: usize },

    /// A string literal with no closing quote.
    #[error("unterminated string literal starting at byte {at}")]
    UnterminatedString { at: usize },

    /// A numeric literal that does not parse as an integer or float.
    #[error("invalid number '{text}'")]
    InvalidNumber { text: String },

    /// Input ended where the grammar required more.
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    /// A token that does not fit the grammar at this position.
    #[error("unexpected {found}, expected {expected}")]
    UnexpectedToken { found: String, expected: &'static str },

    /// Filter paths must be rooted at the document, e.g. `value.age`.
    #[error("filter path must start at 'value', got '{got}'")]
    BadPathRoot { got: String },

    /// A complete predicate was parsed but input remained.
    #[error("trailing input after predicate: {found}")]
    TrailingInput { found: String },
}
