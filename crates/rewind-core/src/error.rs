//! Error types for rewind-core

use thiserror::Error;

/// Codec error type
///
/// Every variant carries the byte offset into the decoded text where the
/// problem was detected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unexpected character {ch:?} at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("Unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },

    #[error("Malformed number at offset {offset}")]
    MalformedNumber { offset: usize },

    #[error("Leading zero followed by a digit at offset {offset}")]
    LeadingZero { offset: usize },

    #[error("Invalid literal at offset {offset}: expected `{expected}`")]
    BadLiteral {
        expected: &'static str,
        offset: usize,
    },

    #[error("Unexpected token {found} at offset {offset}")]
    UnexpectedToken { found: String, offset: usize },

    #[error("Missing `]` for array opened at offset {offset}")]
    UnclosedArray { offset: usize },

    #[error("Missing `}}` for object opened at offset {offset}")]
    UnclosedObject { offset: usize },

    #[error("Nesting deeper than {limit} levels at offset {offset}")]
    TooDeep { limit: usize, offset: usize },

    #[error("Trailing input at offset {offset}")]
    TrailingInput { offset: usize },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
