//! Text codec for structured values
//!
//! A small JSON-like grammar with one extension: the bare `undefined`
//! literal, which decodes to [`Value::Undefined`]. Unknown string escapes are
//! passed through verbatim instead of being rejected.
//!
//! The codec is also the deep-copy primitive: [`deep_copy`] is defined as
//! `decode(encode(v))`, so the round-trip law is a correctness requirement.
//!
//! # Example
//!
//! ```
//! use rewind_core::codec::{decode, encode};
//!
//! let v = decode(r#"{"a":[1,"x",null,undefined,true]}"#).unwrap();
//! assert_eq!(encode(&v), r#"{"a":[1,"x",null,undefined,true]}"#);
//! ```

mod encoder;
mod lexer;
mod parser;

pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{Parser, MAX_DEPTH};

use crate::error::Result;
use crate::value::Value;

/// Render a value as text
pub fn encode(value: &Value) -> String {
    let mut out = String::new();
    encoder::write_value(&mut out, value);
    out
}

/// Parse text into a value
///
/// The whole input must be exactly one value (surrounding whitespace allowed).
pub fn decode(text: &str) -> Result<Value> {
    Parser::new(text).parse_document()
}

/// Copy a value through its textual form
pub fn deep_copy(value: &Value) -> Result<Value> {
    decode(&encode(value))
}
