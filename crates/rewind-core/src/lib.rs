//! Rewind Core - Structured values and their text codec
//!
//! This crate provides the leaf types shared by the rewind engine:
//! - Structured values (`Value`, `ValueMap`) with deep structural equality
//! - A tokenizer, recursive-descent parser and encoder for their text form
//! - Deep copy defined through the codec round trip
//! - A seed-addressable RNG whose state can be captured and restored
//!
//! ## Example
//!
//! ```
//! use rewind_core::{codec, Value};
//!
//! let v: Value = [("gold", Value::from(25))].into_iter().collect();
//! let text = codec::encode(&v);
//! assert_eq!(text, r#"{"gold":25}"#);
//! assert_eq!(codec::decode(&text).unwrap(), v);
//! ```

pub mod codec;
mod error;
mod rng;
mod value;

pub use error::{Error, Result};
pub use indexmap::IndexMap;
pub use rng::SessionRng;
pub use value::{Value, ValueMap};
