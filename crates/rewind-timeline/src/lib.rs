//! Rewind Timeline - Capture, compaction and rewind of live session state
//!
//! This crate builds on `rewind-core`'s structured values to provide:
//!
//! - **Providers**: per-category capture/restore hooks into state the
//!   timeline does not own
//! - **Differ**: minimal per-category (and per-element) deltas between
//!   consecutive captures
//! - **RecordStore**: a bounded history whose oldest records are compacted
//!   into a single full record
//! - **Timeline**: full and preview restores, commit, labels and
//!   persistence
//!
//! # Example
//!
//! ```
//! use rewind_core::Value;
//! use rewind_timeline::{Category, EventKind, ProviderRegistry, RestoreScope, Timeline, TimelineConfig};
//!
//! struct Board {
//!     cursor: i64,
//! }
//!
//! let mut registry = ProviderRegistry::new();
//! registry.register_fn(
//!     Category::Cursor,
//!     |b: &Board| Value::from(b.cursor),
//!     |b: &mut Board, v: &Value| b.cursor = v.as_i64().unwrap_or(0),
//! );
//!
//! let mut board = Board { cursor: 0 };
//! let mut timeline = Timeline::start(TimelineConfig::default(), registry, &board);
//! board.cursor = 7;
//! timeline.notify_event(&board, EventKind::UnitAction, None).unwrap();
//!
//! // scrub back, then return to where play left off
//! timeline.rewind(&mut board, 0, RestoreScope::Preview, false).unwrap();
//! assert_eq!(board.cursor, 0);
//! timeline.rewind(&mut board, 1, RestoreScope::Preview, false).unwrap();
//! assert_eq!(board.cursor, 7);
//!
//! let saved = timeline.save();
//! let restored = Timeline::load(TimelineConfig::default(), ProviderRegistry::new(), &board, &saved);
//! assert_eq!(restored.len(), 2);
//! ```

mod category;
mod checkpoint;
mod config;
mod differ;
mod error;
mod label;
mod persist;
mod provider;
mod record;
mod store;
mod timeline;

pub use category::{Category, CategoryMap, Shape};
pub use checkpoint::Checkpoint;
pub use config::{TimelineConfig, DEFAULT_MAX_RECORDS, DEFAULT_REWIND_USES};
pub use differ::{Capture, Differ};
pub use error::{Error, Result};
pub use label::{describe, describe_meta};
pub use persist::{decode_records, derive_priors, HistoryBlobs};
pub use provider::{CaptureProvider, FnProvider, ProviderRegistry};
pub use record::{Entry, EventKind, Record, RecordMeta, Scope};
pub use store::RecordStore;
pub use timeline::{Change, EntryView, RestoreScope, Timeline};

// Re-export core types for convenience
pub use rewind_core::{SessionRng, Value, ValueMap};
