//! Error types for rewind-timeline

use thiserror::Error;

/// Timeline error type
#[derive(Debug, Error)]
pub enum Error {
    /// Rewind target past the end of history
    #[error("Record index {index} out of range (history holds {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// A preview-only restore cannot discard history
    #[error("A preview restore cannot commit")]
    PreviewCommit,

    /// Capturing while a preview is shown would record preview state
    #[error("Preview of record {index} is active; cancel it before recording")]
    PreviewActive { index: usize },

    /// Persisted history decoded but does not describe a valid history
    #[error("Corrupt history: {0}")]
    CorruptHistory(String),

    /// Persisted history is not valid text
    #[error("Codec error: {0}")]
    Codec(#[from] rewind_core::Error),

    /// Configuration or saved blobs could not be parsed from RON
    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    /// Saved blobs could not be written as RON
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for timeline operations
pub type Result<T> = std::result::Result<T, Error>;
