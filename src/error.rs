//! Error types for rechunk.

use thiserror::Error;

/// Main error type for all rechunk operations.
#[derive(Debug, Error)]
pub enum RechunkError {
    /// The byte source failed while producing a segment.
    ///
    /// The read loop halts on the first source error and the finish
    /// callback is not invoked; the error surfaces through
    /// [`Rechunker::wait_until_finished`](crate::Rechunker::wait_until_finished).
    #[error("source error: {0}")]
    Source(#[from] std::io::Error),

    /// A target chunk size of zero was configured.
    #[error("invalid target chunk size: {0}")]
    InvalidChunkSize(usize),

    /// The configured decoding label names no known encoding.
    #[error("unknown encoding label: {0:?}")]
    UnknownEncoding(String),

    /// The read loop task went away without reporting a result.
    #[error("read loop stopped unexpectedly")]
    Stopped,
}

/// Result type alias using RechunkError.
pub type Result<T> = std::result::Result<T, RechunkError>;
