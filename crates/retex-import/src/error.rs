//! Error types for texture import planning.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from texture addressing resolution.
#[derive(Debug, Error)]
pub enum AddressingError {
    /// The source name/URI could not be normalized to a non-empty
    /// canonical name.
    #[error("invalid texture addressing: {0}")]
    InvalidAddressing(String),
}

/// Errors raised inside a deferred byte-retrieval handle.
///
/// A `RetrieveError` always belongs to a single channel source; it is up
/// to the stage that invoked the handle to decide whether the failure is
/// fatal for the whole texture slot.
#[derive(Debug, Error)]
pub enum RetrieveError {
    /// Reading a file-backed source failed.
    #[error("failed to read '{path}': {source}")]
    Io {
        /// Path of the file-backed source.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Decoding an encoded payload (e.g. a base64 data URI) failed.
    #[error("failed to decode byte source payload: {0}")]
    Decode(String),

    /// A byte range points outside the backing buffer.
    #[error("byte range at offset {offset} (length {length}) exceeds buffer of {len} bytes")]
    OutOfRange {
        /// Start of the requested range.
        offset: usize,
        /// Length of the requested range.
        length: usize,
        /// Length of the backing buffer.
        len: usize,
    },

    /// Any other failure from a custom byte source.
    #[error("byte source failed: {0}")]
    Source(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl RetrieveError {
    /// Wraps an arbitrary error as a source failure.
    pub fn source<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
        RetrieveError::Source(Box::new(err))
    }
}
