//! Error taxonomy for the archive writer.
//!
//! Every error is fatal to the writer: callers must discard an
//! [`ArchiveWriter`](crate::writer::ArchiveWriter) after any `Err` and unlink
//! whatever partial file was left behind.

use crate::hash::ChunkHash;

/// Errors produced by the archive writer.
#[derive(thiserror::Error, Debug)]
pub enum ArchiveError {
    /// A phase-guarded operation was called in the wrong phase.
    #[error("operation not legal in current phase")]
    OutOfOrder,

    /// The sink accepted fewer bytes than requested.
    #[error("short write: expected {expected} bytes, sink accepted {actual}")]
    ShortWrite {
        /// Number of bytes the caller asked to write.
        expected: usize,
        /// Number of bytes the sink actually reported.
        actual: usize,
    },

    /// `data_id` was zero or exceeded the number of known spans.
    #[error("invalid chunk data span {data_id}: must be nonzero and <= {num_spans}")]
    InvalidChunkRange {
        /// The offending data span id.
        data_id: u32,
        /// Number of spans staged so far.
        num_spans: u32,
    },

    /// `dictionary_id` exceeded the number of known spans.
    #[error("invalid dictionary span {dictionary_id}: must be <= {num_spans}")]
    InvalidDictionaryRange {
        /// The offending dictionary span id.
        dictionary_id: u32,
        /// Number of spans staged so far.
        num_spans: u32,
    },

    /// The chunk hash was already staged.
    #[error("duplicate chunk hash {0:02x?}")]
    DuplicateChunk(ChunkHash),

    /// The index compressor reported an error.
    #[error("index compression failed: {0}")]
    CompressionFailure(#[source] std::io::Error),

    /// The backing sink or filesystem reported an error.
    #[error("io failure: {0}")]
    IOFailure(#[from] std::io::Error),
}

/// Convenience alias matching the crate-wide `Result`.
pub type ArchiveResult<T> = Result<T, ArchiveError>;
