//! Plain data types shared by the staging and index-encoding stages.

use crate::hash::ChunkHash;

/// A contiguous byte range written into the data region.
///
/// Spans are numbered by their 1-based append order; offsets are absolute
/// positions in the sink at the time the span was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteSpan {
    /// Absolute byte offset at which the span starts.
    pub offset: u64,
    /// Length of the span in bytes.
    pub length: u64,
}

/// A staged reference to a chunk: its hash plus the spans holding its
/// optional dictionary and its (required) data.
///
/// `data` is always nonzero; `dictionary` may be zero, meaning "no
/// dictionary".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StagedChunkRef {
    /// Content hash of the chunk.
    pub hash: ChunkHash,
    /// 1-based span id of the chunk's compression dictionary, or 0 if none.
    pub dictionary: u32,
    /// 1-based span id of the chunk's data.
    pub data: u32,
}

/// A read-back of what the writer actually produced, filled in once
/// [`write_footer`](crate::writer::ArchiveWriter::write_footer) returns.
///
/// This is not a reader for the archive format. It only reports on the
/// single write that just happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArchiveSummary {
    /// Number of byte spans written to the data region.
    pub span_count: u32,
    /// Number of chunks staged.
    pub chunk_count: u32,
    /// Length, in bytes, of the raw metadata blob.
    pub metadata_len: u32,
    /// Length, in bytes, of the compressed index stream.
    pub index_len: u32,
    /// Format version written into the footer.
    pub format_version: u8,
    /// Total size of the archive file, in bytes.
    pub total_len: u64,
}
