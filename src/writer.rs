//! The staged producer: phase machine binding span/chunk staging, index
//! encoding, metadata, and the footer into one linear write.

use std::path::Path;

use log::{debug, warn};

use crate::error::{ArchiveError, ArchiveResult};
use crate::format::ARCHIVE_FORMAT_VERSION;
use crate::hash::ChunkHash;
use crate::index;
use crate::model::{ArchiveSummary, ByteSpan, StagedChunkRef};
use crate::footer;
use crate::sink::{ByteSink, HashingSink};

/// Construction-time knobs for an [`ArchiveWriter`].
///
/// There is exactly one real knob at this layer: how much to pre-reserve
/// for the span and chunk tables, to avoid reallocation churn for callers
/// who know roughly how many of each they'll stage. A builder that
/// consumes `self` and returns `Self`, so calls chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct WriterOptions {
    span_capacity_hint: usize,
    chunk_capacity_hint: usize,
}

impl WriterOptions {
    /// Start from the defaults (no pre-reservation).
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-reserve storage for about this many byte spans.
    pub fn span_capacity_hint(mut self, hint: usize) -> Self {
        self.span_capacity_hint = hint;
        self
    }

    /// Pre-reserve storage for about this many staged chunks.
    pub fn chunk_capacity_hint(mut self, hint: usize) -> Self {
        self.chunk_capacity_hint = hint;
        self
    }
}

/// The writer's position in its single linear pass.
///
/// `ByteSpan → Index → Metadata → Footer → Flush`, no regressions. Every
/// public operation on [`ArchiveWriter`] checks this before doing anything
/// and advances it only on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkflowStage {
    ByteSpan,
    Index,
    Metadata,
    Footer,
    Flush,
}

/// A staged, single-use producer of one archive file.
///
/// Create with [`ArchiveWriter::new`], stage spans and chunks, then drive
/// the remaining phases in order:
///
/// ```ignore
/// let mut writer = ArchiveWriter::new(sink);
/// let data_span = writer.write_byte_span(&data_bytes)?;
/// writer.stage_chunk(hash, 0, data_span)?;
/// writer.finalize_byte_spans()?;
/// writer.write_index()?;
/// writer.write_metadata(None)?;
/// writer.write_footer()?;
/// let summary = writer.flush_to_file(&path)?;
/// ```
///
/// Any error is fatal: discard the writer and unlink whatever partial file
/// was left behind.
pub struct ArchiveWriter<W: ByteSink> {
    sink: HashingSink<W>,
    stage: WorkflowStage,
    spans: Vec<ByteSpan>,
    chunks: Vec<StagedChunkRef>,
    seen: std::collections::HashSet<ChunkHash>,
    data_checksum: Option<[u8; 64]>,
    index_checksum: Option<[u8; 64]>,
    metadata_checksum: Option<[u8; 64]>,
    index_len: u32,
    metadata_len: u32,
}

impl<W: ByteSink> ArchiveWriter<W> {
    /// Create a writer over `sink` with default options.
    pub fn new(sink: W) -> Self {
        Self::with_options(sink, WriterOptions::default())
    }

    /// Create a writer over `sink` with the given [`WriterOptions`].
    pub fn with_options(sink: W, options: WriterOptions) -> Self {
        Self {
            sink: HashingSink::new(sink),
            stage: WorkflowStage::ByteSpan,
            spans: Vec::with_capacity(options.span_capacity_hint),
            chunks: Vec::with_capacity(options.chunk_capacity_hint),
            seen: std::collections::HashSet::with_capacity(options.chunk_capacity_hint),
            data_checksum: None,
            index_checksum: None,
            metadata_checksum: None,
            index_len: 0,
            metadata_len: 0,
        }
    }

    fn require_stage(&self, expected: WorkflowStage) -> ArchiveResult<()> {
        if self.stage == expected {
            Ok(())
        } else {
            warn!(
                "rejected operation requiring phase {expected:?}, writer is in phase {:?}",
                self.stage
            );
            Err(ArchiveError::OutOfOrder)
        }
    }

    /// Append `bytes` as a new byte span, returning its 1-based id.
    ///
    /// An empty slice is a no-op that returns the reserved id 0 without
    /// touching the sink. `bytes` is copied; the caller's buffer is free
    /// to be reused immediately after this returns.
    pub fn write_byte_span(&mut self, bytes: &[u8]) -> ArchiveResult<u32> {
        self.require_stage(WorkflowStage::ByteSpan)?;

        if bytes.is_empty() {
            return Ok(0);
        }

        let offset = self.sink.bytes_written();
        self.sink.write(bytes)?;
        self.spans.push(ByteSpan {
            offset,
            length: bytes.len() as u64,
        });
        Ok(self.spans.len() as u32)
    }

    /// Record a chunk reference: its hash, an optional dictionary span, and
    /// its data span.
    pub fn stage_chunk(
        &mut self,
        hash: ChunkHash,
        dictionary_id: u32,
        data_id: u32,
    ) -> ArchiveResult<()> {
        self.require_stage(WorkflowStage::ByteSpan)?;

        let num_spans = self.spans.len() as u32;
        if data_id == 0 || data_id > num_spans {
            return Err(ArchiveError::InvalidChunkRange { data_id, num_spans });
        }
        if dictionary_id > num_spans {
            return Err(ArchiveError::InvalidDictionaryRange {
                dictionary_id,
                num_spans,
            });
        }
        if self.seen.contains(&hash) {
            warn!("rejected duplicate chunk {hash:02x?}");
            return Err(ArchiveError::DuplicateChunk(hash));
        }

        self.chunks.push(StagedChunkRef {
            hash,
            dictionary: dictionary_id,
            data: data_id,
        });
        self.seen.insert(hash);
        Ok(())
    }

    /// Query the dedup set without mutating anything. Legal in any phase.
    pub fn chunk_seen(&self, hash: &ChunkHash) -> bool {
        self.seen.contains(hash)
    }

    /// Seal the data domain and advance to the index phase.
    pub fn finalize_byte_spans(&mut self) -> ArchiveResult<()> {
        self.require_stage(WorkflowStage::ByteSpan)?;

        self.data_checksum = Some(self.sink.current_sum());
        self.sink.reset_hasher();
        self.stage = WorkflowStage::Index;
        debug!(
            "sealed data domain: {} spans, {} chunks, {} bytes",
            self.spans.len(),
            self.chunks.len(),
            self.sink.bytes_written()
        );
        Ok(())
    }

    /// Sort staged chunks by hash, encode the index section, and stream it
    /// through a zstd compressor into the sink.
    pub fn write_index(&mut self) -> ArchiveResult<()> {
        self.require_stage(WorkflowStage::Index)?;

        let uncompressed = index::encode_uncompressed(&self.spans, &self.chunks)?;
        let compressed = index::compress_index(&uncompressed)?;

        self.index_len = compressed.len() as u32;
        self.sink.write(&compressed)?;

        self.index_checksum = Some(self.sink.current_sum());
        self.sink.reset_hasher();
        self.stage = WorkflowStage::Metadata;
        debug!(
            "wrote index: {} bytes uncompressed, {} bytes compressed",
            uncompressed.len(),
            self.index_len
        );
        Ok(())
    }

    /// Write the (optional) metadata blob verbatim and advance to the
    /// footer phase. `None` is treated as zero-length metadata.
    pub fn write_metadata(&mut self, bytes: Option<&[u8]>) -> ArchiveResult<()> {
        self.require_stage(WorkflowStage::Metadata)?;

        let bytes = bytes.unwrap_or(&[]);
        if !bytes.is_empty() {
            self.sink.write(bytes)?;
        }
        self.metadata_len = bytes.len() as u32;

        self.metadata_checksum = Some(self.sink.current_sum());
        self.sink.reset_hasher();
        self.stage = WorkflowStage::Footer;
        Ok(())
    }

    /// Emit the fixed-layout footer and advance to the flush phase.
    pub fn write_footer(&mut self) -> ArchiveResult<()> {
        self.require_stage(WorkflowStage::Footer)?;

        let fields = footer::FooterFields {
            index_len: self.index_len,
            span_count: self.spans.len() as u32,
            chunk_count: self.chunks.len() as u32,
            metadata_len: self.metadata_len,
        };
        let data_checksum = self
            .data_checksum
            .expect("data checksum is sealed before the footer phase is reachable");
        let index_checksum = self
            .index_checksum
            .expect("index checksum is sealed before the footer phase is reachable");
        let metadata_checksum = self
            .metadata_checksum
            .expect("metadata checksum is sealed before the footer phase is reachable");

        let bytes = footer::encode_footer(&fields, &data_checksum, &index_checksum, &metadata_checksum);
        self.sink.write(&bytes)?;

        self.stage = WorkflowStage::Flush;
        debug!("wrote footer, total size {} bytes", self.sink.bytes_written());
        Ok(())
    }

    /// Durably place the finished archive at `path`.
    ///
    /// Legal only once [`write_footer`](Self::write_footer) has succeeded.
    pub fn flush_to_file(&mut self, path: &Path) -> ArchiveResult<ArchiveSummary> {
        self.require_stage(WorkflowStage::Flush)?;

        self.sink.flush_to_path(path)?;
        Ok(self.summary())
    }

    /// Unwrap the backing sink, discarding the writer's own staging state.
    ///
    /// Mainly useful in tests that want the raw bytes of an in-memory sink
    /// without going through [`flush_to_file`](Self::flush_to_file).
    pub fn into_sink(self) -> W {
        self.sink.into_inner()
    }

    /// A read-back of what has been written so far. Most useful once the
    /// writer has reached the flush phase.
    pub fn summary(&self) -> ArchiveSummary {
        ArchiveSummary {
            span_count: self.spans.len() as u32,
            chunk_count: self.chunks.len() as u32,
            metadata_len: self.metadata_len,
            index_len: self.index_len,
            format_version: ARCHIVE_FORMAT_VERSION,
            total_len: self.sink.bytes_written(),
        }
    }
}
