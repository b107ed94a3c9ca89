//! Encoding of the index section and its zstd compression handoff.
//!
//! The uncompressed layout, in order, is:
//!
//! 1. span length table (big-endian u64 per staged span, staging order)
//! 2. prefix delta vector (big-endian u64 per chunk, sorted-hash order)
//! 3. chunk-ref pairs (unsigned LEB128 `dictionary_id`, `data_id`, sorted-hash order)
//! 4. suffixes (12 bytes per chunk, verbatim, sorted-hash order)
//!
//! Sorting is bytewise ascending on the full 20-byte hash; sections 2-4
//! all share that one sort, computed once.

use std::io::{self, Write};
use std::sync::mpsc;
use std::thread;

use byteorder::{WriteBytesExt, BE};
use integer_encoding::VarIntWriter;

use crate::error::{ArchiveError, ArchiveResult};
use crate::format::INDEX_COMPRESSION_LEVEL;
use crate::model::{ByteSpan, StagedChunkRef};

/// Build the uncompressed index bytes for the given spans and chunks.
///
/// `chunks` need not already be sorted; this function sorts a local copy by
/// hash and uses that order for every section.
pub fn encode_uncompressed(spans: &[ByteSpan], chunks: &[StagedChunkRef]) -> io::Result<Vec<u8>> {
    let mut sorted: Vec<StagedChunkRef> = chunks.to_vec();
    sorted.sort_by(|a, b| a.hash.cmp(&b.hash));

    // Rough capacity estimate: 8 bytes/span + (8 + ~3 + 12) bytes/chunk.
    let mut buf = Vec::with_capacity(spans.len() * 8 + sorted.len() * 24);

    for span in spans {
        buf.write_u64::<BE>(span.length)?;
    }

    let mut previous_prefix = 0u64;
    for chunk in &sorted {
        let prefix = chunk.hash.prefix();
        let delta = prefix - previous_prefix;
        buf.write_u64::<BE>(delta)?;
        previous_prefix = prefix;
    }

    for chunk in &sorted {
        buf.write_varint(chunk.dictionary)?;
        buf.write_varint(chunk.data)?;
    }

    for chunk in &sorted {
        buf.write_all(&chunk.hash.suffix())?;
    }

    Ok(buf)
}

/// Compress `uncompressed` through a zstd stream running on a separate
/// worker thread, handing bytes across in bounded chunks.
///
/// The calling thread (the producer) blocks on each send, then closes the
/// channel and joins the worker, surfacing any compression error only after
/// the worker has fully drained and terminated: no partial index is ever
/// considered sealed while the worker might still fail.
pub fn compress_index(uncompressed: &[u8]) -> ArchiveResult<Vec<u8>> {
    const HANDOFF_CHUNK: usize = 64 * 1024;

    let (tx, rx) = mpsc::sync_channel::<Vec<u8>>(1);

    let worker = thread::spawn(move || -> io::Result<Vec<u8>> {
        let mut encoder = zstd::stream::write::Encoder::new(Vec::new(), INDEX_COMPRESSION_LEVEL)?;
        while let Ok(chunk) = rx.recv() {
            encoder.write_all(&chunk)?;
        }
        encoder.finish()
    });

    for chunk in uncompressed.chunks(HANDOFF_CHUNK) {
        if tx.send(chunk.to_vec()).is_err() {
            // The worker hung up early, which only happens after an error.
            // Stop feeding it and fall through to collect that error below.
            break;
        }
    }
    drop(tx);

    match worker.join() {
        Ok(Ok(compressed)) => Ok(compressed),
        Ok(Err(io_err)) => Err(ArchiveError::CompressionFailure(io_err)),
        Err(_panic) => Err(ArchiveError::CompressionFailure(io::Error::other(
            "index compression worker panicked",
        ))),
    }
}
