//! The backing byte sink and the rolling-hash wrapper placed in front of it.
//!
//! `ByteSink` is the narrow interface the writer actually needs: sequential
//! writes plus a way to durably land the finished bytes at a path. This is
//! intentionally narrower than `Write + Seek`: the format never patches a
//! header in place, so the sink never seeks backward.

use std::fs::File;
use std::io::{self, Cursor, Write};
use std::path::Path;

use sha2::{Digest, Sha512};

use crate::error::{ArchiveError, ArchiveResult};

/// A destination for archive bytes.
///
/// Implementations buffer in memory, write straight to a file, or (in
/// tests) collect into a `Vec<u8>`. `write` must behave like
/// [`Write::write_all`] from the caller's perspective but is free to report
/// a short write as an `Err` rather than silently retrying, for `Write`
/// impls that don't guarantee full writes.
pub trait ByteSink {
    /// Write `bytes` in full. Returns the number of bytes written, which
    /// must equal `bytes.len()` on success.
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize>;

    /// Finalize any internal buffering (no-op for sinks that write directly).
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Durably place the sink's content at `path`.
    fn persist(&mut self, path: &Path) -> io::Result<()>;
}

/// Writes straight through to an open file.
pub struct DirectFileSink {
    file: File,
}

impl DirectFileSink {
    /// Create a sink that writes directly to `file`.
    pub fn new(file: File) -> Self {
        Self { file }
    }
}

impl ByteSink for DirectFileSink {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.file.write(bytes)
    }

    fn persist(&mut self, _path: &Path) -> io::Result<()> {
        self.file.flush()?;
        self.file.sync_all()
    }
}

/// Buffers the whole archive in memory, then writes it out in one shot.
///
/// Useful for sinks that can't seek, or callers who would rather pay one
/// big write than many small ones.
#[derive(Default)]
pub struct BufferedFileSink {
    buffer: Cursor<Vec<u8>>,
}

impl BufferedFileSink {
    /// Create an empty buffered sink.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ByteSink for BufferedFileSink {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buffer.write(bytes)
    }

    fn finish(&mut self) -> io::Result<()> {
        self.buffer.flush()
    }

    fn persist(&mut self, path: &Path) -> io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.buffer.get_ref())?;
        file.sync_all()
    }
}

/// An in-memory sink with no durability, used by tests.
#[derive(Default)]
pub struct MemorySink {
    buffer: Vec<u8>,
}

impl MemorySink {
    /// Create an empty in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow everything written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Take ownership of everything written so far.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }
}

impl ByteSink for MemorySink {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buffer.write(bytes)
    }

    fn persist(&mut self, path: &Path) -> io::Result<()> {
        std::fs::write(path, &self.buffer)
    }
}

/// Relays every write to a backing sink while maintaining a rolling SHA-512
/// that can be snapshotted and reset independently of the write cursor.
///
/// This is the writer's only view of the backing sink: nothing else is
/// allowed to write to it directly.
pub struct HashingSink<W> {
    inner: W,
    hasher: Sha512,
    bytes_written: u64,
}

impl<W: ByteSink> HashingSink<W> {
    /// Wrap `inner`, starting a fresh hash accumulation.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: Sha512::new(),
            bytes_written: 0,
        }
    }

    /// Write `bytes`, folding them into the running hash.
    ///
    /// Fails with [`ArchiveError::ShortWrite`] if the backing sink accepts
    /// fewer bytes than given, and with [`ArchiveError::IOFailure`] on any
    /// underlying I/O error.
    pub fn write(&mut self, bytes: &[u8]) -> ArchiveResult<usize> {
        let n = self.inner.write(bytes)?;
        if n != bytes.len() {
            return Err(ArchiveError::ShortWrite {
                expected: bytes.len(),
                actual: n,
            });
        }
        self.hasher.update(&bytes[..n]);
        self.bytes_written += n as u64;
        Ok(n)
    }

    /// Total bytes observed by this sink since creation. The authoritative
    /// length used for every size field in the footer.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Snapshot the SHA-512 of everything written since the last reset (or
    /// since creation), without disturbing the running accumulation.
    pub fn current_sum(&self) -> [u8; 64] {
        self.hasher.clone().finalize().into()
    }

    /// Begin a new hash accumulation from the current position. Does not
    /// flush or move the write cursor.
    pub fn reset_hasher(&mut self) {
        self.hasher = Sha512::new();
    }

    /// Ask the backing sink to durably place its contents at `path`,
    /// finalizing any internal buffering first.
    pub fn flush_to_path(&mut self, path: &std::path::Path) -> ArchiveResult<()> {
        self.inner.finish()?;
        self.inner.persist(path)?;
        Ok(())
    }

    /// Unwrap the backing sink, discarding the rolling hash state.
    pub fn into_inner(self) -> W {
        self.inner
    }
}
