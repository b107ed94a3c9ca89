//! On-disk constants for the archive format.
//!
//! See <README.md> for the full byte layout. Values here are the ones
//! actually referenced by the writer; a reader would need the same table.

/// Format version written into the footer. Bump whenever the footer layout
/// or index encoding changes in a way a reader must distinguish.
pub const ARCHIVE_FORMAT_VERSION: u8 = 1;

/// Fixed trailing byte sequence identifying a file as this archive format.
pub const ARCHIVE_FILE_SIGNATURE: &[u8] = b"CHNKARC1";

/// Width, in bytes, of the fixed-width counts in the footer.
pub const UINT32_SIZE: usize = 4;

/// Width, in bytes, of a SHA-512 digest.
pub const SHA512_SIZE: usize = 64;

/// Width, in bytes, of a chunk hash suffix (bytes 8..20 of the 20-byte hash).
pub const SUFFIX_LEN: usize = 12;

/// Width, in bytes, of a chunk hash prefix (bytes 0..8 of the 20-byte hash).
pub const PREFIX_LEN: usize = 8;

/// Total width, in bytes, of a `ChunkHash`.
pub const HASH_LEN: usize = PREFIX_LEN + SUFFIX_LEN;

/// zstd compression level used for the index stream. Fixed, not configurable:
/// determinism of the compressed output depends on holding this constant.
pub const INDEX_COMPRESSION_LEVEL: i32 = 6;
