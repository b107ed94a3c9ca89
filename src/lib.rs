#![doc = include_str!("../README.md")]

mod error;
mod footer;
mod format;
mod hash;
mod index;
mod model;
mod sink;
mod writer;

pub use error::{ArchiveError, ArchiveResult};
pub use format::{
    ARCHIVE_FILE_SIGNATURE, ARCHIVE_FORMAT_VERSION, HASH_LEN, INDEX_COMPRESSION_LEVEL,
    PREFIX_LEN, SHA512_SIZE, SUFFIX_LEN, UINT32_SIZE,
};
pub use hash::ChunkHash;
pub use model::{ArchiveSummary, ByteSpan, StagedChunkRef};
pub use sink::{BufferedFileSink, ByteSink, DirectFileSink, HashingSink, MemorySink};
pub use writer::{ArchiveWriter, WriterOptions};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_to_end_single_chunk_no_dictionary() {
        let mut writer = ArchiveWriter::new(MemorySink::new());
        let data_span = writer
            .write_byte_span(&[0xDE, 0xAD, 0xBE, 0xEF])
            .expect("span write should succeed");
        assert_eq!(data_span, 1);

        writer
            .stage_chunk(ChunkHash::new([7; 20]), 0, data_span)
            .expect("chunk stage should succeed");

        writer.finalize_byte_spans().expect("finalize should succeed");
        writer.write_index().expect("index write should succeed");
        writer.write_metadata(None).expect("metadata write should succeed");
        writer.write_footer().expect("footer write should succeed");

        let summary = writer.summary();
        assert_eq!(summary.span_count, 1);
        assert_eq!(summary.chunk_count, 1);
        assert_eq!(summary.metadata_len, 0);
        assert_eq!(summary.format_version, ARCHIVE_FORMAT_VERSION);
    }

    #[test]
    fn empty_archive_has_zero_counts_and_a_well_formed_tail() {
        let mut writer = ArchiveWriter::new(MemorySink::new());
        writer.finalize_byte_spans().unwrap();
        writer.write_index().unwrap();
        writer.write_metadata(None).unwrap();
        writer.write_footer().unwrap();

        let summary = writer.summary();
        assert_eq!(summary.span_count, 0);
        assert_eq!(summary.chunk_count, 0);
        assert_eq!(summary.metadata_len, 0);
        assert!(summary.index_len > 0, "an empty zstd frame still has overhead");
    }

    #[test]
    fn phase_violation_is_rejected_without_mutating_state() {
        let mut writer = ArchiveWriter::new(MemorySink::new());
        let err = writer.write_index().unwrap_err();
        assert!(matches!(err, ArchiveError::OutOfOrder));
        // the writer can still proceed through the correct sequence afterward
        writer.finalize_byte_spans().unwrap();
        writer.write_index().unwrap();
    }
}
