//! Fixed-layout footer emitted at the very end of the archive.

use byteorder::{WriteBytesExt, BE};

use crate::format::{ARCHIVE_FILE_SIGNATURE, ARCHIVE_FORMAT_VERSION};

/// Everything the footer needs beyond the three checksums.
pub struct FooterFields {
    /// Compressed length of the index section.
    pub index_len: u32,
    /// Number of staged byte spans.
    pub span_count: u32,
    /// Number of staged chunks.
    pub chunk_count: u32,
    /// Length of the raw metadata blob.
    pub metadata_len: u32,
}

/// Encode the footer: four counts, three SHA-512 checksums, the format
/// version byte, and the file signature, all in the order the footer
/// layout requires.
pub fn encode_footer(
    fields: &FooterFields,
    data_checksum: &[u8; 64],
    index_checksum: &[u8; 64],
    metadata_checksum: &[u8; 64],
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(4 * 4 + 3 * 64 + 1 + ARCHIVE_FILE_SIGNATURE.len());
    buf.write_u32::<BE>(fields.index_len).unwrap();
    buf.write_u32::<BE>(fields.span_count).unwrap();
    buf.write_u32::<BE>(fields.chunk_count).unwrap();
    buf.write_u32::<BE>(fields.metadata_len).unwrap();
    buf.extend_from_slice(data_checksum);
    buf.extend_from_slice(index_checksum);
    buf.extend_from_slice(metadata_checksum);
    buf.write_u8(ARCHIVE_FORMAT_VERSION).unwrap();
    buf.extend_from_slice(ARCHIVE_FILE_SIGNATURE);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{SHA512_SIZE, UINT32_SIZE};

    #[test]
    fn footer_length_matches_the_fixed_layout() {
        let footer = encode_footer(
            &FooterFields {
                index_len: 0,
                span_count: 0,
                chunk_count: 0,
                metadata_len: 0,
            },
            &[0u8; 64],
            &[0u8; 64],
            &[0u8; 64],
        );
        let expected_len =
            4 * UINT32_SIZE + 3 * SHA512_SIZE + 1 + ARCHIVE_FILE_SIGNATURE.len();
        assert_eq!(footer.len(), expected_len);
    }

    #[test]
    fn footer_ends_with_version_and_signature() {
        let footer = encode_footer(
            &FooterFields {
                index_len: 1,
                span_count: 2,
                chunk_count: 3,
                metadata_len: 4,
            },
            &[0u8; 64],
            &[0u8; 64],
            &[0u8; 64],
        );
        let sig_start = footer.len() - ARCHIVE_FILE_SIGNATURE.len();
        assert_eq!(&footer[sig_start..], ARCHIVE_FILE_SIGNATURE);
        assert_eq!(footer[sig_start - 1], ARCHIVE_FORMAT_VERSION);
    }

    #[test]
    fn counts_are_big_endian_u32() {
        let footer = encode_footer(
            &FooterFields {
                index_len: 0x01020304,
                span_count: 5,
                chunk_count: 6,
                metadata_len: 7,
            },
            &[0u8; 64],
            &[0u8; 64],
            &[0u8; 64],
        );
        assert_eq!(&footer[0..4], &[0x01, 0x02, 0x03, 0x04]);
    }
}
