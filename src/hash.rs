//! The 20-byte content hash used to key chunks, and its two derived views.

use crate::format::{PREFIX_LEN, SUFFIX_LEN};

/// An opaque 20-byte content digest.
///
/// Ordering is bytewise ascending on the full hash (derived `Ord` on a
/// `[u8; 20]` already does this); the index sorts chunks by this order, and
/// [`ChunkHash::prefix`] is only a compact view into the same order, not a
/// separate comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkHash([u8; 20]);

impl ChunkHash {
    /// Wrap a raw 20-byte digest.
    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// The raw bytes of the digest.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// The first 8 bytes, interpreted as a big-endian `u64`.
    pub fn prefix(&self) -> u64 {
        u64::from_be_bytes(self.0[..PREFIX_LEN].try_into().unwrap())
    }

    /// The remaining 12 bytes, verbatim.
    pub fn suffix(&self) -> [u8; SUFFIX_LEN] {
        self.0[PREFIX_LEN..].try_into().unwrap()
    }
}

impl From<[u8; 20]> for ChunkHash {
    fn from(bytes: [u8; 20]) -> Self {
        Self::new(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_big_endian_first_eight_bytes() {
        let mut bytes = [0u8; 20];
        bytes[..8].copy_from_slice(&0x0102030405060708u64.to_be_bytes());
        let hash = ChunkHash::new(bytes);
        assert_eq!(hash.prefix(), 0x0102030405060708);
    }

    #[test]
    fn suffix_is_last_twelve_bytes() {
        let mut bytes = [0u8; 20];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = i as u8;
        }
        let hash = ChunkHash::new(bytes);
        assert_eq!(hash.suffix(), [8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19]);
    }

    #[test]
    fn ordering_is_bytewise_on_full_hash() {
        let a = ChunkHash::new([0, 0xFF, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        let b = ChunkHash::new([1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert!(a < b);
        assert!(a.prefix() < b.prefix());
    }
}
