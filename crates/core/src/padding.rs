//! Message padding
//!
//! The padded message is `M || 0x80 || 0.. || Hsize (16 bits) || L (128 bits)`,
//! a multiple of 1024 bits long.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::codec::{Block, Word, to_blocks, to_word};
use crate::params::{
    BLOCK_SIZE, HSIZE_TAG, LENGTH_FIELD_SIZE, PADDING_MARKER, PADDING_OVERHEAD,
};

/// A message padded to a whole number of blocks
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaddedMessage {
    bytes: Vec<u8>,
}

impl PaddedMessage {
    /// Padded bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Padded length in bytes (always a non-zero multiple of 128)
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false: even the empty message pads to one block
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The trailing 128-bit length field, which seeds the key schedule
    pub fn length_field(&self) -> Word {
        to_word(&self.bytes, self.bytes.len() - LENGTH_FIELD_SIZE)
    }

    /// Decompose into blocks
    pub fn blocks(&self) -> Vec<Block> {
        to_blocks(&self.bytes)
    }

    /// Consume into raw bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Padded length for a message of `len` bytes
#[inline(always)]
pub fn padded_len(len: usize) -> usize {
    (len + PADDING_OVERHEAD).div_ceil(BLOCK_SIZE) * BLOCK_SIZE
}

/// Pad a message
///
/// The size tag is written after the marker. When `len + 18` is already a
/// multiple of 128 the two overlap and the tag's zero byte replaces the
/// marker.
pub fn pad(message: &[u8]) -> PaddedMessage {
    let size = padded_len(message.len());
    let mut bytes = vec![0u8; size];

    bytes[..message.len()].copy_from_slice(message);
    bytes[message.len()] = PADDING_MARKER;

    let tag_offset = size - LENGTH_FIELD_SIZE - HSIZE_TAG.len();
    bytes[tag_offset..tag_offset + HSIZE_TAG.len()].copy_from_slice(&HSIZE_TAG);

    // usize -> u128 is lossless and 8 * isize::MAX fits comfortably
    let bit_len = (message.len() as u128) * 8;
    bytes[size - LENGTH_FIELD_SIZE..].copy_from_slice(&bit_len.to_be_bytes());

    tracing::debug!(
        message_bits = bit_len as u64,
        padded_bits = (size as u64) * 8,
        "padded message"
    );

    PaddedMessage { bytes }
}
