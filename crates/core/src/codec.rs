//! Byte layouts used by the permutation
//!
//! A Word is kept flat; its 4x4 matrix view is column-major, the same
//! layout AES uses for its state: `matrix[row][col] = flat[col * 4 + row]`.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::params::{BLOCK_SIZE, CHAINING_WORDS, WORD_SIZE, WORDS_PER_BLOCK};

/// 16 bytes, one AES state
pub type Word = [u8; WORD_SIZE];

/// Column-major 4x4 view of a [`Word`]
pub type Matrix = [[u8; 4]; 4];

/// 8 Words (1024 bits) of padded message
pub type Block = [Word; WORDS_PER_BLOCK];

/// 8 Words (1024 bits) of running hash state
pub type ChainingValue = [Word; CHAINING_WORDS];

/// Copy the 16 bytes starting at `offset` into a Word
///
/// Panics if fewer than 16 bytes remain; callers only pass padded input.
#[inline(always)]
pub fn to_word(bytes: &[u8], offset: usize) -> Word {
    let mut word = [0u8; WORD_SIZE];
    word.copy_from_slice(&bytes[offset..offset + WORD_SIZE]);
    word
}

/// Split padded bytes into blocks
///
/// Block `i`, Word `j` is `to_word(padded, i * 128 + j * 16)`. Trailing
/// bytes that do not fill a whole block are ignored; padding never
/// produces any.
pub fn to_blocks(padded: &[u8]) -> Vec<Block> {
    padded
        .chunks_exact(BLOCK_SIZE)
        .map(|chunk| {
            let mut block = [[0u8; WORD_SIZE]; WORDS_PER_BLOCK];
            for (j, word) in block.iter_mut().enumerate() {
                *word = to_word(chunk, j * WORD_SIZE);
            }
            block
        })
        .collect()
}

/// Concatenate blocks back into bytes (inverse of [`to_blocks`])
pub fn flatten(blocks: &[Block]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(blocks.len() * BLOCK_SIZE);
    for word in blocks.iter().flatten() {
        bytes.extend_from_slice(word);
    }
    bytes
}

/// Reshape a flat Word into its column-major matrix
#[inline(always)]
pub fn word_to_matrix(word: &Word) -> Matrix {
    let mut matrix = [[0u8; 4]; 4];
    for (col, column) in word.chunks_exact(4).enumerate() {
        for (row, byte) in column.iter().enumerate() {
            matrix[row][col] = *byte;
        }
    }
    matrix
}

/// Flatten a column-major matrix back into a Word
#[inline(always)]
pub fn matrix_to_word(matrix: &Matrix) -> Word {
    let mut word = [0u8; WORD_SIZE];
    for (i, byte) in word.iter_mut().enumerate() {
        *byte = matrix[i % 4][i / 4];
    }
    word
}

/// Word-wise XOR
#[inline(always)]
pub fn xor_words(a: &Word, b: &Word) -> Word {
    let mut out = *a;
    for (o, x) in out.iter_mut().zip(b) {
        *o ^= x;
    }
    out
}
