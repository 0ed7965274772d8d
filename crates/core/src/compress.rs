//! `compress1024`: the ECHO chaining function
//!
//! ```text
//!         col 0  col 1  col 2  col 3
//! row 0    v0     v4     m0     m4
//! row 1    v1     v5     m1     m5
//! row 2    v2     v6     m2     m6
//! row 3    v3     v7     m3     m7
//! ```
//!
//! Ten rounds of BIG.SubWords, BIG.ShiftRows and BIG.MixColumns are applied
//! to the grid, then BIG.Final folds it back into a new chaining value.

#[cfg(not(feature = "std"))]
use alloc::string::String;

use crate::aes_round::aesenc;
use crate::codec::{Block, ChainingValue, Word, xor_words};
use crate::gf::mix_column;
use crate::key_schedule::KeySchedule;
use crate::params::{CHAINING_WORDS, GRID_SIZE, ROUNDS, WORD_SIZE};

/// 4 x 4 grid of Words, indexed `[row][col]`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateGrid {
    cells: [[Word; GRID_SIZE]; GRID_SIZE],
}

impl StateGrid {
    /// Lay out the chaining value and message block as in the module diagram
    pub fn new(v: &ChainingValue, block: &Block) -> Self {
        let mut cells = [[[0u8; WORD_SIZE]; GRID_SIZE]; GRID_SIZE];
        for (row, cells_row) in cells.iter_mut().enumerate() {
            cells_row[0] = v[row];
            cells_row[1] = v[row + GRID_SIZE];
            cells_row[2] = block[row];
            cells_row[3] = block[row + GRID_SIZE];
        }
        Self { cells }
    }

    /// Word at `(row, col)`
    #[inline(always)]
    pub fn word(&self, row: usize, col: usize) -> &Word {
        &self.cells[row][col]
    }

    /// One full round of the big permutation
    pub fn round(&mut self, keys: &mut KeySchedule) {
        self.sub_words(keys);
        self.shift_rows();
        self.mix_columns();
    }

    /// BIG.SubWords: two AES rounds per Word, counter key then salt
    pub fn sub_words(&mut self, keys: &mut KeySchedule) {
        let salt = *keys.salt();
        for word in self.cells.iter_mut().flatten() {
            let key = keys.next_primary_key();
            aesenc(word, &key);
            aesenc(word, &salt);
        }
    }

    /// BIG.ShiftRows: grid row `r` rotates left by `r` whole Words
    pub fn shift_rows(&mut self) {
        for (r, row) in self.cells.iter_mut().enumerate() {
            row.rotate_left(r);
        }
    }

    /// BIG.MixColumns: for every grid column and byte position, mix the four
    /// bytes found at that position in the column's four Words
    pub fn mix_columns(&mut self) {
        for col in 0..GRID_SIZE {
            for i in 0..WORD_SIZE {
                let mixed = mix_column(
                    self.cells[0][col][i],
                    self.cells[1][col][i],
                    self.cells[2][col][i],
                    self.cells[3][col][i],
                );
                for (row, byte) in mixed.into_iter().enumerate() {
                    self.cells[row][col][i] = byte;
                }
            }
        }
    }

    /// Flat bytes, row by row, for tracing
    fn to_hex(&self) -> String {
        let mut bytes = [0u8; GRID_SIZE * GRID_SIZE * WORD_SIZE];
        for (chunk, word) in bytes.chunks_exact_mut(WORD_SIZE).zip(self.cells.iter().flatten()) {
            chunk.copy_from_slice(word);
        }
        hex::encode_upper(bytes)
    }
}

/// Compress one block into the chaining value
///
/// Advances `keys` by [`crate::params::KEYS_PER_COMPRESSION`] steps.
pub fn compress1024(v: &ChainingValue, block: &Block, keys: &mut KeySchedule) -> ChainingValue {
    let mut grid = StateGrid::new(v, block);

    for round in 0..ROUNDS {
        grid.round(keys);
        if tracing::enabled!(tracing::Level::TRACE) {
            tracing::trace!(round, state = %grid.to_hex(), "big round");
        }
    }

    big_final(&grid, v, block)
}

/// BIG.Final: `V'[i] = V[i] ^ M[i] ^ S[i mod 4][j] ^ S[i mod 4][l]`
/// with `(j, l) = (0, 2)` for the first four Words and `(1, 3)` after
fn big_final(grid: &StateGrid, v: &ChainingValue, block: &Block) -> ChainingValue {
    let mut out = [[0u8; WORD_SIZE]; CHAINING_WORDS];
    for (i, word) in out.iter_mut().enumerate() {
        let (j, l) = if i < GRID_SIZE { (0, 2) } else { (1, 3) };
        let row = i % GRID_SIZE;
        *word = xor_words(
            &xor_words(&v[i], &block[i]),
            &xor_words(grid.word(row, j), grid.word(row, l)),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{IV_WORD, KEYS_PER_COMPRESSION};

    fn sample_block() -> Block {
        core::array::from_fn(|j| core::array::from_fn(|k| (j * 16 + k) as u8))
    }

    #[test]
    fn test_grid_layout() {
        let v: ChainingValue = core::array::from_fn(|i| [i as u8; 16]);
        let block: Block = core::array::from_fn(|i| [0x10 + i as u8; 16]);
        let grid = StateGrid::new(&v, &block);

        for row in 0..4 {
            assert_eq!(grid.word(row, 0), &v[row]);
            assert_eq!(grid.word(row, 1), &v[row + 4]);
            assert_eq!(grid.word(row, 2), &block[row]);
            assert_eq!(grid.word(row, 3), &block[row + 4]);
        }
    }

    #[test]
    fn test_grid_shift_rows() {
        let v: ChainingValue = core::array::from_fn(|i| [i as u8; 16]);
        let block: Block = core::array::from_fn(|i| [0x10 + i as u8; 16]);
        let original = StateGrid::new(&v, &block);

        let mut grid = original.clone();
        grid.shift_rows();
        // row 1 moves left by one Word: [v5, m1, m5, v1]
        assert_eq!(grid.word(1, 0), &v[5]);
        assert_eq!(grid.word(1, 3), &v[1]);
        assert_eq!(grid.word(0, 0), &v[0]);
        assert_eq!(grid.word(3, 0), &block[7]);

        for _ in 0..3 {
            grid.shift_rows();
        }
        assert_eq!(grid, original);
    }

    #[test]
    fn test_grid_mix_columns_writes_back() {
        let v = [[0u8; 16]; 8];
        let mut block = [[0u8; 16]; 8];
        block[0][5] = 1;
        let mut grid = StateGrid::new(&v, &block);
        grid.mix_columns();

        // column 2 holds m0..m3; byte 5 of m0 was 1
        assert_eq!(grid.word(0, 2)[5], 2);
        assert_eq!(grid.word(1, 2)[5], 1);
        assert_eq!(grid.word(2, 2)[5], 1);
        assert_eq!(grid.word(3, 2)[5], 3);
        assert_eq!(grid.word(0, 0), &[0u8; 16]);
    }

    #[test]
    fn test_compress_advances_key_schedule() {
        let v = [IV_WORD; 8];
        let mut keys = KeySchedule::new([0u8; 16]);
        compress1024(&v, &sample_block(), &mut keys);
        assert_eq!(keys.peek()[0], (KEYS_PER_COMPRESSION % 256) as u8);
    }

    #[test]
    fn test_compress_is_deterministic_for_fresh_schedules() {
        let v = [IV_WORD; 8];
        let block = sample_block();

        let a = compress1024(&v, &block, &mut KeySchedule::new([3u8; 16]));
        let b = compress1024(&v, &block, &mut KeySchedule::new([3u8; 16]));
        assert_eq!(a, b);
        assert_ne!(a, v);
    }

    #[test]
    fn test_compress_depends_on_key_and_every_block_word() {
        let v = [IV_WORD; 8];
        let block = sample_block();
        let base = compress1024(&v, &block, &mut KeySchedule::new([0u8; 16]));

        let other_key = compress1024(&v, &block, &mut KeySchedule::new([1u8; 16]));
        assert_ne!(base, other_key);

        for j in 0..8 {
            let mut tweaked = block;
            tweaked[j][0] ^= 1;
            let out = compress1024(&v, &tweaked, &mut KeySchedule::new([0u8; 16]));
            assert_ne!(base, out, "block word {} has no effect", j);
        }
    }
}
