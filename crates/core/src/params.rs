//! ECHO-512 Algorithm Parameters
//!
//! Sizes are in bytes unless stated otherwise.

/// Bytes per Word (one AES state)
pub const WORD_SIZE: usize = 16;

/// Words per message block
pub const WORDS_PER_BLOCK: usize = 8;

/// Message block size (1024 bits)
pub const BLOCK_SIZE: usize = WORD_SIZE * WORDS_PER_BLOCK;

/// Words per chaining value (1024 bits)
pub const CHAINING_WORDS: usize = 8;

/// Side length of the state grid (4 x 4 Words, 2048 bits)
pub const GRID_SIZE: usize = 4;

/// Permutation rounds per compression
pub const ROUNDS: usize = 10;

/// Primary keys consumed per compression (one per grid Word per round)
pub const KEYS_PER_COMPRESSION: usize = ROUNDS * GRID_SIZE * GRID_SIZE;

/// Output size in bits
pub const DIGEST_BITS: u32 = 512;

/// Output size in bytes
pub const DIGEST_SIZE: usize = DIGEST_BITS as usize / 8;

/// Words of the final chaining value that form the digest
pub const DIGEST_WORDS: usize = DIGEST_SIZE / WORD_SIZE;

/// Padding overhead: marker byte budget + 16-bit size tag + 128-bit length field
pub const PADDING_OVERHEAD: usize = 18;

/// Size of the trailing bit-length field
pub const LENGTH_FIELD_SIZE: usize = 16;

/// Output size tag written in front of the length field (512 as a 16-bit value)
pub const HSIZE_TAG: [u8; 2] = [0x00, 0x02];

/// Single terminating marker bit, byte aligned
pub const PADDING_MARKER: u8 = 0x80;

/// Initial value of every chaining Word: 512 as a 128-bit little-endian integer
pub const IV_WORD: [u8; WORD_SIZE] = [0x00, 0x02, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];

/// Fixed salt applied as the second AES round key for every Word
pub const SALT: [u8; WORD_SIZE] = [0u8; WORD_SIZE];
