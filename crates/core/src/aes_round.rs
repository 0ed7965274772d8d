//! Single AES rounds on one Word
//!
//! The step functions below are the reference implementation. The
//! compressor calls [`aesenc`], which with the `accelerated` feature runs
//! the same round through RustCrypto's hazmat API (AES-NI / ARMv8 crypto
//! extensions when the CPU has them) and otherwise falls back to
//! [`encrypt_one_round`].

use crate::codec::Word;
use crate::gf::mix_column;

/// One AESENC round: SubBytes + ShiftRows + MixColumns + AddRoundKey, in place
#[inline(always)]
pub fn aesenc(word: &mut Word, key: &Word) {
    #[cfg(feature = "accelerated")]
    {
        aesenc_hazmat(word, key)
    }

    #[cfg(not(feature = "accelerated"))]
    {
        *word = encrypt_one_round(*word, key)
    }
}

#[cfg(feature = "accelerated")]
#[inline(always)]
fn aesenc_hazmat(word: &mut Word, key: &Word) {
    let mut block = aes::Block::from(*word);
    aes::hazmat::cipher_round(&mut block, &aes::Block::from(*key));
    word.copy_from_slice(&block);
}

/// Software AES round
#[inline(always)]
pub fn encrypt_one_round(mut word: Word, key: &Word) -> Word {
    substitute(&mut word);
    shift_rows(&mut word);
    mix_columns(&mut word);
    add_round_key(&mut word, key);
    word
}

/// SubBytes
#[inline(always)]
pub fn substitute(word: &mut Word) {
    for byte in word.iter_mut() {
        *byte = SBOX[*byte as usize];
    }
}

/// ShiftRows: row `r` of the column-major matrix rotates left by `r`
#[inline(always)]
pub fn shift_rows(word: &mut Word) {
    let t = *word;
    for col in 0..4 {
        for row in 1..4 {
            word[col * 4 + row] = t[((col + row) % 4) * 4 + row];
        }
    }
}

/// MixColumns, written back into `word`
#[inline(always)]
pub fn mix_columns(word: &mut Word) {
    for column in word.chunks_exact_mut(4) {
        let mixed = mix_column(column[0], column[1], column[2], column[3]);
        column.copy_from_slice(&mixed);
    }
}

/// AddRoundKey
#[inline(always)]
pub fn add_round_key(word: &mut Word, key: &Word) {
    for (byte, k) in word.iter_mut().zip(key) {
        *byte ^= k;
    }
}

/// AES S-box
pub const SBOX: [u8; 256] = [
    0x63, 0x7c, 0x77, 0x7b, 0xf2, 0x6b, 0x6f, 0xc5, 0x30, 0x01, 0x67, 0x2b, 0xfe, 0xd7, 0xab, 0x76,
    0xca, 0x82, 0xc9, 0x7d, 0xfa, 0x59, 0x47, 0xf0, 0xad, 0xd4, 0xa2, 0xaf, 0x9c, 0xa4, 0x72, 0xc0,
    0xb7, 0xfd, 0x93, 0x26, 0x36, 0x3f, 0xf7, 0xcc, 0x34, 0xa5, 0xe5, 0xf1, 0x71, 0xd8, 0x31, 0x15,
    0x04, 0xc7, 0x23, 0xc3, 0x18, 0x96, 0x05, 0x9a, 0x07, 0x12, 0x80, 0xe2, 0xeb, 0x27, 0xb2, 0x75,
    0x09, 0x83, 0x2c, 0x1a, 0x1b, 0x6e, 0x5a, 0xa0, 0x52, 0x3b, 0xd6, 0xb3, 0x29, 0xe3, 0x2f, 0x84,
    0x53, 0xd1, 0x00, 0xed, 0x20, 0xfc, 0xb1, 0x5b, 0x6a, 0xcb, 0xbe, 0x39, 0x4a, 0x4c, 0x58, 0xcf,
    0xd0, 0xef, 0xaa, 0xfb, 0x43, 0x4d, 0x33, 0x85, 0x45, 0xf9, 0x02, 0x7f, 0x50, 0x3c, 0x9f, 0xa8,
    0x51, 0xa3, 0x40, 0x8f, 0x92, 0x9d, 0x38, 0xf5, 0xbc, 0xb6, 0xda, 0x21, 0x10, 0xff, 0xf3, 0xd2,
    0xcd, 0x0c, 0x13, 0xec, 0x5f, 0x97, 0x44, 0x17, 0xc4, 0xa7, 0x7e, 0x3d, 0x64, 0x5d, 0x19, 0x73,
    0x60, 0x81, 0x4f, 0xdc, 0x22, 0x2a, 0x90, 0x88, 0x46, 0xee, 0xb8, 0x14, 0xde, 0x5e, 0x0b, 0xdb,
    0xe0, 0x32, 0x3a, 0x0a, 0x49, 0x06, 0x24, 0x5c, 0xc2, 0xd3, 0xac, 0x62, 0x91, 0x95, 0xe4, 0x79,
    0xe7, 0xc8, 0x37, 0x6d, 0x8d, 0xd5, 0x4e, 0xa9, 0x6c, 0x56, 0xf4, 0xea, 0x65, 0x7a, 0xae, 0x08,
    0xba, 0x78, 0x25, 0x2e, 0x1c, 0xa6, 0xb4, 0xc6, 0xe8, 0xdd, 0x74, 0x1f, 0x4b, 0xbd, 0x8b, 0x8a,
    0x70, 0x3e, 0xb5, 0x66, 0x48, 0x03, 0xf6, 0x0e, 0x61, 0x35, 0x57, 0xb9, 0x86, 0xc1, 0x1d, 0x9e,
    0xe1, 0xf8, 0x98, 0x11, 0x69, 0xd9, 0x8e, 0x94, 0x9b, 0x1e, 0x87, 0xe9, 0xce, 0x55, 0x28, 0xdf,
    0x8c, 0xa1, 0x89, 0x0d, 0xbf, 0xe6, 0x42, 0x68, 0x41, 0x99, 0x2d, 0x0f, 0xb0, 0x54, 0xbb, 0x16,
];

#[cfg(test)]
mod tests {
    use super::*;

    // FIPS-197 Appendix B, round 1 (flat, column-major)
    const ROUND1_START: Word = [
        0x19, 0x3d, 0xe3, 0xbe, 0xa0, 0xf4, 0xe2, 0x2b, 0x9a, 0xc6, 0x8d, 0x2a, 0xe9, 0xf8, 0x48,
        0x08,
    ];
    const AFTER_SUB_BYTES: Word = [
        0xd4, 0x27, 0x11, 0xae, 0xe0, 0xbf, 0x98, 0xf1, 0xb8, 0xb4, 0x5d, 0xe5, 0x1e, 0x41, 0x52,
        0x30,
    ];
    const AFTER_SHIFT_ROWS: Word = [
        0xd4, 0xbf, 0x5d, 0x30, 0xe0, 0xb4, 0x52, 0xae, 0xb8, 0x41, 0x11, 0xf1, 0x1e, 0x27, 0x98,
        0xe5,
    ];
    const AFTER_MIX_COLUMNS: Word = [
        0x04, 0x66, 0x81, 0xe5, 0xe0, 0xcb, 0x19, 0x9a, 0x48, 0xf8, 0xd3, 0x7a, 0x28, 0x06, 0x26,
        0x4c,
    ];
    const ROUND1_KEY: Word = [
        0xa0, 0xfa, 0xfe, 0x17, 0x88, 0x54, 0x2c, 0xb1, 0x23, 0xa3, 0x39, 0x39, 0x2a, 0x6c, 0x76,
        0x05,
    ];
    const ROUND2_START: Word = [
        0xa4, 0x9c, 0x7f, 0xf2, 0x68, 0x9f, 0x35, 0x2b, 0x6b, 0x5b, 0xea, 0x43, 0x02, 0x6a, 0x50,
        0x49,
    ];

    #[test]
    fn test_fips197_round_steps() {
        let mut w = ROUND1_START;
        substitute(&mut w);
        assert_eq!(w, AFTER_SUB_BYTES);
        shift_rows(&mut w);
        assert_eq!(w, AFTER_SHIFT_ROWS);
        mix_columns(&mut w);
        assert_eq!(w, AFTER_MIX_COLUMNS);
        add_round_key(&mut w, &ROUND1_KEY);
        assert_eq!(w, ROUND2_START);
    }

    #[test]
    fn test_fips197_full_round() {
        assert_eq!(encrypt_one_round(ROUND1_START, &ROUND1_KEY), ROUND2_START);
    }

    #[test]
    fn test_shift_rows_order_four() {
        let original: Word = core::array::from_fn(|i| (i * 17 + 3) as u8);
        let mut w = original;
        shift_rows(&mut w);
        assert_ne!(w, original);
        for _ in 0..3 {
            shift_rows(&mut w);
        }
        assert_eq!(w, original);
    }

    #[test]
    fn test_shift_rows_keeps_row_zero() {
        let original: Word = core::array::from_fn(|i| i as u8);
        let mut w = original;
        shift_rows(&mut w);
        for col in 0..4 {
            assert_eq!(w[col * 4], original[col * 4]);
        }
    }

    #[test]
    fn test_mix_columns_writes_back() {
        let mut w = [0u8; 16];
        w[0] = 1;
        mix_columns(&mut w);
        assert_eq!(&w[0..4], &[2, 1, 1, 3]);
        assert!(w[4..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_aesenc_matches_software_reference() {
        let cases: [(Word, Word); 4] = [
            ([0u8; 16], [0u8; 16]),
            ([0xFF; 16], [0xFF; 16]),
            (ROUND1_START, ROUND1_KEY),
            (
                [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16],
                [16, 15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1],
            ),
        ];

        for (i, (state, key)) in cases.iter().enumerate() {
            let mut fast = *state;
            aesenc(&mut fast, key);
            let reference = encrypt_one_round(*state, key);
            assert_eq!(
                fast, reference,
                "aesenc mismatch on case {}: fast={:02x?} ref={:02x?}",
                i, fast, reference
            );
        }
    }
}
