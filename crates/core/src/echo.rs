//! ECHO-512 hash driver
//!
//! Pads the message, seeds a fresh key schedule from the length field,
//! folds every block into the chaining value starting from the IV and
//! emits the first four Words as the digest.

#[cfg(not(feature = "std"))]
use alloc::string::String;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use core::fmt;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::codec::ChainingValue;
use crate::compress::compress1024;
use crate::key_schedule::KeySchedule;
use crate::padding::pad;
use crate::params::{CHAINING_WORDS, DIGEST_BITS, DIGEST_SIZE, DIGEST_WORDS, IV_WORD, WORD_SIZE};

/// Initial chaining value: every Word encodes the 512-bit output size
pub const IV: ChainingValue = [IV_WORD; CHAINING_WORDS];

/// A 512-bit ECHO digest
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; DIGEST_SIZE]);

impl Digest {
    /// Take the first four Words of a final chaining value
    fn from_chaining_value(v: &ChainingValue) -> Self {
        let mut bytes = [0u8; DIGEST_SIZE];
        for (chunk, word) in bytes.chunks_exact_mut(WORD_SIZE).zip(&v[..DIGEST_WORDS]) {
            chunk.copy_from_slice(word);
        }
        Self(bytes)
    }

    /// Wrap raw digest bytes
    pub const fn from_bytes(bytes: [u8; DIGEST_SIZE]) -> Self {
        Self(bytes)
    }

    /// Raw digest bytes, most significant first
    pub fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }

    /// 128 uppercase hex characters
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }

    /// Number of zero bits below the lowest set bit, reading the digest as a
    /// big-endian integer. An all-zero digest counts all 512 bits.
    pub fn trailing_zero_bits(&self) -> u32 {
        let mut zero_bits = 0u32;

        for byte in self.0.iter().rev() {
            if *byte == 0 {
                zero_bits += 8;
            } else {
                zero_bits += byte.trailing_zeros();
                break;
            }
        }

        zero_bits.min(DIGEST_BITS)
    }

    /// Check the digest against a trailing-zero-bit target
    ///
    /// # Example
    ///
    /// ```rust
    /// use echo_core::digest;
    ///
    /// let d = digest(b"abc");
    /// assert!(d.meets_difficulty(0));
    /// assert_eq!(d.meets_difficulty(4), d.trailing_zero_bits() >= 4);
    /// ```
    #[inline(always)]
    pub fn meets_difficulty(&self, zero_bits: u32) -> bool {
        self.trailing_zero_bits() >= zero_bits
    }
}

impl From<Digest> for [u8; DIGEST_SIZE] {
    fn from(d: Digest) -> Self {
        d.0
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self)
    }
}

/// Compute the ECHO-512 digest of a message
pub fn digest(input: &[u8]) -> Digest {
    let padded = pad(input);

    // Call-scoped; never shared with another computation
    let mut keys = KeySchedule::new(padded.length_field());

    let mut v = IV;
    for (index, block) in padded.blocks().iter().enumerate() {
        v = compress1024(&v, block, &mut keys);
        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!(block = index, chaining = %hex::encode_upper(v.concat()), "compressed block");
        }
    }

    Digest::from_chaining_value(&v)
}

/// Compute the ECHO-512 digest of a message as 128 uppercase hex characters
pub fn hash(input: &[u8]) -> String {
    digest(input).to_hex()
}

/// Hash independent messages, in parallel when the `parallel` feature is on
///
/// Each message gets its own key schedule, so results are identical to
/// calling [`digest`] on each input in turn.
pub fn hash_batch<T: AsRef<[u8]> + Sync>(inputs: &[T]) -> Vec<Digest> {
    #[cfg(feature = "parallel")]
    {
        inputs.par_iter().map(|m| digest(m.as_ref())).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        inputs.iter().map(|m| digest(m.as_ref())).collect()
    }
}
