//! Rolling key material for BIG.SubWords
//!
//! Every Word of the state grid is encrypted with two AES rounds: the first
//! keyed by a counter, the second by the fixed salt. The counter starts as
//! the padded message's length field and its first byte is bumped after
//! every Word, wrapping without carry.
//!
//! A schedule belongs to exactly one hash computation. It is created by
//! [`crate::digest`] and passed down by `&mut`; there is no shared state
//! between calls.

use crate::codec::Word;
use crate::params::SALT;

/// Per-hash counter key and salt
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeySchedule {
    counter: Word,
    salt: Word,
}

impl KeySchedule {
    /// Start a schedule from the padded message's length field
    pub fn new(counter: Word) -> Self {
        Self::with_salt(counter, SALT)
    }

    /// Start a schedule with an explicit salt
    pub fn with_salt(counter: Word, salt: Word) -> Self {
        Self { counter, salt }
    }

    /// Return the current counter key and advance it
    #[inline(always)]
    pub fn next_primary_key(&mut self) -> Word {
        let key = self.counter;
        self.counter[0] = self.counter[0].wrapping_add(1);
        key
    }

    /// The counter key that the next call to [`Self::next_primary_key`] returns
    pub fn peek(&self) -> &Word {
        &self.counter
    }

    /// Secondary key, identical for every Word and round
    #[inline(always)]
    pub fn salt(&self) -> &Word {
        &self.salt
    }
}
