//! # ECHO-512 Core Algorithm
//!
//! ECHO is an AES-permutation based hash function submitted to round 2 of
//! the SHA-3 competition. This crate implements the 512-bit variant.
//!
//! ## Structure
//!
//! - **Padding**: `M || 0x80 || 0.. || Hsize || L` to a multiple of 1024 bits
//! - **State**: 1024-bit chaining value + 1024-bit message block laid out
//!   as a 4 x 4 grid of 128-bit Words
//! - **Permutation**: 10 rounds of BIG.SubWords (two AES rounds per Word),
//!   BIG.ShiftRows and BIG.MixColumns over GF(2^8)
//! - **Output**: first 512 bits of the final chaining value
//!
//! ## Example
//!
//! ```rust
//! use echo_core::{digest, hash};
//!
//! let hex = hash(b"input data");
//! assert_eq!(hex.len(), 128);
//!
//! // Trailing zero bits of the digest read as a big-endian integer
//! let d = digest(b"input data");
//! println!("{} has {} trailing zero bits", d, d.trailing_zero_bits());
//! ```
//!
//! ## no_std Support
//!
//! This crate supports `no_std` environments with the `alloc` crate:
//!
//! ```toml
//! [dependencies]
//! echo-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod aes_round;
pub mod codec;
pub mod compress;
mod echo;
pub mod gf;
pub mod key_schedule;
pub mod padding;
mod params;

pub use echo::{Digest, IV, digest, hash, hash_batch};
pub use params::*;
