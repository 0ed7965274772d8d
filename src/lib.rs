//! ECHO-512 Prover Library
//!
//! Proof-of-work validation and nonce search on top of the ECHO-512 hash.
//!
//! # Overview
//!
//! A proof is `(original, nonce, hash)`. It is valid when iterating
//! `H(value || nonce)` `floor(log2(difficulty))` times reproduces `hash` and
//! `hash` has at least that many trailing zero bits. Proofs that are not yet
//! recorded on the chain are iterated from the chain's Merkle root instead
//! of `original`.
//!
//! # Example
//!
//! ```rust
//! use echo::chain::{Asset, FixedDifficulty, MemoryChain};
//! use echo::miner::Miner;
//! use echo::proof::{EchoProof, ProofClaim, ProofContext};
//! use num_bigint::BigUint;
//!
//! let chain = MemoryChain::new(BigUint::from(0xC0FFEEu32));
//! let assessor = FixedDifficulty(4);
//!
//! // Find a nonce for the current Merkle root
//! let miner = Miner::new(2).unwrap();
//! let solution = miner.search(chain.root(), 4, 0..100_000).unwrap();
//!
//! let ctx = ProofContext { chain: &chain, assessor: &assessor };
//! let claim = ProofClaim::new(chain.root().clone(), solution.nonce, solution.hash);
//! let proof = EchoProof::now(claim, &Asset::default(), &ctx).unwrap();
//! assert!(proof.trailing_zeroes() >= 2);
//! ```

// Re-export the core algorithm
pub use echo_core as algorithm;

pub mod chain;
pub mod config;
pub mod miner;
pub mod proof;

// Convenience re-exports
pub use algorithm::{digest, hash, Digest};
pub use proof::{EchoProof, InvalidReason, ProofError};
