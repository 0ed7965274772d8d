//! Iterated ECHO-512 proof of work
//!
//! Each iteration hashes the signed big-endian encoding of the current value
//! followed by the 8-byte big-endian nonce, and reads the 64-byte digest back
//! as an unsigned integer.

use std::fmt;
use std::time::SystemTime;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::algorithm::{self, DIGEST_BITS};
use crate::chain::{Asset, Chain, DifficultyAssessor, ProofKind, Reward};

/// Reasons a claimed proof is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    #[error("hash does not match the iterated preimage")]
    HashMismatch,

    #[error("hash has {found} trailing zero bits, {required} required")]
    InsufficientWork { required: u32, found: u32 },

    #[error("difficulty must be at least 1")]
    ZeroDifficulty,
}

/// Proof construction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProofError {
    #[error("Invalid proof: {0}")]
    InvalidProof(#[from] InvalidReason),
}

/// The values a prover submits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofClaim {
    pub original: BigUint,
    pub nonce: u64,
    pub hash: BigUint,
}

impl ProofClaim {
    pub fn new(original: BigUint, nonce: u64, hash: BigUint) -> Self {
        Self {
            original,
            nonce,
            hash,
        }
    }
}

/// Read-only collaborators consulted during validation
#[derive(Clone, Copy)]
pub struct ProofContext<'a> {
    pub chain: &'a dyn Chain,
    pub assessor: &'a dyn DifficultyAssessor,
}

/// A validated proof of work
///
/// Only exists once validation succeeded. Two proofs are equal when their
/// hashes are equal.
#[derive(Debug, Clone)]
pub struct EchoProof {
    original: BigUint,
    nonce: u64,
    hash: BigUint,
    difficulty: u64,
    reward: Reward,
}

impl EchoProof {
    /// Validate a claim at `moment` and build the proof
    pub fn new(
        claim: ProofClaim,
        asset: &Asset,
        moment: SystemTime,
        ctx: &ProofContext<'_>,
    ) -> Result<Self, ProofError> {
        let difficulty = ctx.assessor.difficulty(ProofKind::Echo, moment);
        let required = difficulty_bits(difficulty).ok_or(InvalidReason::ZeroDifficulty)?;

        // Recorded proofs are checked against their own preimage
        let recorded = ctx
            .chain
            .proofs(ProofKind::Echo, false)
            .iter()
            .any(|p| p.hash == claim.hash);
        let start = if recorded {
            claim.original.clone()
        } else {
            ctx.chain.merkle_root()
        };

        let computed = iterate(&start, claim.nonce, required);
        if computed != claim.hash {
            tracing::debug!(nonce = claim.nonce, recorded, "rejected proof: hash mismatch");
            return Err(InvalidReason::HashMismatch.into());
        }

        let found = trailing_zero_bits(&computed);
        if found < required {
            tracing::debug!(nonce = claim.nonce, found, required, "rejected proof: insufficient work");
            return Err(InvalidReason::InsufficientWork { required, found }.into());
        }

        tracing::debug!(nonce = claim.nonce, difficulty, found, recorded, "accepted proof");

        Ok(Self {
            original: claim.original,
            nonce: claim.nonce,
            hash: claim.hash,
            difficulty,
            reward: Self::calculate_reward(asset),
        })
    }

    /// Validate a claim against the difficulty in force now
    pub fn now(claim: ProofClaim, asset: &Asset, ctx: &ProofContext<'_>) -> Result<Self, ProofError> {
        Self::new(claim, asset, SystemTime::now(), ctx)
    }

    fn calculate_reward(asset: &Asset) -> Reward {
        Reward::new(asset.clone(), BigUint::from(1u32))
    }

    pub fn original(&self) -> &BigUint {
        &self.original
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn hash(&self) -> &BigUint {
        &self.hash
    }

    pub fn difficulty(&self) -> u64 {
        self.difficulty
    }

    pub fn reward(&self) -> &Reward {
        &self.reward
    }

    /// Trailing zero bits of the stored hash
    pub fn trailing_zeroes(&self) -> u32 {
        trailing_zero_bits(&self.hash)
    }

    /// Persistable view of the proof
    pub fn record(&self) -> ProofRecord {
        ProofRecord {
            original: to_hex(&self.original),
            nonce: self.nonce,
            hash: to_hex(&self.hash),
            difficulty: self.difficulty,
            trailing_zeroes: self.trailing_zeroes(),
        }
    }

    /// Attribute string for audit output
    pub fn tags(&self) -> String {
        self.record().to_string()
    }
}

impl PartialEq for EchoProof {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for EchoProof {}

/// Persisted fields of a proof
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofRecord {
    /// Lowercase hex
    pub original: String,
    pub nonce: u64,
    /// Lowercase hex
    pub hash: String,
    pub difficulty: u64,
    pub trailing_zeroes: u32,
}

impl fmt::Display for ProofRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\t\toriginal=\"{}\"", self.original)?;
        writeln!(f, "\t\tnonce=\"{}\"", self.nonce)?;
        writeln!(f, "\t\thash=\"{}\"", self.hash)?;
        writeln!(f, "\t\tdifficulty=\"{}\"", self.difficulty)?;
        write!(f, "\t\ttrailingZeroes=\"{}\">", self.trailing_zeroes)
    }
}

/// Iteration count and required trailing zero bits: `floor(log2(difficulty))`
///
/// `None` for a difficulty of zero.
pub fn difficulty_bits(difficulty: u64) -> Option<u32> {
    difficulty.checked_ilog2()
}

/// Apply `H(value || nonce)` `rounds` times starting from `start`
pub fn iterate(start: &BigUint, nonce: u64, rounds: u32) -> BigUint {
    let mut value = start.clone();
    for _ in 0..rounds {
        value = hash_step(&value, nonce);
    }
    value
}

/// One iteration: digest of `signed_be_bytes(value) || nonce.to_be_bytes()`
pub fn hash_step(value: &BigUint, nonce: u64) -> BigUint {
    let mut input = signed_be_bytes(value);
    input.extend_from_slice(&nonce.to_be_bytes());
    BigUint::from_bytes_be(algorithm::digest(&input).as_bytes())
}

/// Minimal two's-complement big-endian encoding of a non-negative integer
///
/// Zero encodes as a single `0x00`; a leading `0x00` is added when the top
/// bit of the magnitude is set.
pub fn signed_be_bytes(value: &BigUint) -> Vec<u8> {
    let magnitude = value.to_bytes_be();
    match magnitude.first() {
        Some(&top) if top & 0x80 != 0 => {
            let mut bytes = Vec::with_capacity(magnitude.len() + 1);
            bytes.push(0);
            bytes.extend_from_slice(&magnitude);
            bytes
        }
        _ => magnitude,
    }
}

/// Trailing zero bits of an integer; zero counts as a full digest width
pub fn trailing_zero_bits(value: &BigUint) -> u32 {
    match value.trailing_zeros() {
        Some(bits) => u32::try_from(bits).unwrap_or(u32::MAX),
        None => DIGEST_BITS,
    }
}

/// Parse a hex integer, with or without a `0x` prefix
pub fn parse_hex(text: &str) -> Option<BigUint> {
    let digits = text.trim();
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(digits);
    BigUint::parse_bytes(digits.as_bytes(), 16)
}

/// Lowercase hex rendering of an integer
pub fn to_hex(value: &BigUint) -> String {
    value.to_str_radix(16)
}
