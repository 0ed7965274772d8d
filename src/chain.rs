//! Collaborators consulted while validating proofs
//!
//! The ledger, difficulty policy and reward accounting live outside this
//! crate. Validation only needs the read operations below; `MemoryChain`
//! and `FixedDifficulty` are minimal implementations for tests and the CLI.

use std::time::SystemTime;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::proof::EchoProof;

/// Symbol of the default asset
pub const DEFAULT_ASSET: &str = "ECHO";

/// Kinds of proof a chain records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ProofKind {
    /// Iterated ECHO-512 proof of work
    Echo,
}

/// Asset a reward is paid in
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Asset {
    /// Ticker symbol
    pub symbol: String,
}

impl Asset {
    /// Asset with the given symbol
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }
}

impl Default for Asset {
    fn default() -> Self {
        Self::new(DEFAULT_ASSET)
    }
}

/// Reward granted for a valid proof
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reward {
    asset: Asset,
    amount: BigUint,
}

impl Reward {
    /// Reward of `amount` units of `asset`
    pub fn new(asset: Asset, amount: BigUint) -> Self {
        Self { asset, amount }
    }

    /// Asset the reward is paid in
    pub fn asset(&self) -> &Asset {
        &self.asset
    }

    /// Amount in units of the asset
    pub fn amount(&self) -> &BigUint {
        &self.amount
    }
}

/// Read access to the ledger
pub trait Chain {
    /// Proofs of a kind recorded on the chain, optionally with pending ones
    fn proofs(&self, kind: ProofKind, include_pending: bool) -> Vec<EchoProof>;

    /// Current Merkle root over the recorded proofs
    fn merkle_root(&self) -> BigUint;
}

/// Difficulty policy
pub trait DifficultyAssessor {
    /// Difficulty in force for `kind` at `moment`
    fn difficulty(&self, kind: ProofKind, moment: SystemTime) -> u64;
}

/// Constant difficulty, independent of time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDifficulty(pub u64);

impl DifficultyAssessor for FixedDifficulty {
    fn difficulty(&self, _kind: ProofKind, _moment: SystemTime) -> u64 {
        self.0
    }
}

/// In-memory ledger with an externally supplied Merkle root
#[derive(Debug, Clone, Default)]
pub struct MemoryChain {
    recorded: Vec<EchoProof>,
    pending: Vec<EchoProof>,
    merkle_root: BigUint,
}

impl MemoryChain {
    /// Empty chain with the given root
    pub fn new(merkle_root: BigUint) -> Self {
        Self {
            merkle_root,
            ..Self::default()
        }
    }

    /// Current root
    pub fn root(&self) -> &BigUint {
        &self.merkle_root
    }

    /// Replace the root (root computation happens elsewhere)
    pub fn set_merkle_root(&mut self, merkle_root: BigUint) {
        self.merkle_root = merkle_root;
    }

    /// Record a validated proof
    pub fn record(&mut self, proof: EchoProof) {
        self.recorded.push(proof);
    }

    /// Queue a validated proof that is not yet recorded
    pub fn add_pending(&mut self, proof: EchoProof) {
        self.pending.push(proof);
    }
}

impl Chain for MemoryChain {
    fn proofs(&self, kind: ProofKind, include_pending: bool) -> Vec<EchoProof> {
        match kind {
            ProofKind::Echo => {
                let mut proofs = self.recorded.clone();
                if include_pending {
                    proofs.extend(self.pending.iter().cloned());
                }
                proofs
            }
        }
    }

    fn merkle_root(&self) -> BigUint {
        self.merkle_root.clone()
    }
}
