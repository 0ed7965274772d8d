//! Parallel nonce search
//!
//! Splits a nonce range across a dedicated rayon pool and stops at the
//! first nonce whose iterated hash carries enough trailing zero bits.

use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};

use num_bigint::BigUint;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use thiserror::Error;

use crate::proof::{difficulty_bits, iterate, trailing_zero_bits};

/// Miner errors
#[derive(Error, Debug)]
pub enum MinerError {
    #[error("Failed to build thread pool: {0}")]
    ThreadPool(#[from] ThreadPoolBuildError),
}

/// A nonce that satisfies the difficulty for a given start value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub nonce: u64,
    /// Iterated hash for `nonce`
    pub hash: BigUint,
    pub trailing_zeroes: u32,
}

/// Nonce searcher backed by its own thread pool
pub struct Miner {
    pool: ThreadPool,
    hashes: AtomicU64,
}

impl Miner {
    /// Miner with `threads` workers (0 lets rayon choose)
    pub fn new(threads: usize) -> Result<Self, MinerError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("echo-miner-{}", i))
            .build()?;

        Ok(Self {
            pool,
            hashes: AtomicU64::new(0),
        })
    }

    /// Worker count
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Digest evaluations performed so far, across all searches
    pub fn hashes(&self) -> u64 {
        self.hashes.load(Ordering::Relaxed)
    }

    /// Search `nonces` for a solution at `difficulty`
    ///
    /// Returns `None` when the range is exhausted or the difficulty is zero.
    /// Any satisfying nonce may be returned, not necessarily the smallest.
    pub fn search(&self, start: &BigUint, difficulty: u64, nonces: Range<u64>) -> Option<Solution> {
        let Some(bits) = difficulty_bits(difficulty) else {
            tracing::warn!("difficulty 0 has no solutions");
            return None;
        };

        tracing::debug!(
            difficulty,
            bits,
            first = nonces.start,
            last = nonces.end,
            threads = self.threads(),
            "searching nonce range"
        );

        let hashes = &self.hashes;
        let found = self.pool.install(|| {
            nonces.into_par_iter().find_map_any(|nonce| {
                let hash = iterate(start, nonce, bits);
                hashes.fetch_add(u64::from(bits), Ordering::Relaxed);

                let trailing_zeroes = trailing_zero_bits(&hash);
                (trailing_zeroes >= bits).then_some(Solution {
                    nonce,
                    hash,
                    trailing_zeroes,
                })
            })
        });

        match &found {
            Some(solution) => tracing::info!(nonce = solution.nonce, zeros = solution.trailing_zeroes, "found solution"),
            None => tracing::info!("nonce range exhausted"),
        }

        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{Asset, FixedDifficulty, MemoryChain};
    use crate::proof::{EchoProof, ProofClaim, ProofContext};

    #[test]
    fn test_solution_meets_difficulty() {
        let miner = Miner::new(2).unwrap();
        let start = BigUint::from(0xABCDEFu32);

        let solution = miner.search(&start, 16, 0..1_000_000).unwrap();
        assert!(solution.trailing_zeroes >= 4);
        assert_eq!(iterate(&start, solution.nonce, 4), solution.hash);
        assert!(miner.hashes() >= 4);
    }

    #[test]
    fn test_solution_validates() {
        let chain = MemoryChain::new(BigUint::from(77u32));
        let assessor = FixedDifficulty(8);
        let miner = Miner::new(4).unwrap();

        let solution = miner.search(chain.root(), 8, 0..1_000_000).unwrap();

        let ctx = ProofContext { chain: &chain, assessor: &assessor };
        let claim = ProofClaim::new(chain.root().clone(), solution.nonce, solution.hash.clone());
        let proof = EchoProof::now(claim, &Asset::default(), &ctx).unwrap();
        assert_eq!(proof.hash(), &solution.hash);
    }

    #[test]
    fn test_empty_range() {
        let miner = Miner::new(1).unwrap();
        assert_eq!(miner.search(&BigUint::from(1u32), 4, 5..5), None);
        assert_eq!(miner.hashes(), 0);
    }

    #[test]
    fn test_zero_difficulty() {
        let miner = Miner::new(1).unwrap();
        assert_eq!(miner.search(&BigUint::from(1u32), 0, 0..100), None);
    }

    #[test]
    fn test_difficulty_one_accepts_start() {
        let miner = Miner::new(1).unwrap();
        let start = BigUint::from(3u32);

        // Zero rounds: any nonce works and the hash is the start value
        let solution = miner.search(&start, 1, 10..20).unwrap();
        assert!((10..20).contains(&solution.nonce));
        assert_eq!(solution.hash, start);
    }
}
