//! Prover configuration
//!
//! Read from a JSON file; missing fields take their defaults.

use std::ops::Range;
use std::path::Path;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::proof::parse_hex;

/// Default difficulty (16 means 4 rounds and 4 trailing zero bits)
pub const DEFAULT_DIFFICULTY: u64 = 16;

/// Default number of nonces searched per run
pub const DEFAULT_NONCE_SPAN: u64 = 1 << 32;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid hex integer: {0:?}")]
    InvalidHex(String),
}

/// Mining and verification settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProverConfig {
    /// Difficulty used when no assessor is consulted
    pub difficulty: u64,
    /// Worker threads; `None` uses every CPU
    pub threads: Option<usize>,
    /// First nonce to try
    pub nonce_start: u64,
    /// Number of nonces to try
    pub nonce_span: u64,
    /// Merkle root to mine against, as hex
    pub merkle_root: String,
}

impl Default for ProverConfig {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
            threads: None,
            nonce_start: 0,
            nonce_span: DEFAULT_NONCE_SPAN,
            merkle_root: "0".to_string(),
        }
    }
}

impl ProverConfig {
    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        tracing::debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }

    /// Parse from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Save as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// The configured Merkle root as an integer
    pub fn merkle_root(&self) -> Result<BigUint, ConfigError> {
        parse_hex(&self.merkle_root).ok_or_else(|| ConfigError::InvalidHex(self.merkle_root.clone()))
    }

    /// Nonces to search, clamped at `u64::MAX`
    pub fn nonce_range(&self) -> Range<u64> {
        self.nonce_start..self.nonce_start.saturating_add(self.nonce_span)
    }
}
