//! ECHO-512 CLI
//!
//! Hashes text files and mines or verifies ECHO proofs of work.
//!
//! # Usage
//!
//! - `echo <INPUT> [DEBUG]` - Print the ECHO-512 digest of a text file
//! - `mine` - Search a nonce for a Merkle root
//! - `verify` - Validate a proof
//! - `benchmark` - Measure the hash rate

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use num_bigint::BigUint;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use echo::chain::{Asset, FixedDifficulty, MemoryChain};
use echo::config::{ProverConfig, DEFAULT_DIFFICULTY};
use echo::miner::Miner;
use echo::proof::{parse_hex, EchoProof, ProofClaim, ProofContext};

/// Command line usage error
const EX_USAGE: i32 = 64;

/// Input file missing
const EX_NOINPUT: i32 = 66;

#[derive(Parser)]
#[command(name = "echo")]
#[command(author = "Cyberia")]
#[command(version)]
#[command(about = "ECHO-512 hash and proof-of-work tool")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Text file to hash
    input: Option<PathBuf>,

    /// Trace level: 0 = digest only, 1 = per block, 2 or more = per round
    #[arg(default_value_t = 0)]
    debug: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Search a nonce and print the proof record as JSON
    Mine(MineArgs),

    /// Validate a proof against an in-memory chain
    Verify(VerifyArgs),

    /// Run performance benchmark
    Benchmark {
        /// Number of hashes to compute
        #[arg(short, long, default_value = "10000")]
        count: u32,
    },
}

#[derive(Args)]
struct MineArgs {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Merkle root to mine against (hex)
    #[arg(long)]
    root: Option<String>,

    /// Difficulty (rounds and zero bits are floor(log2) of it)
    #[arg(short, long)]
    difficulty: Option<u64>,

    /// Number of threads to use (default: number of CPU cores)
    #[arg(short, long)]
    threads: Option<usize>,

    /// First nonce
    #[arg(long)]
    start: Option<u64>,

    /// Number of nonces to try
    #[arg(long)]
    span: Option<u64>,
}

#[derive(Args)]
struct VerifyArgs {
    /// Preimage (hex)
    #[arg(long)]
    original: String,

    /// Nonce
    #[arg(long)]
    nonce: u64,

    /// Claimed hash (hex)
    #[arg(long)]
    hash: String,

    /// Current Merkle root (hex)
    #[arg(long, default_value = "0")]
    root: String,

    /// Difficulty in force
    #[arg(short, long, default_value_t = DEFAULT_DIFFICULTY)]
    difficulty: u64,

    /// Record the proof on the chain before validating it
    #[arg(long)]
    recorded: bool,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayVersion => 0,
                _ => EX_USAGE,
            };
            e.print().ok();
            std::process::exit(code);
        }
    };

    let result = match cli.command {
        Some(Commands::Mine(args)) => {
            init_tracing("echo=info");
            cmd_mine(args)
        }
        Some(Commands::Verify(args)) => {
            init_tracing("echo=info");
            cmd_verify(args)
        }
        Some(Commands::Benchmark { count }) => {
            init_tracing("warn");
            cmd_benchmark(count)
        }
        None => {
            let Some(input) = cli.input else {
                eprintln!("Usage: echo <INPUT> [DEBUG]");
                std::process::exit(EX_USAGE);
            };
            if let Err(code) = check_input(&input) {
                eprintln!("Error: {} does not exist", input.display());
                std::process::exit(code);
            }
            init_tracing(hash_trace_filter(cli.debug));
            cmd_hash(&input)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Only regular files can be hashed; anything else is a missing input
fn check_input(input: &Path) -> Result<(), i32> {
    if input.is_file() {
        Ok(())
    } else {
        Err(EX_NOINPUT)
    }
}

/// Default filter for the hash command's DEBUG argument
fn hash_trace_filter(debug: u8) -> &'static str {
    match debug {
        0 => "warn",
        1 => "echo_core=debug",
        _ => "echo_core=trace",
    }
}

/// Log to stderr; `RUST_LOG` takes precedence over `default`
fn init_tracing(default: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_hash(input: &Path) -> anyhow::Result<()> {
    let bytes = std::fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let text = String::from_utf8_lossy(&bytes).replace("\r\n", "\n");

    println!("{}", echo::digest(text.as_bytes()));

    Ok(())
}

fn cmd_mine(args: MineArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ProverConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => ProverConfig::default(),
    };

    // Flags override the file
    if let Some(root) = args.root {
        config.merkle_root = root;
    }
    if let Some(difficulty) = args.difficulty {
        config.difficulty = difficulty;
    }
    if let Some(threads) = args.threads {
        config.threads = Some(threads);
    }
    if let Some(start) = args.start {
        config.nonce_start = start;
    }
    if let Some(span) = args.span {
        config.nonce_span = span;
    }

    let root = config.merkle_root()?;
    let num_threads = config.threads.unwrap_or_else(num_cpus::get);
    let nonces = config.nonce_range();

    eprintln!("=== ECHO-512 Miner ===");
    eprintln!("Merkle root: {}", config.merkle_root);
    eprintln!("Difficulty:  {}", config.difficulty);
    eprintln!("Threads:     {}", num_threads);
    eprintln!("Nonces:      {}..{}", nonces.start, nonces.end);
    eprintln!("======================");

    let miner = Miner::new(num_threads)?;
    let started = Instant::now();

    let solution = miner
        .search(&root, config.difficulty, nonces.clone())
        .ok_or_else(|| anyhow::anyhow!("No solution in nonces {}..{}", nonces.start, nonces.end))?;

    let elapsed = started.elapsed().as_secs_f64();
    let hashes = miner.hashes();
    eprintln!(
        "Found nonce {} after {} hashes ({:.0} H/s)",
        solution.nonce,
        hashes,
        if elapsed > 0.0 { hashes as f64 / elapsed } else { 0.0 }
    );

    // Run the solution through the validator to produce the record
    let chain = MemoryChain::new(root.clone());
    let assessor = FixedDifficulty(config.difficulty);
    let ctx = ProofContext {
        chain: &chain,
        assessor: &assessor,
    };
    let claim = ProofClaim::new(root, solution.nonce, solution.hash);
    let proof = EchoProof::now(claim, &Asset::default(), &ctx)?;

    println!("{}", serde_json::to_string_pretty(&proof.record())?);

    Ok(())
}

fn cmd_verify(args: VerifyArgs) -> anyhow::Result<()> {
    let original = hex_arg("original", &args.original)?;
    let hash = hex_arg("hash", &args.hash)?;
    let root = hex_arg("root", &args.root)?;

    let claim = ProofClaim::new(original, args.nonce, hash);
    let assessor = FixedDifficulty(args.difficulty);

    let chain = if args.recorded {
        chain_with_recorded(&claim, root, &assessor)?
    } else {
        MemoryChain::new(root)
    };
    let ctx = ProofContext {
        chain: &chain,
        assessor: &assessor,
    };

    let proof = EchoProof::now(claim, &Asset::default(), &ctx)?;

    println!("Valid proof");
    println!("{}", proof.tags());

    Ok(())
}

/// Chain at `root` on which `claim` is already recorded
///
/// The claim is first accepted the way it was when mined, against a chain
/// whose root was its preimage, then recorded.
fn chain_with_recorded(
    claim: &ProofClaim,
    root: BigUint,
    assessor: &FixedDifficulty,
) -> anyhow::Result<MemoryChain> {
    let at_mining = MemoryChain::new(claim.original.clone());
    let ctx = ProofContext {
        chain: &at_mining,
        assessor,
    };
    let proof = EchoProof::now(claim.clone(), &Asset::default(), &ctx)?;

    let mut chain = MemoryChain::new(root);
    chain.record(proof);
    Ok(chain)
}

fn hex_arg(name: &str, value: &str) -> anyhow::Result<BigUint> {
    parse_hex(value).ok_or_else(|| anyhow::anyhow!("--{} is not a hex integer: {:?}", name, value))
}

fn cmd_benchmark(count: u32) -> anyhow::Result<()> {
    println!("Running benchmark with {} hashes...", count);

    let input = b"benchmark input data for ECHO-512";

    let start = Instant::now();

    for i in 0..count {
        let mut data = input.to_vec();
        data.extend_from_slice(&i.to_be_bytes());
        let _ = echo::digest(&data);
    }

    let elapsed = start.elapsed();
    let hashrate = count as f64 / elapsed.as_secs_f64();

    // Same workload spread over all cores
    let batch: Vec<Vec<u8>> = (0..count)
        .map(|i| {
            let mut data = input.to_vec();
            data.extend_from_slice(&i.to_be_bytes());
            data
        })
        .collect();
    let batch_start = Instant::now();
    let _ = echo::algorithm::hash_batch(&batch);
    let batch_elapsed = batch_start.elapsed();

    println!("\nResults:");
    println!("  Total hashes: {}", count);
    println!("  Time elapsed: {:.2}s", elapsed.as_secs_f64());
    println!("  Hashrate: {:.2} H/s", hashrate);
    println!(
        "  Batch hashrate ({} threads): {:.2} H/s",
        num_cpus::get(),
        count as f64 / batch_elapsed.as_secs_f64()
    );

    println!("\nAlgorithm parameters:");
    println!("  Digest: {} bits", echo::algorithm::DIGEST_BITS);
    println!("  Block size: {} bytes", echo::algorithm::BLOCK_SIZE);
    println!("  Rounds: {}", echo::algorithm::ROUNDS);
    println!(
        "  AES rounds per block: {}",
        2 * echo::algorithm::KEYS_PER_COMPRESSION
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use echo::chain::{Chain, ProofKind};
    use echo::proof::iterate;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_debug_level_above_two_is_max_tracing() {
        let cli = Cli::try_parse_from(["echo", "input.txt", "5"]).unwrap();
        assert_eq!(cli.debug, 5);
        assert_eq!(hash_trace_filter(cli.debug), "echo_core=trace");
        assert_eq!(hash_trace_filter(1), "echo_core=debug");
        assert_eq!(hash_trace_filter(0), "warn");
    }

    #[test]
    fn test_directory_is_a_missing_input() {
        assert_eq!(check_input(&std::env::temp_dir()), Err(EX_NOINPUT));
        assert_eq!(check_input(Path::new("no/such/echo-input.txt")), Err(EX_NOINPUT));

        let path = std::env::temp_dir().join(format!("echo-cli-input-{}.txt", std::process::id()));
        std::fs::write(&path, "a").unwrap();
        let status = check_input(&path);
        std::fs::remove_file(&path).ok();
        assert_eq!(status, Ok(()));
    }

    #[test]
    fn test_chain_with_recorded_proof() {
        let original = BigUint::from(0x1234u32);
        let (nonce, hash) = (0u64..10_000)
            .map(|nonce| (nonce, iterate(&original, nonce, 2)))
            .find(|(_, hash)| hash.trailing_zeros().unwrap_or(512) >= 2)
            .unwrap();
        let claim = ProofClaim::new(original, nonce, hash.clone());
        let assessor = FixedDifficulty(4);

        let root = BigUint::from(99u32);
        let chain = chain_with_recorded(&claim, root.clone(), &assessor).unwrap();
        assert_eq!(chain.merkle_root(), root);

        let recorded = chain.proofs(ProofKind::Echo, false);
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].hash(), &hash);

        // Validates through the recorded path even though the root moved
        let ctx = ProofContext {
            chain: &chain,
            assessor: &assessor,
        };
        assert!(EchoProof::now(claim, &Asset::default(), &ctx).is_ok());
    }

    #[test]
    fn test_chain_with_recorded_rejects_bad_claim() {
        let claim = ProofClaim::new(BigUint::from(1u32), 0, BigUint::from(2u32));
        assert!(chain_with_recorded(&claim, BigUint::from(3u32), &FixedDifficulty(4)).is_err());
    }
}
