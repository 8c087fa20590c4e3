//! Tribunal operator CLI: configuration checks, compensation trees,
//! challenge signing and snapshot inspection.

mod logging;
mod payouts;

use anyhow::Context;
use clap::Parser;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tribunal_arbitration::identity::sign_challenge;
use tribunal_arbitration::{ArbitrationConfig, DomainSeparator, EngineSnapshot};
use tribunal_crypto::keypair_from_seed;
use tribunal_types::{Address, ChainId, ClaimId};

use crate::logging::{init_logging, LogFormat};

#[derive(Parser)]
#[command(name = "tribunal", about = "Impact-claim dispute arbitration tooling")]
struct Cli {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "info", env = "TRIBUNAL_LOG_LEVEL")]
    log_level: String,

    /// Log output format.
    #[arg(long, value_enum, default_value = "human", env = "TRIBUNAL_LOG_FORMAT")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Engine configuration files.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Off-chain compensation distributions.
    Compensation {
        #[command(subcommand)]
        action: CompensationAction,
    },
    /// Challenge authorisations.
    Challenge {
        #[command(subcommand)]
        action: ChallengeAction,
    },
    /// Engine snapshots.
    Snapshot {
        #[command(subcommand)]
        action: SnapshotAction,
    },
}

#[derive(clap::Subcommand)]
enum ConfigAction {
    /// Parse and validate a TOML config file.
    Check { path: PathBuf },
    /// Print the default configuration as TOML.
    Default,
}

#[derive(clap::Subcommand)]
enum CompensationAction {
    /// Build a Merkle root and proofs from a JSON payouts file.
    Build { payouts: PathBuf },
    /// Check one claim against a published root.
    Verify {
        #[arg(long)]
        root: String,
        #[arg(long)]
        recipient: Address,
        #[arg(long)]
        amount: u128,
        /// Sibling hashes, comma-separated, leaf to root.
        #[arg(long, value_delimiter = ',')]
        proof: Vec<String>,
    },
}

#[derive(clap::Subcommand)]
enum ChallengeAction {
    /// Sign an authorisation to challenge a claim.
    Sign {
        /// 32-byte ed25519 seed, hex.
        #[arg(long, env = "TRIBUNAL_CHALLENGER_SEED", hide_env_values = true)]
        seed: String,
        #[arg(long)]
        claim: ClaimId,
        #[arg(long)]
        defendant: Address,
        #[arg(long, default_value_t = ChainId::DEV.0)]
        chain_id: u64,
        /// Engine config supplying the signing domain and engine account.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(clap::Subcommand)]
enum SnapshotAction {
    /// Summarise a snapshot file.
    Inspect { path: PathBuf },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format, &cli.log_level);

    match cli.command {
        Command::Config { action } => match action {
            ConfigAction::Check { path } => {
                let config = load_config(&path)?;
                config
                    .validate()
                    .with_context(|| format!("invalid config {}", path.display()))?;
                tracing::info!(path = %path.display(), "config is valid");
                println!("ok");
            }
            ConfigAction::Default => {
                print!("{}", ArbitrationConfig::default().to_toml_string()?);
            }
        },
        Command::Compensation { action } => match action {
            CompensationAction::Build { payouts: path } => {
                let json = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                let entries = payouts::parse_payouts(&json)?;
                let manifest = payouts::build_manifest(&entries)?;
                tracing::info!(
                    recipients = manifest.leaves.len(),
                    total = manifest.total,
                    root = %manifest.root,
                    "built compensation tree"
                );
                println!("{}", serde_json::to_string_pretty(&manifest)?);
            }
            CompensationAction::Verify {
                root,
                recipient,
                amount,
                proof,
            } => {
                let root = payouts::parse_hash(&root).context("bad --root")?;
                if payouts::verify_claim(&root, &recipient, amount, &proof)? {
                    println!("valid");
                } else {
                    anyhow::bail!("proof does not match root");
                }
            }
        },
        Command::Challenge { action } => match action {
            ChallengeAction::Sign {
                seed,
                claim,
                defendant,
                chain_id,
                config,
            } => {
                let config = match config {
                    Some(path) => load_config(&path)?,
                    None => ArbitrationConfig::default(),
                };
                let seed = payouts::parse_hash(&seed).context("bad --seed")?;
                let keypair = keypair_from_seed(&seed);
                let chain = ChainId(chain_id);
                let domain = DomainSeparator::new(
                    &config.domain_name,
                    &config.domain_version,
                    config.engine_account,
                    chain,
                );
                let auth = sign_challenge(&domain.for_chain(chain), &claim, &defendant, &keypair);
                tracing::debug!(
                    challenger = %Address::from_public_key(&keypair.public),
                    claim = %claim,
                    chain = chain_id,
                    "signed challenge"
                );
                println!("{}", serde_json::to_string_pretty(&auth)?);
            }
        },
        Command::Snapshot { action } => match action {
            SnapshotAction::Inspect { path } => {
                let bytes = std::fs::read(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                let snapshot = EngineSnapshot::from_bytes(&bytes)
                    .with_context(|| format!("failed to decode {}", path.display()))?;
                let mut by_status: BTreeMap<String, usize> = BTreeMap::new();
                for dispute in &snapshot.disputes {
                    *by_status.entry(format!("{:?}", dispute.status)).or_default() += 1;
                }
                println!("disputes: {}", snapshot.disputes.len());
                for (status, count) in &by_status {
                    println!("  {status}: {count}");
                }
                println!("pending randomness: {}", snapshot.pending_requests.len());
                println!("compensation pools: {}", snapshot.compensation.len());
                let claimed: usize = snapshot
                    .compensation
                    .iter()
                    .map(|(_, pool)| pool.claimed.len())
                    .sum();
                println!("compensation claims: {claimed}");
                let owed: u128 = snapshot
                    .outstanding
                    .iter()
                    .map(|(_, outstanding)| outstanding.amount_owed())
                    .sum();
                println!(
                    "outstanding settlements: {} (owed {owed})",
                    snapshot.outstanding.len()
                );
            }
        },
    }

    Ok(())
}

fn load_config(path: &std::path::Path) -> anyhow::Result<ArbitrationConfig> {
    let path_str = path
        .to_str()
        .with_context(|| format!("non-UTF-8 path {}", path.display()))?;
    let config = ArbitrationConfig::from_toml_file(path_str)
        .with_context(|| format!("failed to load config {}", path.display()))?;
    tracing::info!(path = %path.display(), "loaded config");
    Ok(config)
}
