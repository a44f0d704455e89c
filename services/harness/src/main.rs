//! Pool engine walkthrough binary
//!
//! Usage:
//!   dex-harness
//!   dex-harness --config config/engine.toml --log-level debug
//!   dex-harness --fee-numerator 30 --fee-denominator 10000 --json-logs

mod scenario;

use anyhow::{Context, Result};
use clap::Parser;
use dex_config::EngineConfig;
use dex_pool::{BalanceBook, PoolEngine};
use scenario::Scenario;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dex-harness")]
#[command(about = "Run the two-provider liquidity and swap walkthrough")]
#[command(version)]
struct Args {
    /// Path to an engine configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short, long)]
    log_level: Option<String>,

    /// Enable JSON logging format
    #[arg(long)]
    json_logs: bool,

    /// Token decimals for both assets
    #[arg(long, default_value_t = 9)]
    decimals: u32,

    /// Override the default pool fee numerator
    #[arg(long)]
    fee_numerator: Option<u64>,

    /// Override the default pool fee denominator
    #[arg(long)]
    fee_denominator: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = EngineConfig::load(args.config.as_deref())?;
    if let Some(numerator) = args.fee_numerator {
        config.fees.numerator = numerator;
    }
    if let Some(denominator) = args.fee_denominator {
        config.fees.denominator = denominator;
    }
    config.validate()?;

    init_logging(&args, &config)?;

    info!("Starting dex harness");
    info!(
        "Default fee {}/{}, min initial liquidity {}",
        config.fees.numerator, config.fees.denominator, config.liquidity.min_initial_liquidity
    );

    let book = Arc::new(BalanceBook::new());
    let engine = PoolEngine::from_config(&config, book.clone(), book.clone())
        .context("Failed to build pool engine")?;

    let report = Scenario::new(engine, book, args.decimals)?
        .run()
        .map_err(|e| {
            error!("Walkthrough failed: {:#}", e);
            e
        })?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn init_logging(args: &Args, config: &EngineConfig) -> Result<()> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(config.logging.level.as_str());
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("Invalid log level '{}'", level))?;

    if args.json_logs || config.logging.json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    Ok(())
}
