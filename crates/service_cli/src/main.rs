//! Exposure CLI - Swap Counterparty Exposure Simulation
//!
//! Operational entry point for simulating the expected positive and
//! negative exposure profile of a vanilla interest rate swap under
//! Hull-White one-factor short rates.
//!
//! # Commands
//!
//! - `exposure run` - Simulate paths, revalue the swap and write the EPE/ENE report
//! - `exposure check` - Validate configuration and market data
//!
//! # Configuration
//!
//! Settings are resolved from, highest priority first: command line flags,
//! `EXPOSURE_*` environment variables, the TOML file given by `--config`,
//! built-in defaults.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pricer_xva::MissingPathPolicy;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;

pub use error::{CliError, Result};

use config::{build_config, CliOverrides};

/// Swap exposure simulation CLI
#[derive(Parser)]
#[command(name = "exposure")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "EXPOSURE_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate paths and compute the EPE/ENE profile
    Run(RunArgs),

    /// Check configuration and market data without simulating
    Check,
}

#[derive(Args, Default)]
struct RunArgs {
    /// Number of Monte Carlo paths
    #[arg(short = 'n', long)]
    n_paths: Option<usize>,

    /// Random seed for reproducible paths
    #[arg(short, long)]
    seed: Option<u64>,

    /// Market discount curve CSV (date,discount_factor)
    #[arg(short, long)]
    market_curve: Option<PathBuf>,

    /// Directory for per-path results; kept in memory when omitted
    #[arg(long)]
    store_dir: Option<PathBuf>,

    /// Output report path
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Worker threads (0 = one per core)
    #[arg(short = 'j', long)]
    worker_threads: Option<usize>,

    /// What to do with paths missing at the gather deadline (fail, exclude)
    #[arg(long)]
    missing_path_policy: Option<MissingPathPolicy>,
}

impl RunArgs {
    fn into_overrides(self, log_level: Option<String>) -> CliOverrides {
        CliOverrides {
            log_level,
            n_paths: self.n_paths,
            seed: self.seed,
            market_curve: self.market_curve,
            store_dir: self.store_dir,
            report: self.report,
            worker_threads: self.worker_threads,
            missing_path_policy: self.missing_path_policy,
        }
    }
}

/// Initialise tracing subscriber
fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match (cli.log_level, cli.verbose) {
        (Some(level), _) => Some(level),
        (None, true) => Some("debug".to_string()),
        (None, false) => None,
    };
    let (overrides, run) = match cli.command {
        Commands::Run(args) => (args.into_overrides(log_level), true),
        Commands::Check => (RunArgs::default().into_overrides(log_level), false),
    };

    let config = build_config(cli.config.as_deref(), &overrides)?;
    init_tracing(config.log_level.as_filter_str());

    match &cli.config {
        Some(path) => info!(config = %path.display(), "configuration loaded"),
        None => info!("using default configuration"),
    }
    debug!(?config, "resolved configuration");

    if run {
        commands::run::run(&config)
    } else {
        commands::check::run(&config)
    }
}
