//! Cross-exchange arbitrage simulator.
//!
//! Usage:
//!   arb-sim [OPTIONS]                      run the simulation
//!   arb-sim generate-sample [OPTIONS]      write a synthetic trade history

mod config;
mod domain;
mod engine;
mod market;
mod sample;
mod storage;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{Level, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use config::{Config, ConfigError};
use domain::RunningStats;
use engine::{ArbitrageEngine, EngineConfig, EngineError};
use sample::SampleConfig;
use storage::{JsonFileStore, MemoryStore, StorageError, TradeStore};

/// CLI arguments for arb-sim.
#[derive(Parser, Debug)]
#[command(name = "arb-sim")]
#[command(about = "Simulated cross-exchange arbitrage trading")]
#[command(version)]
struct Args {
    /// Config file path (default: configs/config.yaml when present)
    #[arg(short, long)]
    config: Option<String>,

    /// Number of simulation iterations
    #[arg(long)]
    iterations: Option<usize>,

    /// Time between iterations, in seconds
    #[arg(long)]
    interval: Option<f64>,

    /// Minimum profit threshold (fraction, e.g. 0.005 for 0.5%)
    #[arg(long)]
    threshold: Option<f64>,

    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replace the trade history and stats with synthetic data
    GenerateSample {
        /// Days of history to generate
        #[arg(
            long,
            default_value_t = 30,
            value_parser = clap::value_parser!(u32).range(1..=i64::from(sample::MAX_DAYS))
        )]
        days: u32,

        /// Average trades per day
        #[arg(
            long,
            default_value_t = 5,
            value_parser = clap::value_parser!(u32).range(..=i64::from(sample::MAX_TRADES_PER_DAY))
        )]
        trades_per_day: u32,
    },
}

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

fn init_tracing(log_level: Option<&str>) {
    let level = match log_level {
        Some("debug") => Level::DEBUG,
        Some("info") => Level::INFO,
        Some("warn") | Some("warning") => Level::WARN,
        Some("error") => Level::ERROR,
        Some("trace") => Level::TRACE,
        _ => Level::INFO,
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Loads the config file and applies command-line overrides.
fn load_config(args: &Args) -> Result<Config, ConfigError> {
    let mut config = Config::load_or_default(args.config.as_deref())?;

    if let Some(iterations) = args.iterations {
        config.simulation.iterations = iterations;
    }
    if let Some(secs) = args.interval {
        config.simulation.interval = Duration::try_from_secs_f64(secs)
            .map_err(|e| ConfigError::Validation(format!("invalid --interval {}: {}", secs, e)))?;
    }
    if let Some(threshold) = args.threshold {
        config.simulation.min_profit_threshold = threshold;
    }
    if args.seed.is_some() {
        config.simulation.seed = args.seed;
    }

    config.validate()?;
    Ok(config)
}

/// Opens the JSON store, or falls back to memory so the run still completes.
async fn open_store(config: &Config) -> Arc<dyn TradeStore> {
    let initial = RunningStats::new(
        config.simulation.start_balance,
        config.simulation.asset_balance,
    );

    match JsonFileStore::open(&config.storage.to_store_config(), &initial).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!(error = %e, "Failed to open JSON storage, trades will not be persisted");
            Arc::new(MemoryStore::new(initial))
        }
    }
}

async fn run_simulation(config: &Config) -> Result<(), AppError> {
    let store = open_store(config).await;
    let exchanges = config.build_exchanges()?;

    match store.load_trades().await {
        Ok(trades) => info!(trades = trades.len(), "Loaded trade history"),
        Err(e) => warn!(error = %e, "Could not read trade history"),
    }

    let mut engine = ArbitrageEngine::new(EngineConfig::from_config(config), exchanges, store)?;
    if let Err(e) = engine.restore_balances().await {
        warn!(error = %e, "Could not restore balances, using configured start balance");
    }

    let summary = engine
        .run_simulation(config.simulation.iterations, config.simulation.interval)
        .await;

    info!(
        start_balance = engine.start_balance(),
        asset_balance = engine.asset_balance(),
        opening_balance = summary.opening_balance,
        final_balance = engine.balance(),
        run_profit = summary.stats.total_profit,
        total_volume = engine.stats().total_volume,
        trades = engine.history().len(),
        ticks_with_opportunities = summary.stats.ticks_with_opportunities,
        best_trade = ?summary.stats.best_trade,
        worst_trade = ?summary.stats.worst_trade,
        "Run summary"
    );
    Ok(())
}

async fn generate_sample(config: &Config, days: u32, trades_per_day: u32) -> Result<(), AppError> {
    let sample_cfg = SampleConfig {
        days,
        trades_per_day,
        start_balance: config.simulation.start_balance,
        asset_balance: config.simulation.asset_balance,
        ..SampleConfig::default()
    };
    let initial = RunningStats::new(sample_cfg.start_balance, sample_cfg.asset_balance);
    let store = JsonFileStore::open(&config.storage.to_store_config(), &initial).await?;

    let mut rng = market::rng_from_seed(config.simulation.seed);
    let data = sample::generate(&sample_cfg, &mut rng, chrono::Utc::now());
    sample::write_sample(&store, &data).await?;

    info!(
        days,
        trades = data.trades.len(),
        total_profit = data.stats.total_profit,
        final_balance = data.stats.current_balance,
        "Generated sample trades"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(config.app.log_level.as_deref());
    info!(app = %config.app.name, "Config loaded");

    let result = match args.command {
        Some(Command::GenerateSample {
            days,
            trades_per_day,
        }) => generate_sample(&config, days, trades_per_day).await,
        None => run_simulation(&config).await,
    };

    if let Err(e) = result {
        error!(error = %e, "Run failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
