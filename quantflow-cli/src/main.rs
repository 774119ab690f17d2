//! QuantFlow CLI: evaluate signals, fetch candles, run a demo.
//!
//! Commands:
//! - `signals`: evaluate every indicator over a CSV/JSON candle file
//! - `fetch`: download recent klines from Binance
//! - `demo`: evaluate a seeded synthetic series end to end
//!
//! Results are printed as pretty JSON on stdout; logs go to stderr and are
//! filtered with `RUST_LOG`.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use quantflow_core::confluence::Analysis;
use quantflow_core::data::{
    load_series, random_walk, save_json, BinanceProvider, CandleProvider, CircuitBreaker,
};
use quantflow_core::data::binance::{DEFAULT_LIMIT, MAX_LIMIT};
use quantflow_core::data::synthetic::DEFAULT_START_TIME;
use quantflow_core::{EngineConfig, Series, SignalEngine, SignalReport};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "quantflow",
    about = "QuantFlow CLI: technical-analysis signal engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate every indicator over a candle file.
    Signals {
        /// Candle file (.csv with header time,open,high,low,close, or .json).
        #[arg(long)]
        input: PathBuf,

        /// TOML engine config. Defaults apply to missing sections.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Run indicators on the thread pool.
        #[arg(long, default_value_t = false)]
        parallel: bool,

        /// Add the confluence analysis to the output.
        #[arg(long, default_value_t = false)]
        confluence: bool,
    },
    /// Fetch recent candles from Binance.
    Fetch {
        /// Trading pair, e.g. btcusdt.
        #[arg(long)]
        symbol: String,

        /// Kline interval (1m, 5m, 1h, 4h, 1d, ...).
        #[arg(long)]
        interval: String,

        /// Number of candles, at most 1000.
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,

        /// Write candles as JSON here instead of evaluating them.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Evaluate a seeded synthetic series.
    Demo {
        /// Number of hourly candles to generate.
        #[arg(long, default_value_t = 500)]
        bars: usize,

        /// Random walk seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Signals {
            input,
            config,
            parallel,
            confluence,
        } => run_signals(&input, config.as_deref(), parallel, confluence),
        Commands::Fetch {
            symbol,
            interval,
            limit,
            output,
        } => run_fetch(&symbol, &interval, limit, output.as_deref()),
        Commands::Demo { bars, seed } => run_demo(bars, seed),
    }
}

fn run_signals(
    input: &Path,
    config_path: Option<&Path>,
    parallel: bool,
    confluence: bool,
) -> Result<()> {
    let config = match config_path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let engine = SignalEngine::new(config).context("invalid engine config")?;
    let series =
        load_series(input).with_context(|| format!("loading candles from {}", input.display()))?;

    let report = if parallel {
        engine.evaluate_parallel(&series)
    } else {
        engine.evaluate(&series)
    };
    print_report(&report, &series, confluence)
}

fn run_fetch(symbol: &str, interval: &str, limit: usize, output: Option<&Path>) -> Result<()> {
    if limit == 0 || limit > MAX_LIMIT {
        bail!("--limit must be between 1 and {MAX_LIMIT}, got {limit}");
    }

    let provider = BinanceProvider::new(Arc::new(CircuitBreaker::default_exchange()))?;
    let fetched = provider
        .fetch(symbol, interval, limit)
        .with_context(|| format!("fetching {symbol} {interval} from {}", provider.name()))?;

    if let Some(path) = output {
        save_json(path, &fetched.candles)
            .with_context(|| format!("writing candles to {}", path.display()))?;
        eprintln!(
            "Saved {} {} candles to {}",
            fetched.candles.len(),
            fetched.symbol,
            path.display()
        );
        return Ok(());
    }

    let series = Series::new(fetched.candles).context("exchange returned an invalid series")?;
    let engine = SignalEngine::with_defaults()?;
    print_report(&engine.evaluate(&series), &series, true)
}

fn run_demo(bars: usize, seed: u64) -> Result<()> {
    if bars == 0 {
        bail!("--bars must be at least 1");
    }
    let engine = SignalEngine::with_defaults()?;
    if bars < engine.warmup() {
        tracing::warn!(
            bars,
            warmup = engine.warmup(),
            "series shorter than warm-up, some indicators will be undefined"
        );
    }

    let series = Series::new(random_walk(bars, seed, DEFAULT_START_TIME, 3_600))?;
    eprintln!("WARNING: demo uses SYNTHETIC data (seed {seed})");
    print_report(&engine.evaluate(&series), &series, true)
}

fn print_report(report: &SignalReport, series: &Series, confluence: bool) -> Result<()> {
    let output = if confluence {
        let analysis = Analysis::from_report(report, series.candles());
        json!({ "report": report, "confluence": analysis })
    } else {
        serde_json::to_value(report)?
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
