//! Signalboard CLI: fetch bars, score them, print the signal summary.
//!
//! Commands:
//! - `analyze`: load bars for one symbol, run the signal engine, print text or JSON
//! - `config`: print the effective analysis configuration as TOML

mod report;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use signalboard_core::config::AnalysisConfig;
use signalboard_core::data::{
    load_series, CircuitBreaker, DataProvider, LoadOptions, Timeframe, YahooProvider,
};
use signalboard_core::engine::analyze_with_source;

#[derive(Parser)]
#[command(
    name = "signalboard",
    version,
    about = "Signalboard: technical-indicator signal scoring for a single ticker"
)]
struct Cli {
    /// Log engine stages at debug level (RUST_LOG overrides).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score the latest bar of a symbol and list transition signals.
    Analyze {
        /// Ticker symbol (e.g., AAPL, 7203.T, BTC-USD).
        symbol: String,

        /// Bar timeframe: 1h, 4h, 1d, 1wk, 1mo.
        #[arg(long, short, default_value = "1d")]
        timeframe: Timeframe,

        /// Path to a TOML config file. Defaults are used when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Read bars from this CSV instead of fetching.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Offline mode: no network access.
        #[arg(long, default_value_t = false)]
        offline: bool,

        /// Use synthetic data as fallback.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Print the full analysis as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Number of recent bars in the trend strip.
        #[arg(long, default_value_t = 30)]
        strip: usize,
    },
    /// Print the effective configuration as TOML.
    Config {
        /// Path to a TOML config file to validate and echo.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "signalboard=debug"
    } else {
        "signalboard=info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Analyze {
            symbol,
            timeframe,
            config,
            csv,
            offline,
            synthetic,
            json,
            strip,
        } => run_analyze(
            &symbol,
            timeframe,
            config.as_deref(),
            csv,
            offline,
            synthetic,
            json,
            strip,
        ),
        Commands::Config { config } => run_config(config.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(p) => AnalysisConfig::from_file(p)
            .with_context(|| format!("loading config from {}", p.display())),
        None => Ok(AnalysisConfig::default()),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_analyze(
    symbol: &str,
    timeframe: Timeframe,
    config_path: Option<&Path>,
    csv: Option<PathBuf>,
    offline: bool,
    synthetic: bool,
    json: bool,
    strip: usize,
) -> Result<()> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        bail!("symbol must not be empty");
    }

    let config = load_config(config_path)?;
    debug!(config_hash = %config.config_hash(), "configuration loaded");

    let opts = LoadOptions {
        csv_path: csv,
        offline,
        synthetic,
        synthetic_bars: None,
    };

    // Only build an HTTP client when it can actually be used.
    let provider = if offline || opts.csv_path.is_some() {
        None
    } else {
        let breaker = Arc::new(CircuitBreaker::default_provider());
        Some(YahooProvider::new(breaker)?)
    };
    let provider_ref = provider.as_ref().map(|p| p as &dyn DataProvider);

    let loaded = load_series(&symbol, timeframe, provider_ref, &opts)
        .with_context(|| format!("could not load bars for {symbol}"))?;

    let analysis = analyze_with_source(&loaded.series, Some(loaded.source), &config)
        .with_context(|| format!("cannot analyze {symbol} at {timeframe}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print!("{}", report::render_text(&analysis, &config, strip));
    }

    Ok(())
}

fn run_config(path: Option<&Path>) -> Result<()> {
    let config = load_config(path)?;
    print!("{}", config.to_toml()?);
    Ok(())
}
