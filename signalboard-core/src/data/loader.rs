//! Series loading and source resolution.
//!
//! Fallback policy for one symbol:
//! 1. If a CSV path is given → import it
//! 2. Else if online and the provider is available → fetch
//! 3. If nothing was loaded and synthetic data is allowed → generate (tagged)
//! 4. Otherwise → fail with a clear error
//!
//! Every loaded series is canonicalized before it is returned.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

use super::canonicalize::canonicalize;
use super::csv_import;
use super::provider::{DataError, DataProvider, DataSource};
use super::synthetic;
use super::timeframe::Timeframe;
use crate::domain::{Bar, BarSeries};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no data for '{symbol}' and no network access (use --synthetic for synthetic data)")]
    NoDataOffline { symbol: String },

    #[error("no data provider configured for '{symbol}'")]
    NoProvider { symbol: String },

    #[error("fetching '{symbol}' failed: {source}")]
    FetchFailed {
        symbol: String,
        #[source]
        source: DataError,
    },

    #[error("data error: {0}")]
    Data(#[from] DataError),
}

/// Options controlling where bars come from.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Import this CSV instead of fetching.
    pub csv_path: Option<PathBuf>,
    /// Never make network requests.
    pub offline: bool,
    /// Generate synthetic bars when real data is unavailable.
    pub synthetic: bool,
    /// Synthetic series length; defaults per timeframe.
    pub synthetic_bars: Option<usize>,
}

/// A canonical series plus its provenance.
#[derive(Debug, Clone)]
pub struct LoadedSeries {
    pub series: BarSeries,
    pub source: DataSource,
}

/// BLAKE3 over every timestamp and OHLCV value, in order.
pub fn dataset_hash(bars: &[Bar]) -> String {
    let mut hasher = blake3::Hasher::new();
    for bar in bars {
        hasher.update(&bar.timestamp.timestamp().to_le_bytes());
        hasher.update(&bar.open.to_le_bytes());
        hasher.update(&bar.high.to_le_bytes());
        hasher.update(&bar.low.to_le_bytes());
        hasher.update(&bar.close.to_le_bytes());
        hasher.update(&bar.volume.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

fn loaded(
    symbol: &str,
    timeframe: Timeframe,
    bars: Vec<Bar>,
    display_name: Option<String>,
    source: DataSource,
) -> LoadedSeries {
    let bars = canonicalize(bars);
    info!(
        symbol,
        %timeframe,
        bars = bars.len(),
        source = source.label(),
        "loaded series"
    );
    LoadedSeries {
        series: BarSeries::new(symbol, timeframe, bars).with_display_name(display_name),
        source,
    }
}

/// Resolve bars for `symbol` according to `opts`.
pub fn load_series(
    symbol: &str,
    timeframe: Timeframe,
    provider: Option<&dyn DataProvider>,
    opts: &LoadOptions,
) -> Result<LoadedSeries, LoadError> {
    // Step 1: explicit CSV; failures here are never papered over with synthetic data
    if let Some(path) = &opts.csv_path {
        let bars = csv_import::read_bars(path)?;
        return Ok(loaded(symbol, timeframe, bars, None, DataSource::CsvImport));
    }

    // Step 2: provider
    let mut fetch_error = None;
    if !opts.offline {
        if let Some(prov) = provider {
            if prov.is_available() {
                match prov.fetch(symbol, timeframe) {
                    Ok(result) => {
                        return Ok(loaded(
                            symbol,
                            timeframe,
                            result.bars,
                            result.display_name,
                            result.source,
                        ));
                    }
                    Err(e) => {
                        warn!(symbol, provider = prov.name(), error = %e, "fetch failed");
                        fetch_error = Some(e);
                    }
                }
            } else {
                fetch_error = Some(DataError::CircuitBreakerTripped);
            }
        }
    }

    // Step 3: synthetic
    if opts.synthetic {
        warn!(symbol, "generating synthetic data; results are tagged as synthetic");
        let count = opts
            .synthetic_bars
            .unwrap_or_else(|| synthetic::default_bar_count(timeframe));
        let bars = synthetic::generate(symbol, timeframe, count);
        return Ok(loaded(symbol, timeframe, bars, None, DataSource::Synthetic));
    }

    // Step 4: fail
    let symbol = symbol.to_string();
    Err(match fetch_error {
        Some(source) => LoadError::FetchFailed { symbol, source },
        None if opts.offline => LoadError::NoDataOffline { symbol },
        None => LoadError::NoProvider { symbol },
    })
}
