//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over market-data sources so the loader can
//! swap implementations and tests can substitute a fixed series.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::timeframe::Timeframe;
use crate::domain::Bar;

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("hard stop: data provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV import failed at row {row}: {reason}")]
    Csv { row: usize, reason: String },

    #[error("data error: {0}")]
    Other(String),
}

/// Result of a successful fetch for a single symbol.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    /// Long or short company name, when the source has one.
    pub display_name: Option<String>,
    pub bars: Vec<Bar>,
    pub source: DataSource,
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    YahooFinance,
    CsvImport,
    Synthetic,
}

impl DataSource {
    pub fn label(self) -> &'static str {
        match self {
            DataSource::YahooFinance => "yahoo finance",
            DataSource::CsvImport => "csv import",
            DataSource::Synthetic => "synthetic",
        }
    }
}

/// A market-data source.
///
/// Implementations return bars already at the requested timeframe, oldest first.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the recent history of `symbol` at `timeframe`.
    fn fetch(&self, symbol: &str, timeframe: Timeframe) -> Result<FetchResult, DataError>;

    /// Check if the provider is currently available (not rate-limited, not blocked).
    fn is_available(&self) -> bool;
}
