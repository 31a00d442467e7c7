//! Bar: the fundamental market data unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::Timeframe;

/// OHLCV sample at one timestamp.
///
/// Bars come straight from a data source and are never edited afterwards;
/// annotation and scoring wrap them in new values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Returns true if any OHLCV field is NaN (void bar).
    pub fn is_void(&self) -> bool {
        self.open.is_nan()
            || self.high.is_nan()
            || self.low.is_nan()
            || self.close.is_nan()
            || self.volume.is_nan()
    }

    /// Basic OHLCV sanity check: high >= low, high >= open, high >= close, etc.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
            && self.volume >= 0.0
    }
}

/// Ordering and value violations in a bar sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BarError {
    #[error("bar {index} has a NaN price or volume")]
    VoidBar { index: usize },

    #[error("bar {index} is older than the bar before it")]
    OutOfOrder { index: usize },

    #[error("bar {index} repeats the timestamp of the bar before it")]
    DuplicateTimestamp { index: usize },
}

/// Bars for one symbol at one timeframe, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarSeries {
    pub symbol: String,
    /// Company or fund name when the source could resolve one.
    pub display_name: Option<String>,
    pub timeframe: Timeframe,
    pub bars: Vec<Bar>,
}

impl BarSeries {
    pub fn new(symbol: impl Into<String>, timeframe: Timeframe, bars: Vec<Bar>) -> Self {
        Self {
            symbol: symbol.into(),
            display_name: None,
            timeframe,
            bars,
        }
    }

    pub fn with_display_name(mut self, name: Option<String>) -> Self {
        self.display_name = name;
        self
    }

    /// The resolved name, or the raw symbol when none was found.
    pub fn display_name_or_symbol(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.symbol)
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Check the strict timestamp ordering invariant.
    pub fn validate_order(&self) -> Result<(), BarError> {
        validate_order(&self.bars)
    }

    /// Every bar defined and timestamps strictly increasing.
    pub fn validate(&self) -> Result<(), BarError> {
        validate_values(&self.bars)?;
        validate_order(&self.bars)
    }
}

/// Reject void bars. One NaN ends every running indicator at that bar.
pub fn validate_values(bars: &[Bar]) -> Result<(), BarError> {
    match bars.iter().position(Bar::is_void) {
        Some(index) => Err(BarError::VoidBar { index }),
        None => Ok(()),
    }
}

/// Verify that timestamps strictly increase across `bars`.
pub fn validate_order(bars: &[Bar]) -> Result<(), BarError> {
    for (i, pair) in bars.windows(2).enumerate() {
        let index = i + 1;
        if pair[1].timestamp == pair[0].timestamp {
            return Err(BarError::DuplicateTimestamp { index });
        }
        if pair[1].timestamp < pair[0].timestamp {
            return Err(BarError::OutOfOrder { index });
        }
    }
    Ok(())
}
