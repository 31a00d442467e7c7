//! Indicator primitives consumed by the annotator.
//!
//! Indicators are pure functions: bar history in, one value per bar out.
//! A value is `None` until the indicator's lookback window is satisfied, and
//! stays `None` wherever an input was NaN. No indicator ever emits `Some(NaN)`.
//!
//! Multi-series indicators (MACD, Bollinger) are exposed as separate named
//! instances per output line, keeping the single-series `Indicator` trait.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod obv;
pub mod rsi;

pub use atr::Atr;
pub use bollinger::{Bollinger, BollingerBand};
pub use ema::Ema;
pub use macd::{Macd, MacdLine};
pub use obv::Obv;
pub use rsi::Rsi;

use crate::domain::Bar;

/// Trait for indicators.
///
/// # Look-ahead contamination guard
/// No value at bar t may depend on bar t+1 or later. Every indicator must
/// pass the truncated-vs-full series test in `tests/lookahead_test.rs`.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "ema_21", "atr_14").
    fn name(&self) -> &str;

    /// Number of leading bars that cannot carry a value.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    ///
    /// Returns one entry per bar; the first `lookback()` entries are `None`.
    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>>;
}

/// `Some(x)` for finite input, `None` for NaN.
pub(crate) fn defined(x: f64) -> Option<f64> {
    if x.is_nan() {
        None
    } else {
        Some(x)
    }
}

/// Close prices with NaN mapped to `None`.
pub(crate) fn closes(bars: &[Bar]) -> Vec<Option<f64>> {
    bars.iter().map(|b| defined(b.close)).collect()
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    use chrono::{Duration, TimeZone, Utc};
    let base = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                timestamp: base + Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Assert an indicator value is defined and approximately equal to `expected`.
#[cfg(test)]
pub fn assert_approx(actual: Option<f64>, expected: f64, epsilon: f64) {
    let actual = actual.unwrap_or_else(|| panic!("expected {expected}, got None"));
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
