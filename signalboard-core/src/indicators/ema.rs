//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1]
//! Seed: EMA[period-1] = SMA of first `period` close values.
//! Lookback: period - 1.

use super::{closes, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        ema_of_series(&closes(bars), self.period)
    }
}

/// EMA of an arbitrary series that may open with undefined values.
///
/// The seed window starts at the first defined entry, so composed indicators
/// (the MACD signal line) can smooth a series that is itself warming up.
/// An undefined entry inside the seed window or after it leaves every later
/// output undefined.
pub fn ema_of_series(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let mut result = vec![None; n];

    if period == 0 {
        return result;
    }
    let Some(start) = values.iter().position(Option::is_some) else {
        return result;
    };
    if n - start < period {
        return result;
    }

    let alpha = 2.0 / (period as f64 + 1.0);

    // Seed: SMA of the first `period` defined values
    let mut sum = 0.0;
    for v in &values[start..start + period] {
        match v {
            Some(x) => sum += x,
            None => return result,
        }
    }
    let seed = sum / period as f64;
    let seed_index = start + period - 1;
    result[seed_index] = Some(seed);

    let mut prev = seed;
    for i in (seed_index + 1)..n {
        let Some(x) = values[i] else {
            return result;
        };
        let ema = alpha * x + (1.0 - alpha) * prev;
        result[i] = Some(ema);
        prev = ema;
    }

    result
}
