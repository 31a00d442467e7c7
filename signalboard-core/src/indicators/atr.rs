//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|)
//! ATR uses Wilder smoothing (EMA with alpha = 1/period).
//! Lookback: period (TR needs a previous close, then `period` TR values).

use super::{defined, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            name: format!("atr_{period}"),
        }
    }
}

/// True Range series. Bar 0 has no previous close and stays undefined.
pub fn true_range(bars: &[Bar]) -> Vec<Option<f64>> {
    let mut tr = vec![None; bars.len()];
    for (i, pair) in bars.windows(2).enumerate() {
        let h = defined(pair[1].high);
        let l = defined(pair[1].low);
        let pc = defined(pair[0].close);
        if let (Some(h), Some(l), Some(pc)) = (h, l, pc) {
            tr[i + 1] = Some((h - l).max((h - pc).abs()).max((l - pc).abs()));
        }
    }
    tr
}

/// Wilder smoothing (alpha = 1/period).
///
/// Seed: mean of the first run of `period` consecutive defined values.
/// An undefined value after the seed ends the output.
pub fn wilder_smooth(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let mut result = vec![None; n];

    if n < period || period == 0 {
        return result;
    }

    let mut run = 0;
    let mut seed_end = None;
    for (i, v) in values.iter().enumerate() {
        run = if v.is_some() { run + 1 } else { 0 };
        if run == period {
            seed_end = Some(i + 1);
            break;
        }
    }
    let Some(seed_end) = seed_end else {
        return result;
    };

    let seed = values[seed_end - period..seed_end]
        .iter()
        .flatten()
        .sum::<f64>()
        / period as f64;
    result[seed_end - 1] = Some(seed);

    let alpha = 1.0 / period as f64;
    let mut prev = seed;
    for i in seed_end..n {
        let Some(v) = values[i] else {
            return result;
        };
        let smoothed = alpha * v + (1.0 - alpha) * prev;
        result[i] = Some(smoothed);
        prev = smoothed;
    }

    result
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        wilder_smooth(&true_range(bars), self.period)
    }
}
