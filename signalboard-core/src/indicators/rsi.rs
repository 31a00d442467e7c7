//! Relative Strength Index (RSI).
//!
//! Uses Wilder smoothing of average gains and average losses.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: period.
//! Edge cases: avg_loss == 0 → RSI = 100; avg_gain == 0 → RSI = 0; both → 50.

use super::{closes, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let n = bars.len();
        let mut result = vec![None; n];

        if n < self.period + 1 {
            return result;
        }

        let closes = closes(bars);
        let changes: Vec<Option<f64>> = std::iter::once(None)
            .chain(closes.windows(2).map(|w| Some(w[1]? - w[0]?)))
            .collect();

        // Seed: average gain and average loss over the first `period` changes
        let mut avg_gain = 0.0;
        let mut avg_loss = 0.0;
        for ch in &changes[1..=self.period] {
            let Some(ch) = *ch else {
                return result;
            };
            if ch > 0.0 {
                avg_gain += ch;
            } else {
                avg_loss -= ch;
            }
        }
        avg_gain /= self.period as f64;
        avg_loss /= self.period as f64;

        result[self.period] = Some(rsi_from_averages(avg_gain, avg_loss));

        let alpha = 1.0 / self.period as f64;
        for i in (self.period + 1)..n {
            let Some(ch) = changes[i] else {
                return result;
            };
            let gain = ch.max(0.0);
            let loss = (-ch).max(0.0);

            avg_gain = alpha * gain + (1.0 - alpha) * avg_gain;
            avg_loss = alpha * loss + (1.0 - alpha) * avg_loss;

            result[i] = Some(rsi_from_averages(avg_gain, avg_loss));
        }

        result
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else if avg_gain == 0.0 {
        0.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars};

    #[test]
    fn rsi_all_gains() {
        let bars = make_bars(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);
        let result = Rsi::new(3).compute(&bars);
        assert_approx(result[3], 100.0, 1e-6);
    }

    #[test]
    fn rsi_all_losses() {
        let bars = make_bars(&[105.0, 104.0, 103.0, 102.0, 101.0, 100.0]);
        let result = Rsi::new(3).compute(&bars);
        assert_approx(result[3], 0.0, 1e-6);
    }

    #[test]
    fn rsi_flat_is_fifty() {
        let bars = make_bars(&[100.0; 6]);
        let result = Rsi::new(3).compute(&bars);
        assert_approx(result[5], 50.0, 1e-9);
    }

    #[test]
    fn rsi_mixed_seed() {
        // Changes: +0.34, -0.25, -0.48 → avg_gain = 0.34/3, avg_loss = 0.73/3
        // RSI[3] = 100 - 100 / (1 + 0.34/0.73)
        let bars = make_bars(&[44.0, 44.34, 44.09, 43.61, 44.33]);
        let result = Rsi::new(3).compute(&bars);

        assert_eq!(&result[..3], &[None, None, None]);
        let expected = 100.0 - 100.0 / (1.0 + 0.34 / 0.73);
        assert_approx(result[3], expected, 1e-9);
    }

    #[test]
    fn rsi_bounds() {
        let bars = make_bars(&[100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0]);
        let result = Rsi::new(3).compute(&bars);
        for (i, v) in result.iter().enumerate() {
            if let Some(v) = v {
                assert!((0.0..=100.0).contains(v), "RSI out of bounds at bar {i}: {v}");
            }
        }
    }

    #[test]
    fn rsi_nan_in_seed_window() {
        let mut bars = make_bars(&[100.0, 101.0, 102.0, 103.0, 104.0]);
        bars[2].close = f64::NAN;
        let result = Rsi::new(3).compute(&bars);
        assert!(result.iter().all(Option::is_none));
    }

    #[test]
    fn rsi_lookback() {
        assert_eq!(Rsi::new(14).lookback(), 14);
    }
}
