//! Bollinger Bands: moving average +/- standard deviation multiplier.
//!
//! - Upper: SMA(close, period) + mult * stddev(close, period)
//! - Lower: SMA(close, period) - mult * stddev(close, period)
//!
//! Uses population stddev (divide by N).
//! Lookback: period - 1.

use super::{closes, Indicator};
use crate::domain::Bar;

/// Which band to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Middle,
    Lower,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    band: BollingerBand,
    name: String,
}

impl Bollinger {
    pub fn new(period: usize, multiplier: f64, band: BollingerBand) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        let label = match band {
            BollingerBand::Upper => "upper",
            BollingerBand::Middle => "middle",
            BollingerBand::Lower => "lower",
        };
        Self {
            period,
            multiplier,
            band,
            name: format!("bollinger_{label}_{period}_{multiplier}"),
        }
    }

    pub fn upper(period: usize, multiplier: f64) -> Self {
        Self::new(period, multiplier, BollingerBand::Upper)
    }

    pub fn lower(period: usize, multiplier: f64) -> Self {
        Self::new(period, multiplier, BollingerBand::Lower)
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let closes = closes(bars);
        let mut result = vec![None; closes.len()];

        if closes.len() < self.period {
            return result;
        }

        for (offset, window) in closes.windows(self.period).enumerate() {
            let Some(values) = window.iter().copied().collect::<Option<Vec<f64>>>() else {
                continue;
            };

            let n = self.period as f64;
            let mean = values.iter().sum::<f64>() / n;
            let value = match self.band {
                BollingerBand::Middle => mean,
                BollingerBand::Upper | BollingerBand::Lower => {
                    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
                    let width = self.multiplier * variance.sqrt();
                    if self.band == BollingerBand::Upper {
                        mean + width
                    } else {
                        mean - width
                    }
                }
            };
            result[offset + self.period - 1] = Some(value);
        }

        result
    }
}
