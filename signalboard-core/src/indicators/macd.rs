//! Moving Average Convergence Divergence (MACD).
//!
//! Line:   EMA(close, fast) - EMA(close, slow)
//! Signal: EMA(line, signal), seeded from the first `signal` defined line values.
//!
//! Lookback: slow - 1 for the line, slow + signal - 2 for the signal line.

use super::ema::ema_of_series;
use super::{closes, Indicator};
use crate::domain::Bar;

/// Which MACD output to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdLine {
    Line,
    Signal,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    line: MacdLine,
    name: String,
}

impl Macd {
    pub fn line(fast: usize, slow: usize, signal: usize) -> Self {
        Self::build(fast, slow, signal, MacdLine::Line)
    }

    pub fn signal(fast: usize, slow: usize, signal: usize) -> Self {
        Self::build(fast, slow, signal, MacdLine::Signal)
    }

    fn build(fast: usize, slow: usize, signal: usize, line: MacdLine) -> Self {
        assert!(fast >= 1 && signal >= 1, "MACD periods must be >= 1");
        assert!(slow > fast, "MACD slow period must be > fast period");
        let prefix = match line {
            MacdLine::Line => "macd",
            MacdLine::Signal => "macd_signal",
        };
        Self {
            fast,
            slow,
            signal,
            line,
            name: format!("{prefix}_{fast}_{slow}_{signal}"),
        }
    }
}

/// The MACD line alone, shared by both outputs.
pub fn macd_line(bars: &[Bar], fast: usize, slow: usize) -> Vec<Option<f64>> {
    let closes = closes(bars);
    let fast_ema = ema_of_series(&closes, fast);
    let slow_ema = ema_of_series(&closes, slow);
    fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect()
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.line {
            MacdLine::Line => self.slow - 1,
            MacdLine::Signal => self.slow + self.signal - 2,
        }
    }

    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let line = macd_line(bars, self.fast, self.slow);
        match self.line {
            MacdLine::Line => line,
            MacdLine::Signal => ema_of_series(&line, self.signal),
        }
    }
}
