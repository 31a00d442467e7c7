//! Bars extended with derived indicator values.
//!
//! An `AnnotatedBar` may still be warming up (some fields `None`). Once every
//! field is defined it can be promoted to a `ReadyBar`, which is the only shape
//! the scorer accepts.

use serde::{Deserialize, Serialize};

use super::bar::Bar;
use crate::engine::annotate::classify_trend;

/// Per-bar trend tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Buy,
    Sell,
    Neutral,
}

impl Trend {
    /// One-character glyph used by the trend strip.
    pub fn glyph(self) -> char {
        match self {
            Trend::Buy => '+',
            Trend::Sell => '-',
            Trend::Neutral => '.',
        }
    }
}

/// Fully-defined derived values for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub bb_upper: f64,
    pub bb_lower: f64,
    pub obv: f64,
    pub atr: f64,
}

/// A bar plus its indicator values, any of which may be undefined during warm-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedBar {
    pub bar: Bar,
    pub ema_fast: Option<f64>,
    pub ema_slow: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_lower: Option<f64>,
    pub obv: Option<f64>,
    pub atr: Option<f64>,
}

impl AnnotatedBar {
    /// The defined snapshot, or `None` while any field is still warming up.
    pub fn indicators(&self) -> Option<IndicatorSet> {
        Some(IndicatorSet {
            ema_fast: self.ema_fast?,
            ema_slow: self.ema_slow?,
            rsi: self.rsi?,
            macd: self.macd?,
            macd_signal: self.macd_signal?,
            bb_upper: self.bb_upper?,
            bb_lower: self.bb_lower?,
            obv: self.obv?,
            atr: self.atr?,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.indicators().is_some()
    }

    /// Trend tag, available once every derived field is defined.
    pub fn trend(&self) -> Option<Trend> {
        self.indicators().map(|set| classify_trend(&set))
    }

    /// Promote to a `ReadyBar` when complete.
    pub fn ready(&self) -> Option<ReadyBar> {
        let indicators = self.indicators()?;
        Some(ReadyBar {
            bar: self.bar.clone(),
            indicators,
            trend: classify_trend(&indicators),
        })
    }
}

/// An annotated bar with every derived field defined and its trend tagged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadyBar {
    pub bar: Bar,
    pub indicators: IndicatorSet,
    pub trend: Trend,
}

impl ReadyBar {
    pub fn close(&self) -> f64 {
        self.bar.close
    }
}

/// A ready bar and its composite score against its predecessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredBar {
    #[serde(flatten)]
    pub ready: ReadyBar,
    pub score: i32,
}
