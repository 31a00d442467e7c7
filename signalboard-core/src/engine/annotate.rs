//! Indicator annotation and trend classification.
//!
//! Indicators are computed once over the whole series, then zipped back onto
//! the bars. Bars still inside any indicator's warm-up window carry `None`
//! for that field and are removed by `drop_incomplete` before scoring.

use tracing::debug;

use crate::config::IndicatorParams;
use crate::domain::{AnnotatedBar, Bar, IndicatorSet, ReadyBar, Trend};
use crate::indicators::{Atr, Bollinger, Ema, Indicator, Macd, Obv, Rsi};

/// The concrete indicator instances for one parameter set.
pub struct IndicatorSuite {
    pub ema_fast: Ema,
    pub ema_slow: Ema,
    pub rsi: Rsi,
    pub macd: Macd,
    pub macd_signal: Macd,
    pub bb_upper: Bollinger,
    pub bb_lower: Bollinger,
    pub obv: Obv,
    pub atr: Atr,
}

impl IndicatorSuite {
    pub fn new(params: &IndicatorParams) -> Self {
        Self {
            ema_fast: Ema::new(params.ema_fast),
            ema_slow: Ema::new(params.ema_slow),
            rsi: Rsi::new(params.rsi_period),
            macd: Macd::line(params.macd_fast, params.macd_slow, params.macd_signal),
            macd_signal: Macd::signal(params.macd_fast, params.macd_slow, params.macd_signal),
            bb_upper: Bollinger::upper(params.bollinger_period, params.bollinger_multiplier),
            bb_lower: Bollinger::lower(params.bollinger_period, params.bollinger_multiplier),
            obv: Obv::new(),
            atr: Atr::new(params.atr_period),
        }
    }

    /// Every indicator as a trait object, in field order.
    pub fn all(&self) -> [&dyn Indicator; 9] {
        [
            &self.ema_fast,
            &self.ema_slow,
            &self.rsi,
            &self.macd,
            &self.macd_signal,
            &self.bb_upper,
            &self.bb_lower,
            &self.obv,
            &self.atr,
        ]
    }

    /// Bars that can never be complete: the longest lookback in the suite.
    pub fn warmup_bars(&self) -> usize {
        self.all().iter().map(|i| i.lookback()).max().unwrap_or(0)
    }
}

/// Longest lookback for a parameter set.
pub fn warmup_bars(params: &IndicatorParams) -> usize {
    IndicatorSuite::new(params).warmup_bars()
}

/// Attach every derived field to every bar. Output has one entry per input bar.
pub fn annotate(bars: &[Bar], params: &IndicatorParams) -> Vec<AnnotatedBar> {
    let suite = IndicatorSuite::new(params);

    let ema_fast = suite.ema_fast.compute(bars);
    let ema_slow = suite.ema_slow.compute(bars);
    let rsi = suite.rsi.compute(bars);
    let macd = suite.macd.compute(bars);
    let macd_signal = suite.macd_signal.compute(bars);
    let bb_upper = suite.bb_upper.compute(bars);
    let bb_lower = suite.bb_lower.compute(bars);
    let obv = suite.obv.compute(bars);
    let atr = suite.atr.compute(bars);

    debug!(
        bars = bars.len(),
        warmup = suite.warmup_bars(),
        "computed indicator suite"
    );

    bars.iter()
        .enumerate()
        .map(|(i, bar)| AnnotatedBar {
            bar: bar.clone(),
            ema_fast: ema_fast[i],
            ema_slow: ema_slow[i],
            rsi: rsi[i],
            macd: macd[i],
            macd_signal: macd_signal[i],
            bb_upper: bb_upper[i],
            bb_lower: bb_lower[i],
            obv: obv[i],
            atr: atr[i],
        })
        .collect()
}

/// Remove every bar with at least one undefined field. Idempotent.
pub fn drop_incomplete(annotated: Vec<AnnotatedBar>) -> Vec<AnnotatedBar> {
    let before = annotated.len();
    let kept: Vec<AnnotatedBar> = annotated.into_iter().filter(|a| a.is_complete()).collect();
    debug!(dropped = before - kept.len(), kept = kept.len(), "dropped incomplete bars");
    kept
}

/// Buy when both the EMA pair and MACD agree upward, sell when both agree
/// downward, neutral for every mixed or equal case.
pub fn classify_trend(set: &IndicatorSet) -> Trend {
    if set.ema_fast > set.ema_slow && set.macd > set.macd_signal {
        Trend::Buy
    } else if set.ema_fast < set.ema_slow && set.macd < set.macd_signal {
        Trend::Sell
    } else {
        Trend::Neutral
    }
}

/// Filter to complete bars and tag each with its trend.
pub fn ready_bars(annotated: &[AnnotatedBar]) -> Vec<ReadyBar> {
    annotated.iter().filter_map(AnnotatedBar::ready).collect()
}
