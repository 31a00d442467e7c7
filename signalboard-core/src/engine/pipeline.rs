//! Analysis pipeline: raw bars → annotate → drop warm-up → score → transitions.
//!
//! Stateless: every call builds fresh values from the series it is given.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{AnalysisConfig, ConfigError, MIN_SCORABLE_BARS};
use crate::data::{dataset_hash, DataSource, Timeframe};
use crate::domain::{BarError, BarSeries, ReadyBar, ScoreBreakdown, ScoredBar, Transitions};

use super::annotate::{annotate, ready_bars, warmup_bars};
use super::score::{breakdown, score};
use super::transitions::detect_transitions;

/// Conditions that stop an analysis before scoring.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no data for '{symbol}'; check the ticker symbol")]
    NoData { symbol: String },

    #[error("invalid bar series: {0}")]
    InvalidSeries(#[from] BarError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(
        "insufficient history: {available} bar(s) have complete indicators, \
         at least {required} are needed; try a longer period or a shorter timeframe"
    )]
    InsufficientHistory { available: usize, required: usize },
}

/// Everything the presentation layer needs from one run.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub symbol: String,
    pub display_name: String,
    pub timeframe: Timeframe,
    pub source: Option<DataSource>,
    pub dataset_hash: String,
    pub config_hash: String,
    /// Bars received before filtering.
    pub raw_bar_count: usize,
    /// Leading bars dropped for incomplete indicator history.
    pub warmup_dropped: usize,
    /// Complete, trend-tagged bars, oldest first.
    pub bars: Vec<ReadyBar>,
    pub latest: ScoredBar,
    pub previous: ScoredBar,
    pub breakdown: ScoreBreakdown,
    pub transitions: Transitions,
}

impl Analysis {
    /// Close-to-close change of the latest bar, absolute and percent.
    ///
    /// Percent is `None` when the previous close is zero.
    pub fn price_change(&self) -> (f64, Option<f64>) {
        let current = self.latest.ready.close();
        let prior = self.previous.ready.close();
        let change = current - prior;
        let pct = (prior != 0.0).then(|| change / prior * 100.0);
        (change, pct)
    }

    /// ATR of the latest bar as a percentage of its close, `None` for a zero close.
    pub fn atr_pct(&self) -> Option<f64> {
        let close = self.latest.ready.close();
        (close != 0.0).then(|| self.latest.ready.indicators.atr / close * 100.0)
    }
}

/// The three trailing bars, latest first, or the insufficient-history error.
pub fn trailing_window(bars: &[ReadyBar]) -> Result<[&ReadyBar; 3], AnalysisError> {
    match bars {
        [.., p2, p, l] => Ok([l, p, p2]),
        _ => Err(AnalysisError::InsufficientHistory {
            available: bars.len(),
            required: MIN_SCORABLE_BARS,
        }),
    }
}

/// Run the full engine over one series.
pub fn analyze(series: &BarSeries, config: &AnalysisConfig) -> Result<Analysis, AnalysisError> {
    analyze_with_source(series, None, config)
}

/// `analyze`, tagging the result with where the bars came from.
pub fn analyze_with_source(
    series: &BarSeries,
    source: Option<DataSource>,
    config: &AnalysisConfig,
) -> Result<Analysis, AnalysisError> {
    config.validate()?;
    if series.is_empty() {
        return Err(AnalysisError::NoData {
            symbol: series.symbol.clone(),
        });
    }
    series.validate()?;

    // With no void bars, incomplete bars form a prefix.
    let bars = ready_bars(&annotate(&series.bars, &config.indicators));
    debug!(
        symbol = %series.symbol,
        raw = series.len(),
        ready = bars.len(),
        warmup = warmup_bars(&config.indicators),
        "annotated series"
    );

    let [latest, previous, previous2] = trailing_window(&bars)?;
    let rules = &config.rules;

    let latest_scored = ScoredBar {
        ready: latest.clone(),
        score: score(latest, previous, rules),
    };
    let previous_scored = ScoredBar {
        ready: previous.clone(),
        score: score(previous, previous2, rules),
    };
    let transitions = detect_transitions(latest, previous, previous2, rules);

    info!(
        symbol = %series.symbol,
        timeframe = %series.timeframe,
        score = latest_scored.score,
        previous_score = previous_scored.score,
        buy_triggers = transitions.buy.len(),
        sell_triggers = transitions.sell.len(),
        "analysis complete"
    );

    Ok(Analysis {
        symbol: series.symbol.clone(),
        display_name: series.display_name_or_symbol().to_string(),
        timeframe: series.timeframe,
        source,
        dataset_hash: dataset_hash(&series.bars),
        config_hash: config.config_hash(),
        raw_bar_count: series.len(),
        warmup_dropped: series.len() - bars.len(),
        breakdown: breakdown(latest, previous, rules),
        latest: latest_scored,
        previous: previous_scored,
        transitions,
        bars,
    })
}
