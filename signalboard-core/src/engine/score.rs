//! Composite signal score.
//!
//! | Condition                 | Contribution |
//! |---------------------------|--------------|
//! | ema_fast > ema_slow       | +1, else -1  |
//! | rsi < oversold            | +2           |
//! | rsi > overbought          | -2           |
//! | macd > macd_signal        | +1, else -1  |
//! | close < bb_lower          | +1           |
//! | close > bb_upper          | -1           |
//! | obv > previous.obv        | +1, else -1  |
//!
//! The RSI extremes count double. The extremes are +/-6; callers that only
//! need a bound can rely on -7..=7.

use crate::config::ScoreRules;
use crate::domain::{ReadyBar, ScoreBreakdown, ScoredBar};

pub const MAX_SCORE: i32 = 6;
pub const MIN_SCORE: i32 = -6;

fn agree(condition: bool) -> i32 {
    if condition {
        1
    } else {
        -1
    }
}

/// Per-rule contributions for `bar` against its predecessor.
pub fn breakdown(bar: &ReadyBar, previous: &ReadyBar, rules: &ScoreRules) -> ScoreBreakdown {
    let ind = &bar.indicators;
    let close = bar.close();

    let rsi = if ind.rsi < rules.rsi_oversold {
        2
    } else if ind.rsi > rules.rsi_overbought {
        -2
    } else {
        0
    };

    let bollinger = if close < ind.bb_lower {
        1
    } else if close > ind.bb_upper {
        -1
    } else {
        0
    };

    ScoreBreakdown {
        ema: agree(ind.ema_fast > ind.ema_slow),
        rsi,
        macd: agree(ind.macd > ind.macd_signal),
        bollinger,
        obv: agree(ind.obv > previous.indicators.obv),
    }
}

/// Composite score of `bar` against its predecessor.
pub fn score(bar: &ReadyBar, previous: &ReadyBar, rules: &ScoreRules) -> i32 {
    breakdown(bar, previous, rules).total()
}

/// Score every bar that has a predecessor. Output is one shorter than input.
pub fn score_series(bars: &[ReadyBar], rules: &ScoreRules) -> Vec<ScoredBar> {
    bars.windows(2)
        .map(|pair| ScoredBar {
            ready: pair[1].clone(),
            score: score(&pair[1], &pair[0], rules),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IndicatorSet;
    use crate::engine::fixtures::{neutral_set, ready};

    #[test]
    fn bullish_example_scores_six() {
        let bar = ready(
            95.0,
            IndicatorSet {
                ema_fast: 110.0,
                ema_slow: 100.0,
                rsi: 25.0,
                macd: 2.0,
                macd_signal: 1.0,
                bb_upper: 120.0,
                bb_lower: 98.0,
                obv: 1000.0,
                atr: 1.0,
            },
        );
        let previous = ready(96.0, neutral_set(900.0));
        let rules = ScoreRules::default();
        let b = breakdown(&bar, &previous, &rules);
        assert_eq!(
            b,
            ScoreBreakdown {
                ema: 1,
                rsi: 2,
                macd: 1,
                bollinger: 1,
                obv: 1
            }
        );
        assert_eq!(score(&bar, &previous, &rules), 6);
    }

    #[test]
    fn fully_bearish_bar_hits_minimum() {
        let bar = ready(
            130.0,
            IndicatorSet {
                ema_fast: 90.0,
                ema_slow: 100.0,
                rsi: 85.0,
                macd: -1.0,
                macd_signal: 0.0,
                bb_upper: 120.0,
                bb_lower: 80.0,
                obv: 500.0,
                atr: 1.0,
            },
        );
        let previous = ready(120.0, neutral_set(600.0));
        assert_eq!(score(&bar, &previous, &ScoreRules::default()), MIN_SCORE);
    }

    #[test]
    fn equality_counts_against() {
        // EMA equal, MACD equal, OBV flat: each of the three binary rules gives -1.
        let bar = ready(100.0, neutral_set(1000.0));
        let previous = ready(100.0, neutral_set(1000.0));
        let b = breakdown(&bar, &previous, &ScoreRules::default());
        assert_eq!((b.ema, b.macd, b.obv), (-1, -1, -1));
        assert_eq!(b.total(), -3);
    }

    #[test]
    fn rsi_threshold_is_strict() {
        let rules = ScoreRules::default();
        let previous = ready(100.0, neutral_set(0.0));
        let mut set = neutral_set(0.0);

        set.rsi = 30.0;
        assert_eq!(breakdown(&ready(100.0, set), &previous, &rules).rsi, 0);
        set.rsi = 29.999;
        assert_eq!(breakdown(&ready(100.0, set), &previous, &rules).rsi, 2);
        set.rsi = 70.0;
        assert_eq!(breakdown(&ready(100.0, set), &previous, &rules).rsi, 0);
        set.rsi = 70.001;
        assert_eq!(breakdown(&ready(100.0, set), &previous, &rules).rsi, -2);
    }

    #[test]
    fn close_on_a_band_is_inside() {
        let rules = ScoreRules::default();
        let previous = ready(100.0, neutral_set(0.0));
        assert_eq!(breakdown(&ready(90.0, neutral_set(0.0)), &previous, &rules).bollinger, 0);
        assert_eq!(breakdown(&ready(110.0, neutral_set(0.0)), &previous, &rules).bollinger, 0);
        assert_eq!(breakdown(&ready(111.0, neutral_set(0.0)), &previous, &rules).bollinger, -1);
    }

    #[test]
    fn score_series_skips_first_bar() {
        let bars = vec![
            ready(100.0, neutral_set(1.0)),
            ready(100.0, neutral_set(2.0)),
            ready(100.0, neutral_set(1.0)),
        ];
        let scored = score_series(&bars, &ScoreRules::default());
        assert_eq!(scored.len(), 2);
        // -1 (ema) -1 (macd) +1 (obv up), then obv down
        assert_eq!(scored[0].score, -1);
        assert_eq!(scored[1].score, -3);
    }
}
