//! Transition triggers between the latest bar and its predecessors.
//!
//! Every rule is evaluated on its own; several may fire together. On the
//! previous bar each comparison uses `<=` / `>=`, so a value sitting exactly
//! on the line still counts as not-yet-crossed and a move off the line fires.

use crate::config::ScoreRules;
use crate::domain::{ReadyBar, Transitions, Trigger};

use super::score::score;

/// Compare `latest` with `previous` (and `previous2` for OBV and the score
/// flip). `latest` is the most recent bar, `previous2` the oldest.
pub fn detect_transitions(
    latest: &ReadyBar,
    previous: &ReadyBar,
    previous2: &ReadyBar,
    rules: &ScoreRules,
) -> Transitions {
    let l = &latest.indicators;
    let p = &previous.indicators;
    let p2 = &previous2.indicators;
    let mut out = Transitions::default();

    if l.macd > l.macd_signal && p.macd <= p.macd_signal {
        out.push(Trigger::MacdGoldenCross);
    }
    if l.macd < l.macd_signal && p.macd >= p.macd_signal {
        out.push(Trigger::MacdDeadCross);
    }

    if l.rsi > rules.rsi_oversold && p.rsi <= rules.rsi_oversold {
        out.push(Trigger::RsiOversoldRecovery);
    }
    if l.rsi < rules.rsi_overbought && p.rsi >= rules.rsi_overbought {
        out.push(Trigger::RsiOverboughtDecline);
    }

    if l.ema_fast > l.ema_slow && p.ema_fast <= p.ema_slow {
        out.push(Trigger::EmaGoldenCross);
    }
    if l.ema_fast < l.ema_slow && p.ema_fast >= p.ema_slow {
        out.push(Trigger::EmaDeadCross);
    }

    if l.obv > p.obv && p.obv <= p2.obv {
        out.push(Trigger::ObvUpturn);
    }
    if l.obv < p.obv && p.obv >= p2.obv {
        out.push(Trigger::ObvDownturn);
    }

    let score_latest = score(latest, previous, rules);
    let score_previous = score(previous, previous2, rules);
    if score_latest > 0 && score_previous <= 0 {
        out.push(Trigger::ScoreTurnedPositive);
    }
    if score_latest < 0 && score_previous >= 0 {
        out.push(Trigger::ScoreTurnedNegative);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fixtures::{neutral_set, ready};

    fn rules() -> ScoreRules {
        ScoreRules::default()
    }

    #[test]
    fn macd_golden_cross_from_exact_touch() {
        let mut p = neutral_set(0.0);
        p.macd = 1.0;
        p.macd_signal = 1.0;
        let mut l = neutral_set(0.0);
        l.macd = 1.5;
        l.macd_signal = 1.0;

        let t = detect_transitions(
            &ready(100.0, l),
            &ready(100.0, p),
            &ready(100.0, neutral_set(0.0)),
            &rules(),
        );
        assert!(t.buy.contains(&Trigger::MacdGoldenCross));
        assert!(!t.sell.contains(&Trigger::MacdDeadCross));
    }

    #[test]
    fn macd_dead_cross() {
        let mut p = neutral_set(0.0);
        p.macd = 2.0;
        p.macd_signal = 1.0;
        let mut l = neutral_set(0.0);
        l.macd = 0.5;
        l.macd_signal = 1.0;

        let t = detect_transitions(
            &ready(100.0, l),
            &ready(100.0, p),
            &ready(100.0, neutral_set(0.0)),
            &rules(),
        );
        assert!(t.sell.contains(&Trigger::MacdDeadCross));
        assert!(!t.buy.contains(&Trigger::MacdGoldenCross));
    }

    #[test]
    fn rsi_flat_at_thirty_never_recovers() {
        let mut s = neutral_set(0.0);
        s.rsi = 30.0;
        let t = detect_transitions(&ready(100.0, s), &ready(100.0, s), &ready(100.0, s), &rules());
        assert!(!t.contains(Trigger::RsiOversoldRecovery));
    }

    #[test]
    fn rsi_leaving_thirty_recovers() {
        let mut p = neutral_set(0.0);
        p.rsi = 30.0;
        let mut l = neutral_set(0.0);
        l.rsi = 30.5;
        let t = detect_transitions(&ready(100.0, l), &ready(100.0, p), &ready(100.0, p), &rules());
        assert!(t.buy.contains(&Trigger::RsiOversoldRecovery));
    }

    #[test]
    fn rsi_falling_from_overbought() {
        let mut p = neutral_set(0.0);
        p.rsi = 70.0;
        let mut l = neutral_set(0.0);
        l.rsi = 69.0;
        let t = detect_transitions(&ready(100.0, l), &ready(100.0, p), &ready(100.0, p), &rules());
        assert!(t.sell.contains(&Trigger::RsiOverboughtDecline));
    }

    #[test]
    fn ema_crosses_both_ways() {
        let mut below = neutral_set(0.0);
        below.ema_fast = 99.0;
        let mut above = neutral_set(0.0);
        above.ema_fast = 101.0;
        let base = ready(100.0, neutral_set(0.0));

        let up = detect_transitions(&ready(100.0, above), &ready(100.0, below), &base, &rules());
        assert!(up.buy.contains(&Trigger::EmaGoldenCross));

        let down = detect_transitions(&ready(100.0, below), &ready(100.0, above), &base, &rules());
        assert!(down.sell.contains(&Trigger::EmaDeadCross));
    }

    #[test]
    fn obv_turns_need_three_bars() {
        let up = detect_transitions(
            &ready(100.0, neutral_set(12.0)),
            &ready(100.0, neutral_set(10.0)),
            &ready(100.0, neutral_set(10.0)),
            &rules(),
        );
        assert!(up.buy.contains(&Trigger::ObvUpturn));

        let still_rising = detect_transitions(
            &ready(100.0, neutral_set(12.0)),
            &ready(100.0, neutral_set(10.0)),
            &ready(100.0, neutral_set(8.0)),
            &rules(),
        );
        assert!(!still_rising.contains(Trigger::ObvUpturn));

        let down = detect_transitions(
            &ready(100.0, neutral_set(8.0)),
            &ready(100.0, neutral_set(10.0)),
            &ready(100.0, neutral_set(9.0)),
            &rules(),
        );
        assert!(down.sell.contains(&Trigger::ObvDownturn));
    }

    #[test]
    fn score_turns_positive() {
        // previous: ema -1, macd -1, obv down -1 → -3
        // latest: ema +1, macd +1, obv up +1 → 3
        let mut bull = neutral_set(20.0);
        bull.ema_fast = 105.0;
        bull.macd = 1.0;
        let t = detect_transitions(
            &ready(100.0, bull),
            &ready(100.0, neutral_set(10.0)),
            &ready(100.0, neutral_set(15.0)),
            &rules(),
        );
        assert!(t.buy.contains(&Trigger::ScoreTurnedPositive));
        assert!(!t.sell.contains(&Trigger::ScoreTurnedNegative));
    }

    #[test]
    fn score_turns_negative_from_zero() {
        let mut prev = neutral_set(10.0);
        prev.rsi = 20.0;
        let prev_bar = ready(120.0, prev); // close above bb_upper: -1
        let t = detect_transitions(
            &ready(100.0, neutral_set(5.0)),
            &prev_bar,
            &ready(100.0, neutral_set(5.0)),
            &rules(),
        );
        // previous: -1 + 2 - 1 - 1 + 1 = 0; latest: -1 - 1 - 1 = -3
        assert!(t.sell.contains(&Trigger::ScoreTurnedNegative));
    }

    #[test]
    fn rules_fire_independently() {
        let mut p = neutral_set(10.0);
        p.macd = -1.0;
        p.rsi = 25.0;
        p.ema_fast = 95.0;
        let mut l = neutral_set(20.0);
        l.macd = 1.0;
        l.rsi = 35.0;
        l.ema_fast = 105.0;

        let t = detect_transitions(
            &ready(100.0, l),
            &ready(100.0, p),
            &ready(100.0, neutral_set(10.0)),
            &rules(),
        );
        assert_eq!(
            t.buy,
            vec![
                Trigger::MacdGoldenCross,
                Trigger::RsiOversoldRecovery,
                Trigger::EmaGoldenCross,
                Trigger::ObvUpturn,
                Trigger::ScoreTurnedPositive,
            ]
        );
        assert!(t.sell.is_empty());
    }

    #[test]
    fn flat_series_fires_nothing() {
        let s = neutral_set(10.0);
        let t = detect_transitions(&ready(100.0, s), &ready(100.0, s), &ready(100.0, s), &rules());
        // every score is -3, so no sign change either
        assert!(t.is_empty());
    }
}
