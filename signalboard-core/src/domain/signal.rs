//! Signal vocabulary: score breakdowns and transition triggers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction a trigger argues for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Buy,
    Sell,
}

/// Per-rule contributions to the composite score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// +1 fast EMA above slow, else -1.
    pub ema: i32,
    /// +2 oversold, -2 overbought, else 0.
    pub rsi: i32,
    /// +1 MACD above its signal line, else -1.
    pub macd: i32,
    /// +1 close under the lower band, -1 over the upper band, else 0.
    pub bollinger: i32,
    /// +1 OBV up on the previous bar, else -1.
    pub obv: i32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> i32 {
        self.ema + self.rsi + self.macd + self.bollinger + self.obv
    }
}

/// Discrete events fired by comparing the latest bar with its predecessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    MacdGoldenCross,
    MacdDeadCross,
    RsiOversoldRecovery,
    RsiOverboughtDecline,
    EmaGoldenCross,
    EmaDeadCross,
    ObvUpturn,
    ObvDownturn,
    ScoreTurnedPositive,
    ScoreTurnedNegative,
}

impl Trigger {
    pub const ALL: [Trigger; 10] = [
        Trigger::MacdGoldenCross,
        Trigger::MacdDeadCross,
        Trigger::RsiOversoldRecovery,
        Trigger::RsiOverboughtDecline,
        Trigger::EmaGoldenCross,
        Trigger::EmaDeadCross,
        Trigger::ObvUpturn,
        Trigger::ObvDownturn,
        Trigger::ScoreTurnedPositive,
        Trigger::ScoreTurnedNegative,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Trigger::MacdGoldenCross => "MACD golden cross",
            Trigger::MacdDeadCross => "MACD dead cross",
            Trigger::RsiOversoldRecovery => "RSI recovering from oversold",
            Trigger::RsiOverboughtDecline => "RSI falling from overbought",
            Trigger::EmaGoldenCross => "EMA golden cross",
            Trigger::EmaDeadCross => "EMA dead cross",
            Trigger::ObvUpturn => "OBV turned up",
            Trigger::ObvDownturn => "OBV turned down",
            Trigger::ScoreTurnedPositive => "score turned positive",
            Trigger::ScoreTurnedNegative => "score turned negative",
        }
    }

    pub fn side(self) -> Side {
        match self {
            Trigger::MacdGoldenCross
            | Trigger::RsiOversoldRecovery
            | Trigger::EmaGoldenCross
            | Trigger::ObvUpturn
            | Trigger::ScoreTurnedPositive => Side::Buy,
            Trigger::MacdDeadCross
            | Trigger::RsiOverboughtDecline
            | Trigger::EmaDeadCross
            | Trigger::ObvDownturn
            | Trigger::ScoreTurnedNegative => Side::Sell,
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Buy and sell triggers for one comparison, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transitions {
    pub buy: Vec<Trigger>,
    pub sell: Vec<Trigger>,
}

impl Transitions {
    pub fn is_empty(&self) -> bool {
        self.buy.is_empty() && self.sell.is_empty()
    }

    /// Route a fired trigger into the list for its side.
    pub fn push(&mut self, trigger: Trigger) {
        match trigger.side() {
            Side::Buy => self.buy.push(trigger),
            Side::Sell => self.sell.push(trigger),
        }
    }

    pub fn contains(&self, trigger: Trigger) -> bool {
        self.buy.contains(&trigger) || self.sell.contains(&trigger)
    }
}
