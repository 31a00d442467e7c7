//! Analysis configuration: indicator windows, scoring thresholds, display cut-offs.
//!
//! Every knob has a named default so the rule table can be tuned from a TOML
//! file without touching control flow. Missing keys fall back to the defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_EMA_FAST: usize = 21;
pub const DEFAULT_EMA_SLOW: usize = 50;
pub const DEFAULT_RSI_PERIOD: usize = 14;
pub const DEFAULT_MACD_FAST: usize = 12;
pub const DEFAULT_MACD_SLOW: usize = 26;
pub const DEFAULT_MACD_SIGNAL: usize = 9;
pub const DEFAULT_BOLLINGER_PERIOD: usize = 20;
pub const DEFAULT_BOLLINGER_MULTIPLIER: f64 = 2.0;
pub const DEFAULT_ATR_PERIOD: usize = 14;

pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;

/// Score at or beyond which the summary reads "strong".
pub const STRONG_SIGNAL_SCORE: i32 = 3;
/// Score at or beyond which the summary reads "weak" rather than neutral.
pub const WEAK_SIGNAL_SCORE: i32 = 1;
/// ATR as a percentage of close above which the bar counts as highly volatile.
pub const HIGH_VOLATILITY_ATR_PCT: f64 = 3.0;

/// Transition detection looks at the latest bar and two predecessors.
pub const MIN_SCORABLE_BARS: usize = 3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Lookback windows for the indicator suite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorParams {
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_multiplier: f64,
    pub atr_period: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            ema_fast: DEFAULT_EMA_FAST,
            ema_slow: DEFAULT_EMA_SLOW,
            rsi_period: DEFAULT_RSI_PERIOD,
            macd_fast: DEFAULT_MACD_FAST,
            macd_slow: DEFAULT_MACD_SLOW,
            macd_signal: DEFAULT_MACD_SIGNAL,
            bollinger_period: DEFAULT_BOLLINGER_PERIOD,
            bollinger_multiplier: DEFAULT_BOLLINGER_MULTIPLIER,
            atr_period: DEFAULT_ATR_PERIOD,
        }
    }
}

/// Thresholds used by the composite score and the RSI transition rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreRules {
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
}

impl Default for ScoreRules {
    fn default() -> Self {
        Self {
            rsi_oversold: RSI_OVERSOLD,
            rsi_overbought: RSI_OVERBOUGHT,
        }
    }
}

/// Cut-offs for presentation labels. Not consulted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayThresholds {
    pub strong_score: i32,
    pub weak_score: i32,
    pub high_volatility_atr_pct: f64,
}

impl Default for DisplayThresholds {
    fn default() -> Self {
        Self {
            strong_score: STRONG_SIGNAL_SCORE,
            weak_score: WEAK_SIGNAL_SCORE,
            high_volatility_atr_pct: HIGH_VOLATILITY_ATR_PCT,
        }
    }
}

/// Complete configuration for one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub indicators: IndicatorParams,
    pub rules: ScoreRules,
    pub display: DisplayThresholds,
}

impl AnalysisConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.indicators;
        let periods = [
            ("ema_fast", p.ema_fast),
            ("ema_slow", p.ema_slow),
            ("rsi_period", p.rsi_period),
            ("macd_fast", p.macd_fast),
            ("macd_slow", p.macd_slow),
            ("macd_signal", p.macd_signal),
            ("bollinger_period", p.bollinger_period),
            ("atr_period", p.atr_period),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, v)| *v == 0) {
            return Err(ConfigError::Invalid(format!("{name} must be >= 1")));
        }
        if p.ema_fast >= p.ema_slow {
            return Err(ConfigError::Invalid(format!(
                "ema_fast ({}) must be < ema_slow ({})",
                p.ema_fast, p.ema_slow
            )));
        }
        if p.macd_fast >= p.macd_slow {
            return Err(ConfigError::Invalid(format!(
                "macd_fast ({}) must be < macd_slow ({})",
                p.macd_fast, p.macd_slow
            )));
        }
        if !(p.bollinger_multiplier > 0.0) {
            return Err(ConfigError::Invalid(
                "bollinger_multiplier must be positive".into(),
            ));
        }

        let r = &self.rules;
        if !(0.0..=100.0).contains(&r.rsi_oversold)
            || !(0.0..=100.0).contains(&r.rsi_overbought)
            || r.rsi_oversold >= r.rsi_overbought
        {
            return Err(ConfigError::Invalid(format!(
                "RSI thresholds must satisfy 0 <= oversold ({}) < overbought ({}) <= 100",
                r.rsi_oversold, r.rsi_overbought
            )));
        }

        let d = &self.display;
        if d.weak_score < 1 || d.weak_score > d.strong_score {
            return Err(ConfigError::Invalid(format!(
                "display thresholds must satisfy 1 <= weak ({}) <= strong ({})",
                d.weak_score, d.strong_score
            )));
        }
        Ok(())
    }

    /// BLAKE3 over the canonical JSON form, for tagging reports.
    pub fn config_hash(&self) -> String {
        // Struct fields serialize in declaration order, so the JSON is stable.
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_named_constants() {
        let c = AnalysisConfig::default();
        assert_eq!(c.indicators.ema_fast, 21);
        assert_eq!(c.indicators.ema_slow, 50);
        assert_eq!(c.indicators.rsi_period, 14);
        assert_eq!(c.indicators.atr_period, 14);
        assert_eq!(c.rules.rsi_oversold, 30.0);
        assert_eq!(c.rules.rsi_overbought, 70.0);
        assert_eq!(c.display.strong_score, 3);
        assert_eq!(c.display.weak_score, 1);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let c = AnalysisConfig::from_toml(
            r#"
[indicators]
ema_fast = 10
ema_slow = 30

[rules]
rsi_oversold = 25.0
"#,
        )
        .unwrap();
        assert_eq!(c.indicators.ema_fast, 10);
        assert_eq!(c.indicators.ema_slow, 30);
        assert_eq!(c.indicators.macd_slow, DEFAULT_MACD_SLOW);
        assert_eq!(c.rules.rsi_oversold, 25.0);
        assert_eq!(c.rules.rsi_overbought, RSI_OVERBOUGHT);
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(AnalysisConfig::from_toml("").unwrap(), AnalysisConfig::default());
    }

    #[test]
    fn rejects_inverted_ema_windows() {
        let err = AnalysisConfig::from_toml("[indicators]\nema_fast = 50\nema_slow = 21\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_zero_period() {
        let err = AnalysisConfig::from_toml("[indicators]\natr_period = 0\n").unwrap_err();
        assert!(err.to_string().contains("atr_period"));
    }

    #[test]
    fn rejects_crossed_rsi_thresholds() {
        let err = AnalysisConfig::from_toml("[rules]\nrsi_oversold = 80.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            AnalysisConfig::from_toml("[indicators\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn toml_roundtrip_preserves_config() {
        let c = AnalysisConfig::default();
        let text = c.to_toml().unwrap();
        assert_eq!(AnalysisConfig::from_toml(&text).unwrap(), c);
    }

    #[test]
    fn config_hash_tracks_parameters() {
        let a = AnalysisConfig::default();
        let mut b = AnalysisConfig::default();
        assert_eq!(a.config_hash(), b.config_hash());
        b.indicators.rsi_period = 7;
        assert_ne!(a.config_hash(), b.config_hash());
    }
}
