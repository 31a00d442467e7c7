//! Bar timeframes and their fetch parameters.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Bar width selectable by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "4h")]
    Hour4,
    #[serde(rename = "1d")]
    Day1,
    #[serde(rename = "1wk")]
    Week1,
    #[serde(rename = "1mo")]
    Month1,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown timeframe '{0}' (expected one of 1h, 4h, 1d, 1wk, 1mo)")]
pub struct ParseTimeframeError(pub String);

impl Timeframe {
    pub const ALL: [Timeframe; 5] = [
        Timeframe::Hour1,
        Timeframe::Hour4,
        Timeframe::Day1,
        Timeframe::Week1,
        Timeframe::Month1,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Timeframe::Hour1 => "1h",
            Timeframe::Hour4 => "4h",
            Timeframe::Day1 => "1d",
            Timeframe::Week1 => "1wk",
            Timeframe::Month1 => "1mo",
        }
    }

    /// Interval requested from the provider. 4h bars are built from 1h.
    pub fn fetch_interval(self) -> &'static str {
        match self {
            Timeframe::Hour4 => "1h",
            other => other.as_str(),
        }
    }

    /// How far back to fetch.
    pub fn lookback_range(self) -> &'static str {
        match self {
            Timeframe::Hour1 | Timeframe::Hour4 => "60d",
            Timeframe::Day1 => "1y",
            Timeframe::Week1 => "5y",
            Timeframe::Month1 => "10y",
        }
    }

    /// Bucket width when the fetched interval must be aggregated.
    pub fn resample_bucket(self) -> Option<Duration> {
        match self {
            Timeframe::Hour4 => Some(Duration::hours(4)),
            _ => None,
        }
    }

    /// Nominal spacing between bars. Months are treated as 30 days.
    pub fn nominal_spacing(self) -> Duration {
        match self {
            Timeframe::Hour1 => Duration::hours(1),
            Timeframe::Hour4 => Duration::hours(4),
            Timeframe::Day1 => Duration::days(1),
            Timeframe::Week1 => Duration::weeks(1),
            Timeframe::Month1 => Duration::days(30),
        }
    }
}

impl Default for Timeframe {
    fn default() -> Self {
        Timeframe::Day1
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = ParseTimeframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1h" => Ok(Timeframe::Hour1),
            "4h" => Ok(Timeframe::Hour4),
            "1d" => Ok(Timeframe::Day1),
            "1wk" => Ok(Timeframe::Week1),
            "1mo" => Ok(Timeframe::Month1),
            _ => Err(ParseTimeframeError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_label() {
        for tf in Timeframe::ALL {
            assert_eq!(tf.as_str().parse::<Timeframe>().unwrap(), tf);
        }
        assert_eq!(" 1D ".parse::<Timeframe>().unwrap(), Timeframe::Day1);
    }

    #[test]
    fn rejects_unknown_label() {
        let err = "2h".parse::<Timeframe>().unwrap_err();
        assert!(err.to_string().contains("2h"));
    }

    #[test]
    fn fetch_parameters() {
        assert_eq!(Timeframe::Hour1.lookback_range(), "60d");
        assert_eq!(Timeframe::Day1.lookback_range(), "1y");
        assert_eq!(Timeframe::Week1.lookback_range(), "5y");
        assert_eq!(Timeframe::Month1.lookback_range(), "10y");
        assert_eq!(Timeframe::Hour4.fetch_interval(), "1h");
        assert_eq!(Timeframe::Hour4.resample_bucket(), Some(Duration::hours(4)));
        assert_eq!(Timeframe::Day1.resample_bucket(), None);
    }

    #[test]
    fn serde_uses_short_labels() {
        let json = serde_json::to_string(&Timeframe::Week1).unwrap();
        assert_eq!(json, "\"1wk\"");
        let back: Timeframe = serde_json::from_str("\"4h\"").unwrap();
        assert_eq!(back, Timeframe::Hour4);
    }
}
