//! Yahoo Finance data provider.
//!
//! Fetches OHLCV bars from Yahoo's v8 chart API using a lookback range and an
//! interval. Handles rate limiting, retries with exponential backoff, response
//! parsing, and the circuit breaker.
//!
//! Yahoo Finance has no official API and is subject to unannounced format changes.
//! The CSV import path is the fallback when Yahoo is unavailable.

use std::sync::Arc;
use std::time::Duration;

use chrono::DateTime;
use serde::Deserialize;
use tracing::{debug, warn};

use super::canonicalize::canonicalize;
use super::circuit_breaker::CircuitBreaker;
use super::provider::{DataError, DataProvider, DataSource, FetchResult};
use super::resample::resample;
use super::timeframe::Timeframe;
use crate::domain::Bar;

const CHART_BASE_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    long_name: Option<String>,
    short_name: Option<String>,
}

impl ChartMeta {
    fn display_name(self) -> Option<String> {
        [self.long_name, self.short_name]
            .into_iter()
            .flatten()
            .find(|n| !n.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Bars and the resolved display name from one chart response.
#[derive(Debug)]
pub(crate) struct ParsedChart {
    pub bars: Vec<Bar>,
    pub display_name: Option<String>,
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    circuit_breaker: Arc<CircuitBreaker>,
    max_retries: u32,
    base_delay: Duration,
}

impl YahooProvider {
    pub fn new(circuit_breaker: Arc<CircuitBreaker>) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            circuit_breaker,
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        })
    }

    fn chart_url(symbol: &str, timeframe: Timeframe) -> String {
        format!(
            "{CHART_BASE_URL}/{symbol}?range={range}&interval={interval}&includePrePost=false",
            range = timeframe.lookback_range(),
            interval = timeframe.fetch_interval(),
        )
    }

    /// Parse a raw chart API body.
    pub(crate) fn parse_body(symbol: &str, body: &str) -> Result<ParsedChart, DataError> {
        let resp: ChartResponse = serde_json::from_str(body).map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
        })?;
        Self::parse_response(symbol, resp)
    }

    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<ParsedChart, DataError> {
        let result = resp.chart.result.ok_or_else(|| match resp.chart.error {
            Some(err) if err.code == "Not Found" => DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            },
            Some(err) => {
                DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
            }
            None => DataError::ResponseFormatChanged("empty result with no error".into()),
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

        let display_name = data.meta.and_then(ChartMeta::display_name);

        // A listed symbol with no trading history returns no timestamps at all.
        let timestamps = data.timestamp.unwrap_or_default();

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let timestamp = DateTime::from_timestamp(ts, 0).ok_or_else(|| {
                DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
            })?;

            let open = quote.open.get(i).copied().flatten();
            let high = quote.high.get(i).copied().flatten();
            let low = quote.low.get(i).copied().flatten();
            let close = quote.close.get(i).copied().flatten();
            let volume = quote.volume.get(i).copied().flatten();

            // Non-trading slots come back with every field null.
            if open.is_none() && high.is_none() && low.is_none() && close.is_none() {
                continue;
            }

            bars.push(Bar {
                timestamp,
                open: open.unwrap_or(f64::NAN),
                high: high.unwrap_or(f64::NAN),
                low: low.unwrap_or(f64::NAN),
                close: close.unwrap_or(f64::NAN),
                volume: volume.unwrap_or(0.0),
            });
        }

        if bars.is_empty() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        Ok(ParsedChart { bars, display_name })
    }

    fn refused(&self, symbol: &str) -> DataError {
        warn!(
            symbol,
            cooldown_remaining_secs = self.circuit_breaker.remaining_cooldown().as_secs(),
            "circuit breaker open, request refused"
        );
        DataError::CircuitBreakerTripped
    }

    /// One logical request with retry and circuit breaker handling.
    fn fetch_with_retry(&self, symbol: &str, timeframe: Timeframe) -> Result<ParsedChart, DataError> {
        if !self.circuit_breaker.is_allowed() {
            return Err(self.refused(symbol));
        }

        let url = Self::chart_url(symbol, timeframe);
        let mut last_error: Option<DataError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                let reason = last_error
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default();
                warn!(
                    symbol,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    reason = %reason,
                    "retrying chart request"
                );
                std::thread::sleep(delay);
            }

            if !self.circuit_breaker.is_allowed() {
                return Err(self.refused(symbol));
            }

            debug!(symbol, %url, "requesting chart");
            let resp = match self.client.get(&url).send() {
                Ok(resp) => resp,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    last_error = Some(DataError::NetworkUnreachable(e.to_string()));
                    continue;
                }
                Err(e) => return Err(DataError::NetworkUnreachable(e.to_string())),
            };

            let status = resp.status();

            if status == reqwest::StatusCode::FORBIDDEN {
                self.circuit_breaker.trip();
                return Err(DataError::CircuitBreakerTripped);
            }

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                self.circuit_breaker.record_failure();
                let retry_after = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                last_error = Some(DataError::RateLimited {
                    retry_after_secs: retry_after,
                });
                continue;
            }

            if status == reqwest::StatusCode::UNAUTHORIZED {
                return Err(DataError::AuthenticationRequired(
                    "Yahoo Finance requires authentication".into(),
                ));
            }

            // Unknown symbols come back as 404 with a JSON error body.
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(DataError::SymbolNotFound {
                    symbol: symbol.to_string(),
                });
            }

            if !status.is_success() {
                self.circuit_breaker.record_failure();
                last_error = Some(DataError::Other(format!("HTTP {status} for {symbol}")));
                continue;
            }

            let body = resp
                .text()
                .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;
            let parsed = Self::parse_body(symbol, &body)?;
            self.circuit_breaker.record_success();
            return Ok(parsed);
        }

        Err(last_error.unwrap_or_else(|| DataError::Other("max retries exceeded".into())))
    }
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(&self, symbol: &str, timeframe: Timeframe) -> Result<FetchResult, DataError> {
        let parsed = self.fetch_with_retry(symbol, timeframe)?;
        let mut bars = canonicalize(parsed.bars);
        if let Some(width) = timeframe.resample_bucket() {
            bars = resample(&bars, width);
        }
        Ok(FetchResult {
            symbol: symbol.to_string(),
            display_name: parsed.display_name,
            bars,
            source: DataSource::YahooFinance,
        })
    }

    fn is_available(&self) -> bool {
        self.circuit_breaker.is_allowed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_BARS: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"symbol": "AAPL", "longName": "Apple Inc.", "shortName": "Apple"},
                "timestamp": [1717372800, 1717459200, 1717545600],
                "indicators": {"quote": [{
                    "open":   [190.0, null, 192.0],
                    "high":   [193.0, null, 195.5],
                    "low":    [189.5, null, 191.0],
                    "close":  [192.5, null, 195.0],
                    "volume": [51000000, null, 47000000]
                }]}
            }],
            "error": null
        }
    }"#;

    #[test]
    fn parses_bars_and_skips_empty_slots() {
        let parsed = YahooProvider::parse_body("AAPL", TWO_BARS).unwrap();
        assert_eq!(parsed.bars.len(), 2);
        assert_eq!(parsed.bars[0].close, 192.5);
        assert_eq!(parsed.bars[1].volume, 47_000_000.0);
        assert_eq!(parsed.bars[0].timestamp.timestamp(), 1_717_372_800);
    }

    #[test]
    fn prefers_long_name() {
        let parsed = YahooProvider::parse_body("AAPL", TWO_BARS).unwrap();
        assert_eq!(parsed.display_name.as_deref(), Some("Apple Inc."));
    }

    #[test]
    fn falls_back_to_short_name() {
        let body = TWO_BARS.replace(r#""longName": "Apple Inc.", "#, "");
        let parsed = YahooProvider::parse_body("AAPL", &body).unwrap();
        assert_eq!(parsed.display_name.as_deref(), Some("Apple"));
    }

    #[test]
    fn no_meta_means_no_name() {
        let body = TWO_BARS.replace(
            r#""meta": {"symbol": "AAPL", "longName": "Apple Inc.", "shortName": "Apple"},"#,
            "",
        );
        let parsed = YahooProvider::parse_body("AAPL", &body).unwrap();
        assert_eq!(parsed.display_name, None);
    }

    #[test]
    fn not_found_maps_to_symbol_not_found() {
        let body = r#"{"chart": {"result": null, "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}}}"#;
        let err = YahooProvider::parse_body("ZZZZ", body).unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound { ref symbol } if symbol == "ZZZZ"));
    }

    #[test]
    fn other_errors_are_format_changes() {
        let body = r#"{"chart": {"result": null, "error": {"code": "Bad Request", "description": "Invalid input"}}}"#;
        let err = YahooProvider::parse_body("AAPL", body).unwrap_err();
        assert!(matches!(err, DataError::ResponseFormatChanged(_)));
    }

    #[test]
    fn garbage_body_is_format_change() {
        let err = YahooProvider::parse_body("AAPL", "<html>").unwrap_err();
        assert!(matches!(err, DataError::ResponseFormatChanged(_)));
    }

    #[test]
    fn no_timestamps_is_not_found() {
        let body = r#"{"chart": {"result": [{"meta": {}, "indicators": {"quote": [{}]}}], "error": null}}"#;
        let err = YahooProvider::parse_body("NEWCO", body).unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound { .. }));
    }

    #[test]
    fn url_uses_range_and_interval() {
        let url = YahooProvider::chart_url("MSFT", Timeframe::Hour4);
        assert!(url.contains("/MSFT?"));
        assert!(url.contains("range=60d"));
        assert!(url.contains("interval=1h"));
    }

    #[test]
    fn tripped_breaker_blocks_fetch() {
        let breaker = Arc::new(CircuitBreaker::new(Duration::from_secs(60)));
        breaker.trip();
        let provider = YahooProvider::new(breaker).unwrap();
        assert!(!provider.is_available());
        assert!(matches!(
            provider.fetch("AAPL", Timeframe::Day1),
            Err(DataError::CircuitBreakerTripped)
        ));
    }
}
