//! CSV bar import.
//!
//! Expected header: `timestamp,open,high,low,close,volume` (`date` is accepted
//! for the first column). Timestamps are RFC 3339, `YYYY-MM-DD HH:MM:SS`
//! (taken as UTC), or a plain `YYYY-MM-DD` date at midnight UTC.

use std::io;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

use super::provider::DataError;
use crate::domain::Bar;

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "date")]
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}

/// Read bars from any reader. Rows are returned in file order.
pub fn read_bars_from<R: io::Read>(reader: R) -> Result<Vec<Bar>, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut bars = Vec::new();
    for (i, record) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = i + 1;
        let record = record.map_err(|e| DataError::Csv {
            row,
            reason: e.to_string(),
        })?;
        let timestamp = parse_timestamp(&record.timestamp).ok_or_else(|| DataError::Csv {
            row,
            reason: format!("unrecognized timestamp '{}'", record.timestamp),
        })?;
        bars.push(Bar {
            timestamp,
            open: record.open,
            high: record.high,
            low: record.low,
            close: record.close,
            volume: record.volume,
        });
    }

    let insane = bars.iter().filter(|b| !b.is_sane()).count();
    if insane > 0 {
        warn!(insane, "CSV contains bars that fail OHLC sanity checks");
    }
    debug!(rows = bars.len(), "read CSV bars");
    Ok(bars)
}

/// Read bars from a CSV file.
pub fn read_bars(path: &Path) -> Result<Vec<Bar>, DataError> {
    let file = std::fs::File::open(path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_bars_from(io::BufReader::new(file))
}
