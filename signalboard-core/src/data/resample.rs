//! Aggregate fine bars into wider fixed-width buckets.
//!
//! Buckets are aligned to the Unix epoch in UTC, so a 4h bucket always starts
//! at 00:00, 04:00, 08:00 and so on. Each output bar is stamped with its
//! bucket start.

use chrono::{DateTime, Duration, Utc};

use crate::domain::Bar;

fn bucket_start(ts: DateTime<Utc>, width_secs: i64) -> DateTime<Utc> {
    let secs = ts.timestamp();
    let start = secs - secs.rem_euclid(width_secs);
    DateTime::from_timestamp(start, 0).unwrap_or(ts)
}

fn merge(acc: &mut Bar, bar: &Bar) {
    acc.high = acc.high.max(bar.high);
    acc.low = acc.low.min(bar.low);
    acc.close = bar.close;
    acc.volume += bar.volume;
}

/// Resample time-ordered `bars` into buckets of `width`.
///
/// Open of the first bar, max high, min low, close of the last bar, summed
/// volume. A non-positive width returns the input unchanged.
pub fn resample(bars: &[Bar], width: Duration) -> Vec<Bar> {
    let width_secs = width.num_seconds();
    if width_secs <= 0 {
        return bars.to_vec();
    }

    let mut out: Vec<Bar> = Vec::new();
    for bar in bars {
        let start = bucket_start(bar.timestamp, width_secs);
        match out.last_mut() {
            Some(current) if current.timestamp == start => merge(current, bar),
            _ => out.push(Bar {
                timestamp: start,
                ..bar.clone()
            }),
        }
    }
    out
}
