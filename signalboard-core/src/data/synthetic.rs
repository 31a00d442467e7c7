//! Synthetic bars for offline development.
//!
//! A random walk from 100.0, seeded from the BLAKE3 hash of the symbol so the
//! same symbol always yields the same series. Results built on these bars are
//! tagged `DataSource::Synthetic`.

use chrono::{DateTime, Datelike, TimeZone, Utc, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::timeframe::Timeframe;
use crate::domain::Bar;

const START_PRICE: f64 = 100.0;

/// Roughly what the live provider returns for each timeframe's lookback range.
pub fn default_bar_count(timeframe: Timeframe) -> usize {
    match timeframe {
        Timeframe::Hour1 => 420,
        Timeframe::Hour4 => 120,
        Timeframe::Day1 => 252,
        Timeframe::Week1 => 260,
        Timeframe::Month1 => 120,
    }
}

fn anchor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 6, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH)
}

fn is_weekend(ts: DateTime<Utc>) -> bool {
    matches!(ts.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Generate `count` bars for `symbol` at `timeframe`. Daily series skip weekends.
pub fn generate(symbol: &str, timeframe: Timeframe, count: usize) -> Vec<Bar> {
    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let spacing = timeframe.nominal_spacing();
    let mut bars = Vec::with_capacity(count);
    let mut price = START_PRICE;
    let mut current = anchor();

    while bars.len() < count {
        if timeframe == Timeframe::Day1 && is_weekend(current) {
            current += spacing;
            continue;
        }

        let ret: f64 = rng.gen_range(-0.03..0.03);
        let open = price;
        let close = price * (1.0 + ret);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(500_000..5_000_000u64) as f64;

        bars.push(Bar {
            timestamp: current,
            open,
            high,
            low,
            close,
            volume,
        });

        price = close;
        current += spacing;
    }

    bars
}
