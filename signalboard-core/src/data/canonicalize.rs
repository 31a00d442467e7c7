//! Canonical bar ordering: no void bars, strictly increasing timestamps.

use tracing::debug;

use crate::domain::Bar;

/// Drop void bars, sort by timestamp, and keep the last bar of each duplicated
/// timestamp (providers append revisions after the first copy).
pub fn canonicalize(bars: Vec<Bar>) -> Vec<Bar> {
    let before = bars.len();
    let mut kept: Vec<Bar> = bars.into_iter().filter(|b| !b.is_void()).collect();
    let void_dropped = before - kept.len();

    // Stable, so later revisions of a timestamp stay after earlier ones.
    kept.sort_by_key(|b| b.timestamp);

    let mut out: Vec<Bar> = Vec::with_capacity(kept.len());
    for bar in kept {
        match out.last_mut() {
            Some(last) if last.timestamp == bar.timestamp => *last = bar,
            _ => out.push(bar),
        }
    }

    debug!(
        input = before,
        void_dropped,
        output = out.len(),
        "canonicalized bars"
    );
    out
}
