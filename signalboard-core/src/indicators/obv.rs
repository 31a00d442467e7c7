//! On-Balance Volume (OBV).
//!
//! Running sum of volume signed by the close-to-close direction: added on an
//! up close, subtracted on a down close, unchanged on a flat close.
//! The first bar has no predecessor, so the sum starts at bar 1.
//! Lookback: 1.

use super::{defined, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone, Default)]
pub struct Obv;

impl Obv {
    pub fn new() -> Self {
        Self
    }
}

impl Indicator for Obv {
    fn name(&self) -> &str {
        "obv"
    }

    fn lookback(&self) -> usize {
        1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let mut result = vec![None; bars.len()];
        let mut total = 0.0;

        for (i, pair) in bars.windows(2).enumerate() {
            let step = signed_volume(&pair[0], &pair[1]);
            match step {
                Some(delta) => {
                    total += delta;
                    result[i + 1] = Some(total);
                }
                // A gap breaks the running sum for good.
                None => return result,
            }
        }

        result
    }
}

/// Volume contribution of `curr`, or `None` when any input is NaN.
fn signed_volume(prev: &Bar, curr: &Bar) -> Option<f64> {
    let prev_close = defined(prev.close)?;
    let close = defined(curr.close)?;
    let volume = defined(curr.volume)?;
    Some(if close > prev_close {
        volume
    } else if close < prev_close {
        -volume
    } else {
        0.0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn obv_signed_running_sum() {
        let mut bars = make_bars(&[10.0, 11.0, 11.0, 9.0, 12.0]);
        for (i, bar) in bars.iter_mut().enumerate() {
            bar.volume = 100.0 * (i as f64 + 1.0);
        }
        // +200 (up), 0 (flat), -400 (down), +500 (up)
        let result = Obv::new().compute(&bars);
        assert_eq!(result, vec![None, Some(200.0), Some(200.0), Some(-200.0), Some(300.0)]);
    }

    #[test]
    fn obv_single_bar_is_undefined() {
        let bars = make_bars(&[10.0]);
        assert_eq!(Obv::new().compute(&bars), vec![None]);
    }

    #[test]
    fn obv_stops_at_nan() {
        let mut bars = make_bars(&[10.0, 11.0, 12.0, 13.0]);
        bars[2].close = f64::NAN;
        let result = Obv::new().compute(&bars);
        assert_eq!(result[1], Some(1000.0));
        assert_eq!(result[2], None);
        assert_eq!(result[3], None);
    }

    #[test]
    fn obv_lookback() {
        assert_eq!(Obv::new().lookback(), 1);
    }
}
