//! Signal engine: annotation, composite scoring, transition detection.
//!
//! Each stage is a pure function over bar slices:
//!
//! 1. Annotate: attach every indicator to every bar
//! 2. Drop warm-up: keep bars whose indicators are all defined
//! 3. Score: composite score of a bar against its predecessor
//! 4. Transitions: buy/sell triggers from the latest three bars

pub mod annotate;
pub mod pipeline;
pub mod score;
pub mod transitions;

pub use annotate::{
    annotate, classify_trend, drop_incomplete, ready_bars, warmup_bars, IndicatorSuite,
};
pub use pipeline::{analyze, analyze_with_source, trailing_window, Analysis, AnalysisError};
pub use score::{breakdown, score, score_series, MAX_SCORE, MIN_SCORE};
pub use transitions::detect_transitions;
