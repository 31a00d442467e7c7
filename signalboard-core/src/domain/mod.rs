//! Domain types for signalboard

pub mod annotated;
pub mod bar;
pub mod signal;

pub use annotated::{AnnotatedBar, IndicatorSet, ReadyBar, ScoredBar, Trend};
pub use bar::{validate_order, validate_values, Bar, BarError, BarSeries};
pub use signal::{ScoreBreakdown, Side, Transitions, Trigger};
