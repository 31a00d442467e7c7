//! Market data: providers, CSV import, synthetic series, canonicalization.

pub mod canonicalize;
pub mod circuit_breaker;
pub mod csv_import;
pub mod loader;
pub mod provider;
pub mod resample;
pub mod synthetic;
pub mod timeframe;
pub mod yahoo;

pub use canonicalize::canonicalize;
pub use circuit_breaker::CircuitBreaker;
pub use loader::{dataset_hash, load_series, LoadError, LoadOptions, LoadedSeries};
pub use provider::{DataError, DataProvider, DataSource, FetchResult};
pub use resample::resample;
pub use timeframe::{ParseTimeframeError, Timeframe};
pub use yahoo::YahooProvider;
