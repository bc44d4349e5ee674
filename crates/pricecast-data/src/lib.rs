//! Market data access for the analysis pipeline.
//!
//! - [`SymbolResolver`]: free-text query to ticker, direct probe then search
//! - [`SeriesAcquirer`]: provider rows to a clean, frequency-aligned series
//! - [`YahooProvider`]: HTTP chart and search endpoints
//! - [`CsvProvider`] and [`StaticSymbolSearch`]: offline collaborators

mod acquisition;
mod csv_source;
mod fundamentals;
mod resolver;
pub mod retry;
mod static_search;
pub mod yahoo;

pub use acquisition::{clean_rows, resample_monthly, SeriesAcquirer};
pub use csv_source::{load_rows, CsvProvider};
pub use fundamentals::fetch_fundamentals;
pub use resolver::SymbolResolver;
pub use retry::{Backoff, RetryPolicy};
pub use static_search::StaticSymbolSearch;
pub use yahoo::{YahooConfig, YahooProvider};
