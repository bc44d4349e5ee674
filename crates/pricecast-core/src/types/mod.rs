//! Core data types for the analysis pipeline.

mod frequency;
mod fundamentals;
mod horizon;
mod range;
mod series;
mod symbol;

pub use frequency::{month_end, month_end_after, Frequency};
pub use fundamentals::{FundamentalSummary, Fundamentals};
pub use horizon::{Horizon, Order};
pub use range::DateRange;
pub use series::{OhlcRow, PricePoint, PriceSeries};
pub use symbol::{Provenance, ResolvedSymbol, SearchMatch, Symbol};
