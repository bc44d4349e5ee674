//! Collaborator traits.

mod calendar;
mod data_source;
mod indicator;

pub use calendar::{HolidayCalendar, TradingCalendar, WeekdayCalendar};
pub use data_source::{MarketDataProvider, PriceHistory, QuoteMeta, SymbolSearch};
pub use indicator::Indicator;
