//! Market-data collaborator traits.

use crate::error::NetworkError;
use crate::types::{DateRange, FundamentalSummary, Frequency, OhlcRow, SearchMatch, Symbol};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Descriptive fields a provider returns alongside price rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteMeta {
    pub currency: Option<String>,
    pub long_name: Option<String>,
    pub short_name: Option<String>,
    pub exchange: Option<String>,
    pub regular_market_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub year_high: Option<f64>,
    pub year_low: Option<f64>,
    pub market_cap: Option<f64>,
    /// Exchange offset from UTC in seconds
    pub gmt_offset: i32,
}

impl QuoteMeta {
    /// Project the meta block onto the fundamentals summary.
    pub fn to_summary(&self) -> FundamentalSummary {
        FundamentalSummary {
            company_name: self.long_name.clone().or_else(|| self.short_name.clone()),
            currency: self.currency.clone(),
            exchange: self.exchange.clone(),
            market_price: self.regular_market_price,
            previous_close: self.previous_close,
            year_high: self.year_high,
            year_low: self.year_low,
            market_cap: self.market_cap,
        }
    }
}

/// Rows plus meta for one fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    pub rows: Vec<OhlcRow>,
    pub meta: QuoteMeta,
}

impl PriceHistory {
    pub fn new(rows: Vec<OhlcRow>, meta: QuoteMeta) -> Self {
        Self { rows, meta }
    }

    /// Whether any row carries a usable close.
    pub fn has_valid_close(&self) -> bool {
        self.rows.iter().any(|r| r.valid_close().is_some())
    }
}

/// Source of historical prices and quote probes.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch rows for `symbol` at the native `interval`, oldest first.
    async fn fetch_history(
        &self,
        symbol: &Symbol,
        interval: Frequency,
        range: &DateRange,
    ) -> Result<PriceHistory, NetworkError>;

    /// One-day probe used to validate a symbol and read its meta.
    async fn fetch_quote(&self, symbol: &Symbol) -> Result<PriceHistory, NetworkError>;

    /// Provider name for logs.
    fn name(&self) -> &str;
}

/// Free-text to ticker lookup service.
#[async_trait]
pub trait SymbolSearch: Send + Sync {
    /// Ranked matches for `query`, best first.
    async fn search(&self, query: &str) -> Result<Vec<SearchMatch>, NetworkError>;

    fn name(&self) -> &str;
}
