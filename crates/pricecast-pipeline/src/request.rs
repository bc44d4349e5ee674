//! Parameters of a single analysis run.

use pricecast_core::{DateRange, Frequency, Horizon, ValidationError};
use pricecast_forecast::OrderMode;
use serde::{Deserialize, Serialize};

/// Everything a front-end chooses for one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Company name or ticker as typed
    pub query: String,
    /// History to fetch
    pub range: DateRange,
    /// Native fetch interval
    pub interval: Frequency,
    /// Frequency of the analysed series
    pub output: Frequency,
    /// Future periods to forecast
    pub horizon: Horizon,
    /// Automatic or fixed ARIMA order
    pub order_mode: OrderMode,
    /// Also look up the company snapshot
    pub include_fundamentals: bool,
    /// Rows shown in the text preview
    pub preview_rows: usize,
}

impl AnalysisRequest {
    /// Monthly analysis of the full history with automatic order selection.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            range: DateRange::Max,
            interval: Frequency::Daily,
            output: Frequency::Monthly,
            horizon: Horizon::default(),
            order_mode: OrderMode::default(),
            include_fundamentals: true,
            preview_rows: 5,
        }
    }

    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }

    pub fn with_frequencies(mut self, interval: Frequency, output: Frequency) -> Self {
        self.interval = interval;
        self.output = output;
        self
    }

    pub fn with_horizon(mut self, horizon: Horizon) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_order_mode(mut self, order_mode: OrderMode) -> Self {
        self.order_mode = order_mode;
        self
    }

    pub fn with_fundamentals(mut self, include: bool) -> Self {
        self.include_fundamentals = include;
        self
    }

    /// Check the parts that do not need the network.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.interval.is_coarser_than(self.output) {
            return Err(ValidationError::UnsupportedResample {
                from: self.interval,
                to: self.output,
            });
        }
        self.order_mode.validate()
    }
}
