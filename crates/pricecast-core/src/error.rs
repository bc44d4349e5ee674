//! Error types for the analysis core.

use thiserror::Error;

use crate::types::{Frequency, Order};

/// Top-level analysis error.
///
/// Every component fails fast with one of these variants. Transport problems
/// never appear here directly: they are downgraded to [`PricecastError::NotFound`]
/// or [`PricecastError::NoData`] at the component boundary.
#[derive(Error, Debug)]
pub enum PricecastError {
    #[error("Symbol not found for query '{query}'")]
    NotFound { query: String },

    #[error("No data available for {symbol}")]
    NoData { symbol: String },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Fit error: {0}")]
    Fit(#[from] FitError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Malformed caller input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid symbol '{symbol}': {reason}")]
    InvalidSymbol { symbol: String, reason: String },

    #[error("Horizon {value} is outside the allowed range {min}..={max}")]
    HorizonOutOfRange { value: i64, min: usize, max: usize },

    #[error("Unknown horizon label: {0}")]
    UnknownHorizonLabel(String),

    #[error("Invalid ARIMA order ({p},{d},{q}): {reason}")]
    InvalidOrder {
        p: usize,
        d: usize,
        q: usize,
        reason: String,
    },

    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    #[error("Cannot resample {from} data to {to}")]
    UnsupportedResample { from: Frequency, to: Frequency },

    #[error("Invalid price series: {0}")]
    InvalidSeries(String),

    #[error("Invalid frequency: {0}")]
    InvalidFrequency(String),

    #[error("Invalid setting '{field}': {reason}")]
    InvalidSetting { field: String, reason: String },
}

/// The model could not be estimated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    #[error("Insufficient data: need {required} observations, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Series is still non-stationary after {d} difference(s)")]
    NonStationary { d: usize },

    #[error("Estimator for ARIMA{order} did not converge after {iterations} iterations")]
    NotConverged { order: Order, iterations: usize },

    #[error("No candidate order could be fitted")]
    NoCandidate,

    #[error("Invalid order: {0}")]
    InvalidOrder(#[from] ValidationError),
}

/// Indicator construction errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Transport-level failure talking to an external collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    #[error("Request timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected HTTP status {status}")]
    Status { status: u16 },

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl NetworkError {
    /// Whether a retry has a chance of succeeding.
    pub fn is_retryable(&self) -> bool {
        match self {
            NetworkError::Timeout { .. } | NetworkError::Transport(_) => true,
            NetworkError::Status { status } => {
                matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
            }
            NetworkError::Decode(_) => false,
        }
    }
}

/// Result type alias for analysis operations.
pub type PricecastResult<T> = Result<T, PricecastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_error_retryable() {
        assert!(NetworkError::Timeout { timeout_ms: 100 }.is_retryable());
        assert!(NetworkError::Transport("reset".into()).is_retryable());
        assert!(NetworkError::Status { status: 503 }.is_retryable());
        assert!(NetworkError::Status { status: 429 }.is_retryable());
        assert!(!NetworkError::Status { status: 404 }.is_retryable());
        assert!(!NetworkError::Decode("bad json".into()).is_retryable());
    }

    #[test]
    fn test_fit_error_converts_to_top_level() {
        let err: PricecastError = FitError::NoCandidate.into();
        assert!(matches!(err, PricecastError::Fit(FitError::NoCandidate)));
        assert_eq!(err.to_string(), "Fit error: No candidate order could be fitted");
    }
}
