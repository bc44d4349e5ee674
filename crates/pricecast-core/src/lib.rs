//! Core types and traits for the price analysis pipeline.
//!
//! This crate provides the foundational building blocks including:
//! - Series types (OhlcRow, PriceSeries) and frequencies
//! - Symbols, date ranges, horizons and ARIMA orders
//! - The error taxonomy shared by every component
//! - Collaborator traits for data providers, symbol search, indicators and calendars

pub mod error;
pub mod traits;
pub mod types;

pub use error::{
    FitError, IndicatorError, NetworkError, PricecastError, PricecastResult, ValidationError,
};
pub use traits::*;
pub use types::*;
