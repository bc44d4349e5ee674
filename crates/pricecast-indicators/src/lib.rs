//! Technical indicators over close-price series.
//!
//! This crate provides:
//! - Moving averages (SMA, EMA)
//! - Momentum indicators (RSI, simple returns)
//! - [`IndicatorEngine`], which builds the standard date-aligned indicator table
//!
//! Every indicator returns one entry per input value; entries the indicator
//! cannot define yet are `None`.

pub mod engine;
pub mod momentum;
pub mod moving_average;

pub use engine::{IndicatorEngine, IndicatorRow, IndicatorSet};
pub use momentum::{Returns, Rsi};
pub use moving_average::{Ema, Sma};
