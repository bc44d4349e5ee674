//! Raw OHLC rows and the cleaned close-price series.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Frequency;
use crate::error::ValidationError;

/// Raw row as delivered by a market-data provider.
///
/// Any field may be missing; providers report gaps as nulls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OhlcRow {
    /// Unix timestamp in milliseconds (UTC)
    pub timestamp: i64,
    /// Opening price
    pub open: Option<f64>,
    /// Highest price
    pub high: Option<f64>,
    /// Lowest price
    pub low: Option<f64>,
    /// Closing price
    pub close: Option<f64>,
    /// Trading volume
    pub volume: Option<f64>,
}

impl OhlcRow {
    /// Create a row with every field present.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close: Some(close),
            volume: Some(volume),
        }
    }

    /// Create a row carrying only a close.
    pub fn close_only(timestamp: i64, close: Option<f64>) -> Self {
        Self {
            timestamp,
            open: None,
            high: None,
            low: None,
            close,
            volume: None,
        }
    }

    /// The close, if present and finite.
    #[inline]
    pub fn valid_close(&self) -> Option<f64> {
        self.close.filter(|c| c.is_finite())
    }

    /// Get the timestamp as a DateTime.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    /// Calendar date of the row in the exchange's local time.
    pub fn local_date(&self, utc_offset_secs: i32) -> Option<NaiveDate> {
        let offset = FixedOffset::east_opt(utc_offset_secs)?;
        self.datetime()
            .map(|dt| dt.with_timezone(&offset).date_naive())
    }
}

/// A single (date, close) observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Clean close-price series at a single frequency.
///
/// Dates are strictly increasing and every close is finite. The only way to
/// build one is [`PriceSeries::new`], which enforces both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    /// Symbol identifier
    pub symbol: String,
    /// Frequency of the observations
    pub frequency: Frequency,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Create a validated series.
    pub fn new(
        symbol: impl Into<String>,
        frequency: Frequency,
        points: Vec<PricePoint>,
    ) -> Result<Self, ValidationError> {
        if let Some(bad) = points.iter().find(|p| !p.close.is_finite()) {
            return Err(ValidationError::InvalidSeries(format!(
                "non-finite close on {}",
                bad.date
            )));
        }
        if let Some(pair) = points.windows(2).find(|w| w[0].date >= w[1].date) {
            return Err(ValidationError::InvalidSeries(format!(
                "dates not strictly increasing at {} -> {}",
                pair[0].date, pair[1].date
            )));
        }
        Ok(Self {
            symbol: symbol.into(),
            frequency,
            points,
        })
    }

    /// Get the number of observations.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All observations, oldest first.
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Extract close prices as a vector.
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// Extract dates as a vector.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// Get the first observation.
    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    /// Get the last observation.
    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Get the last N observations.
    pub fn tail(&self, n: usize) -> &[PricePoint] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }

    /// Get an iterator over the observations.
    pub fn iter(&self) -> impl Iterator<Item = &PricePoint> {
        self.points.iter()
    }
}
