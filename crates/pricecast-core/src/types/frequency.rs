//! Sampling frequency of a price series.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Frequency of a series, used both as the provider's native interval and as
/// the output frequency after resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Frequency {
    /// One observation per trading session
    #[serde(rename = "1d", alias = "daily")]
    #[default]
    Daily,
    /// One observation per calendar month, stamped at month end
    #[serde(rename = "1mo", alias = "monthly")]
    Monthly,
}

impl Frequency {
    /// Interval string understood by the chart endpoint.
    pub fn as_interval(&self) -> &'static str {
        match self {
            Frequency::Daily => "1d",
            Frequency::Monthly => "1mo",
        }
    }

    /// Relative coarseness; a larger rank means longer periods.
    fn rank(&self) -> u8 {
        match self {
            Frequency::Daily => 0,
            Frequency::Monthly => 1,
        }
    }

    /// Whether `self` has longer periods than `other`.
    pub fn is_coarser_than(&self, other: Frequency) -> bool {
        self.rank() > other.rank()
    }

    /// Get all available frequencies.
    pub fn all() -> &'static [Frequency] {
        &[Frequency::Daily, Frequency::Monthly]
    }
}

/// Last calendar day of the month containing `date`.
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let first = NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date);
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// Month end `months` months after the month containing `date`.
pub fn month_end_after(date: NaiveDate, months: u32) -> NaiveDate {
    let first = NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date);
    first
        .checked_add_months(Months::new(months))
        .map(month_end)
        .unwrap_or(date)
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_interval())
    }
}

impl FromStr for Frequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1d" | "d" | "day" | "daily" => Ok(Frequency::Daily),
            "1mo" | "m" | "month" | "monthly" => Ok(Frequency::Monthly),
            _ => Err(ValidationError::InvalidFrequency(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_frequency_parse() {
        assert_eq!(Frequency::from_str("1d").unwrap(), Frequency::Daily);
        assert_eq!(Frequency::from_str("Monthly").unwrap(), Frequency::Monthly);
        assert_eq!(Frequency::from_str("1mo").unwrap(), Frequency::Monthly);
        assert!(Frequency::from_str("1w").is_err());
    }

    #[test]
    fn test_frequency_display() {
        assert_eq!(Frequency::Daily.to_string(), "1d");
        assert_eq!(Frequency::Monthly.to_string(), "1mo");
    }

    #[test]
    fn test_coarseness() {
        assert!(Frequency::Monthly.is_coarser_than(Frequency::Daily));
        assert!(!Frequency::Daily.is_coarser_than(Frequency::Monthly));
        assert!(!Frequency::Daily.is_coarser_than(Frequency::Daily));
    }

    #[test]
    fn test_month_end() {
        assert_eq!(month_end(date(2024, 2, 10)), date(2024, 2, 29));
        assert_eq!(month_end(date(2023, 2, 1)), date(2023, 2, 28));
        assert_eq!(month_end(date(2024, 12, 31)), date(2024, 12, 31));
    }

    #[test]
    fn test_month_end_after() {
        assert_eq!(month_end_after(date(2024, 1, 31), 1), date(2024, 2, 29));
        assert_eq!(month_end_after(date(2024, 11, 30), 2), date(2025, 1, 31));
        assert_eq!(month_end_after(date(2024, 3, 1), 1), date(2024, 4, 30));
    }
}
