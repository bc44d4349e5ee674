//! History ranges requested from a provider.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Span of history to fetch. `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DateRange {
    /// Everything the provider has.
    #[default]
    Max,
    /// Explicit bounds.
    Between { start: NaiveDate, end: NaiveDate },
}

impl DateRange {
    /// Create a bounded range, rejecting empty or inverted bounds.
    pub fn between(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::InvalidRange(format!(
                "start {} must be before end {}",
                start, end
            )));
        }
        Ok(DateRange::Between { start, end })
    }

    /// Resolve a named preset.
    pub fn preset(name: &str) -> Result<Self, ValidationError> {
        let bounds = |s: (i32, u32, u32), e: (i32, u32, u32)| {
            let start = NaiveDate::from_ymd_opt(s.0, s.1, s.2);
            let end = NaiveDate::from_ymd_opt(e.0, e.1, e.2);
            match (start, end) {
                (Some(start), Some(end)) => DateRange::between(start, end),
                _ => Err(ValidationError::InvalidRange(name.to_string())),
            }
        };

        match name.trim().to_lowercase().as_str() {
            "max" | "all" | "full" => Ok(DateRange::Max),
            "2010-2018" => bounds((2010, 1, 1), (2019, 1, 1)),
            "2021-2025" => bounds((2021, 1, 1), (2025, 1, 1)),
            other => Err(ValidationError::InvalidRange(format!(
                "unknown preset '{}' (expected {} or YYYY-MM-DD..YYYY-MM-DD)",
                other,
                Self::preset_names().join(", ")
            ))),
        }
    }

    /// Names accepted by [`DateRange::preset`].
    pub fn preset_names() -> &'static [&'static str] {
        &["max", "2010-2018", "2021-2025"]
    }

    /// Whether `date` falls inside the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        match self {
            DateRange::Max => true,
            DateRange::Between { start, end } => date >= *start && date < *end,
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateRange::Max => write!(f, "max"),
            DateRange::Between { start, end } => write!(f, "{}..{}", start, end),
        }
    }
}

impl FromStr for DateRange {
    type Err = ValidationError;

    /// Accepts a preset name or `YYYY-MM-DD..YYYY-MM-DD`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((start, end)) = s.split_once("..") {
            let parse = |v: &str| {
                NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d")
                    .map_err(|e| ValidationError::InvalidRange(format!("{}: {}", v, e)))
            };
            return DateRange::between(parse(start)?, parse(end)?);
        }
        DateRange::preset(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_between_rejects_inverted() {
        assert!(DateRange::between(date(2024, 1, 1), date(2023, 1, 1)).is_err());
        assert!(DateRange::between(date(2024, 1, 1), date(2024, 1, 1)).is_err());
    }

    #[test]
    fn test_presets() {
        assert_eq!(DateRange::preset("max").unwrap(), DateRange::Max);
        assert_eq!(
            DateRange::preset("2010-2018").unwrap(),
            DateRange::Between {
                start: date(2010, 1, 1),
                end: date(2019, 1, 1)
            }
        );
        assert!(DateRange::preset("1999").is_err());
    }

    #[test]
    fn test_unknown_preset_lists_names() {
        for name in DateRange::preset_names() {
            assert!(DateRange::preset(name).is_ok());
        }
        let err = DateRange::preset("1999").unwrap_err().to_string();
        assert!(err.contains("max, 2010-2018, 2021-2025"));
    }

    #[test]
    fn test_parse_explicit() {
        let range: DateRange = "2021-01-01..2025-01-01".parse().unwrap();
        assert!(range.contains(date(2024, 12, 31)));
        assert!(!range.contains(date(2025, 1, 1)));
        assert!("2021-01-01..garbage".parse::<DateRange>().is_err());
    }
}
