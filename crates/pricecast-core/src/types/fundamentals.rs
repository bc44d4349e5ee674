//! Company snapshot shown next to the charts.

use serde::{Deserialize, Serialize};

/// Named optional fields; a field the provider did not send stays `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FundamentalSummary {
    pub company_name: Option<String>,
    pub currency: Option<String>,
    pub exchange: Option<String>,
    pub market_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub year_high: Option<f64>,
    pub year_low: Option<f64>,
    pub market_cap: Option<f64>,
}

impl FundamentalSummary {
    /// True when the provider sent nothing usable.
    pub fn is_empty(&self) -> bool {
        *self == FundamentalSummary::default()
    }
}

/// Fundamentals lookup outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Fundamentals {
    Available(FundamentalSummary),
    Unavailable { reason: String },
}

impl Fundamentals {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Fundamentals::Unavailable {
            reason: reason.into(),
        }
    }

    /// Wrap a summary, treating an empty one as unavailable.
    pub fn from_summary(summary: FundamentalSummary) -> Self {
        if summary.is_empty() {
            Fundamentals::unavailable("provider returned no fundamental fields")
        } else {
            Fundamentals::Available(summary)
        }
    }

    pub fn summary(&self) -> Option<&FundamentalSummary> {
        match self {
            Fundamentals::Available(summary) => Some(summary),
            Fundamentals::Unavailable { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_summary_is_unavailable() {
        let fundamentals = Fundamentals::from_summary(FundamentalSummary::default());
        assert!(fundamentals.summary().is_none());
    }

    #[test]
    fn test_partial_summary_is_available() {
        let summary = FundamentalSummary {
            currency: Some("INR".into()),
            ..Default::default()
        };
        let fundamentals = Fundamentals::from_summary(summary);
        assert_eq!(
            fundamentals.summary().and_then(|s| s.currency.as_deref()),
            Some("INR")
        );
        assert_eq!(fundamentals.summary().and_then(|s| s.market_cap), None);
    }
}
