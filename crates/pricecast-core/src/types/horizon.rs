//! Forecast horizon and ARIMA order parameters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Number of future periods to forecast, bounded to `1..=60`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Horizon(usize);

impl Horizon {
    pub const MIN: usize = 1;
    pub const MAX: usize = 60;

    pub fn new(periods: usize) -> Result<Self, ValidationError> {
        if !(Self::MIN..=Self::MAX).contains(&periods) {
            return Err(ValidationError::HorizonOutOfRange {
                value: periods as i64,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(periods))
    }

    /// Map a preset label onto its period count (6, 12 or 24).
    pub fn from_label(label: &str) -> Result<Self, ValidationError> {
        let periods = match label.trim().to_lowercase().as_str() {
            "6 months" | "6m" | "6mo" => 6,
            "1 year" | "1y" | "12m" => 12,
            "2 years" | "2y" | "24m" => 24,
            _ => return Err(ValidationError::UnknownHorizonLabel(label.to_string())),
        };
        Self::new(periods)
    }

    pub fn periods(&self) -> usize {
        self.0
    }
}

impl Default for Horizon {
    fn default() -> Self {
        Self(12)
    }
}

impl TryFrom<usize> for Horizon {
    type Error = ValidationError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Horizon> for usize {
    fn from(value: Horizon) -> Self {
        value.0
    }
}

impl FromStr for Horizon {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<i64>() {
            Ok(n) if n < 1 => Err(ValidationError::HorizonOutOfRange {
                value: n,
                min: Self::MIN,
                max: Self::MAX,
            }),
            Ok(n) => Self::new(n as usize),
            Err(_) => Self::from_label(s),
        }
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ARIMA order `(p, d, q)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Order {
    /// Autoregressive lags
    pub p: usize,
    /// Differencing passes
    pub d: usize,
    /// Moving-average lags
    pub q: usize,
}

impl Order {
    pub const fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    /// Smallest series length this order can be fitted on.
    pub fn min_observations(&self) -> usize {
        self.p + self.d + self.q + 1
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.p, self.d, self.q)
    }
}

impl FromStr for Order {
    type Err = ValidationError;

    /// Parses `p,d,q` with optional surrounding parentheses.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('(').trim_end_matches(')');
        let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        let invalid = |reason: &str| ValidationError::InvalidOrder {
            p: 0,
            d: 0,
            q: 0,
            reason: format!("'{}': {}", s, reason),
        };
        if parts.len() != 3 {
            return Err(invalid("expected three comma-separated integers"));
        }
        let mut values = [0usize; 3];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| invalid("not a non-negative integer"))?;
        }
        Ok(Order::new(values[0], values[1], values[2]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizon_bounds() {
        assert!(Horizon::new(0).is_err());
        assert!(Horizon::new(61).is_err());
        assert_eq!(Horizon::new(60).unwrap().periods(), 60);
    }

    #[test]
    fn test_horizon_labels() {
        assert_eq!(Horizon::from_label("6 Months").unwrap().periods(), 6);
        assert_eq!(Horizon::from_label("1 Year").unwrap().periods(), 12);
        assert_eq!(Horizon::from_label("2 years").unwrap().periods(), 24);
        assert!(Horizon::from_label("forever").is_err());
    }

    #[test]
    fn test_horizon_parse() {
        assert_eq!("18".parse::<Horizon>().unwrap().periods(), 18);
        assert_eq!("2y".parse::<Horizon>().unwrap().periods(), 24);
        assert!(matches!(
            "-3".parse::<Horizon>(),
            Err(ValidationError::HorizonOutOfRange { value: -3, .. })
        ));
    }

    #[test]
    fn test_order_parse_and_display() {
        let order: Order = "(5,1,0)".parse().unwrap();
        assert_eq!(order, Order::new(5, 1, 0));
        assert_eq!(order.to_string(), "(5,1,0)");
        assert_eq!(order.min_observations(), 7);
        assert!("1,2".parse::<Order>().is_err());
        assert!("a,b,c".parse::<Order>().is_err());
    }
}
