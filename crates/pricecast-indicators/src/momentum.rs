//! Momentum indicators.

use pricecast_core::{Indicator, IndicatorError};

/// Relative Strength Index (RSI).
///
/// Uses a simple trailing mean of the last `period` gains and losses rather
/// than Wilder smoothing. Defined from index `period` onwards.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    /// Create a new RSI indicator. The usual period is 14.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "RSI period must be greater than 0".to_string(),
            ));
        }
        Ok(Self::with_period(period))
    }

    pub(crate) fn with_period(period: usize) -> Self {
        Self {
            period,
            name: format!("RSI_{}", period),
        }
    }

    fn score(avg_gain: f64, avg_loss: f64) -> f64 {
        if avg_loss == 0.0 {
            if avg_gain > 0.0 {
                100.0
            } else {
                50.0
            }
        } else {
            100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
        }
    }
}

impl Indicator for Rsi {
    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let mut result = vec![None; data.len()];
        if data.len() <= self.period {
            return result;
        }

        // changes[i] belongs to data[i + 1]
        let (gains, losses): (Vec<f64>, Vec<f64>) = data
            .windows(2)
            .map(|w| {
                let change = w[1] - w[0];
                (change.max(0.0), (-change).max(0.0))
            })
            .unzip();

        let n = self.period as f64;
        let mut gain_sum: f64 = gains[..self.period].iter().sum();
        let mut loss_sum: f64 = losses[..self.period].iter().sum();
        result[self.period] = Some(Self::score(gain_sum / n, loss_sum / n));

        for t in (self.period + 1)..data.len() {
            let enter = t - 1;
            let leave = t - 1 - self.period;
            gain_sum += gains[enter] - gains[leave];
            loss_sum += losses[enter] - losses[leave];
            // Guard against drift below zero from the running sums
            let avg_gain = (gain_sum / n).max(0.0);
            let avg_loss = (loss_sum / n).max(0.0);
            result[t] = Some(Self::score(avg_gain, avg_loss).clamp(0.0, 100.0));
        }

        result
    }

    fn warmup(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Period-over-period simple returns, `close[t] / close[t-1] - 1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Returns;

impl Returns {
    pub fn new() -> Self {
        Self
    }
}

impl Indicator for Returns {
    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let mut result = Vec::with_capacity(data.len());
        if data.is_empty() {
            return result;
        }
        result.push(None);
        result.extend(
            data.windows(2)
                .map(|w| (w[0] != 0.0).then(|| w[1] / w[0] - 1.0)),
        );
        result
    }

    fn warmup(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        "Returns"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rsi_warmup() {
        let rsi = Rsi::new(14).unwrap();
        let data: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let result = rsi.calculate(&data);

        assert_eq!(result.len(), 20);
        assert!(result[..14].iter().all(Option::is_none));
        assert!(result[14..].iter().all(Option::is_some));
    }

    #[test]
    fn test_rsi_bounds() {
        let rsi = Rsi::new(14).unwrap();
        let data: Vec<f64> = (0..200)
            .map(|i| 100.0 + (i as f64 * 0.37).sin() * 12.0 + (i as f64 * 0.05))
            .collect();

        for value in rsi.calculate(&data).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&value));
        }
    }

    #[test]
    fn test_rsi_zero_loss_conventions() {
        let rsi = Rsi::new(3).unwrap();

        let rising = rsi.calculate(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(rising[3], Some(100.0));
        assert_eq!(rising[4], Some(100.0));

        let flat = rsi.calculate(&[7.0; 5]);
        assert_eq!(flat[3], Some(50.0));
    }

    #[test]
    fn test_rsi_known_value() {
        // changes: +2, -1, +3 -> avg gain 5/3, avg loss 1/3, RS = 5
        let rsi = Rsi::new(3).unwrap();
        let result = rsi.calculate(&[10.0, 12.0, 11.0, 14.0]);
        assert_relative_eq!(result[3].unwrap(), 100.0 - 100.0 / 6.0, epsilon = 1e-10);
    }

    #[test]
    fn test_rsi_short_series() {
        let rsi = Rsi::new(14).unwrap();
        assert_eq!(rsi.calculate(&[1.0; 14]), vec![None; 14]);
        assert!(Rsi::new(0).is_err());
    }

    #[test]
    fn test_returns() {
        let result = Returns.calculate(&[100.0, 110.0, 0.0, 5.0]);

        assert_eq!(result.len(), 4);
        assert_eq!(result[0], None);
        assert_relative_eq!(result[1].unwrap(), 0.1, epsilon = 1e-12);
        assert_relative_eq!(result[2].unwrap(), -1.0);
        // previous close is zero
        assert_eq!(result[3], None);
        assert!(Returns.calculate(&[]).is_empty());
    }
}
