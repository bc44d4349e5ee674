//! Moving average indicators.

use pricecast_core::{Indicator, IndicatorError};

fn check_window(kind: &str, window: usize) -> Result<(), IndicatorError> {
    if window == 0 {
        return Err(IndicatorError::InvalidParameter(format!(
            "{} window must be greater than 0",
            kind
        )));
    }
    Ok(())
}

/// Simple Moving Average (SMA).
///
/// Arithmetic mean of the last `window` closes, undefined until the window fills.
#[derive(Debug, Clone)]
pub struct Sma {
    window: usize,
    name: String,
}

impl Sma {
    /// Create a new SMA with the specified window.
    pub fn new(window: usize) -> Result<Self, IndicatorError> {
        check_window("SMA", window)?;
        Ok(Self::with_window(window))
    }

    pub(crate) fn with_window(window: usize) -> Self {
        Self {
            window,
            name: format!("SMA_{}", window),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl Indicator for Sma {
    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let mut result = vec![None; data.len()];
        if data.len() < self.window {
            return result;
        }

        let window_f64 = self.window as f64;
        let mut sum: f64 = data[..self.window].iter().sum();
        result[self.window - 1] = Some(sum / window_f64);

        // Sliding window
        for i in self.window..data.len() {
            sum = sum - data[i - self.window] + data[i];
            result[i] = Some(sum / window_f64);
        }

        result
    }

    fn warmup(&self) -> usize {
        self.window - 1
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Exponential Moving Average (EMA).
///
/// Seeded with the first close and defined at every index.
#[derive(Debug, Clone)]
pub struct Ema {
    window: usize,
    alpha: f64,
    name: String,
}

impl Ema {
    /// Create a new EMA with smoothing `2 / (window + 1)`.
    pub fn new(window: usize) -> Result<Self, IndicatorError> {
        check_window("EMA", window)?;
        Ok(Self::with_window(window))
    }

    pub(crate) fn with_window(window: usize) -> Self {
        Self {
            window,
            alpha: 2.0 / (window as f64 + 1.0),
            name: format!("EMA_{}", window),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl Indicator for Ema {
    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let mut result = Vec::with_capacity(data.len());
        let mut iter = data.iter();
        let Some(&first) = iter.next() else {
            return result;
        };

        let mut ema = first;
        result.push(Some(ema));
        let one_minus_alpha = 1.0 - self.alpha;
        for &price in iter {
            ema = self.alpha * price + one_minus_alpha * ema;
            result.push(Some(ema));
        }

        result
    }

    fn warmup(&self) -> usize {
        0
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sma() {
        let sma = Sma::new(3).unwrap();
        let result = sma.calculate(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_eq!(result.len(), 5);
        assert_eq!(result[0], None);
        assert_eq!(result[1], None);
        assert_relative_eq!(result[2].unwrap(), 2.0, epsilon = 1e-10); // (1+2+3)/3
        assert_relative_eq!(result[3].unwrap(), 3.0, epsilon = 1e-10);
        assert_relative_eq!(result[4].unwrap(), 4.0, epsilon = 1e-10);
    }

    #[test]
    fn test_sma_monthly_example() {
        let closes = [100.0, 102.0, 101.0, 105.0, 107.0, 106.0, 110.0];
        let result = Sma::new(3).unwrap().calculate(&closes);

        assert_relative_eq!(result[6].unwrap(), 323.0 / 3.0, epsilon = 1e-10);
        assert!((result[6].unwrap() - 107.67).abs() < 0.005);
    }

    #[test]
    fn test_sma_short_series() {
        let result = Sma::new(5).unwrap().calculate(&[1.0, 2.0, 3.0]);
        assert_eq!(result, vec![None, None, None]);
        assert!(Sma::new(5).unwrap().calculate(&[]).is_empty());
    }

    #[test]
    fn test_zero_window_rejected() {
        assert!(matches!(Sma::new(0), Err(IndicatorError::InvalidParameter(_))));
        assert!(matches!(Ema::new(0), Err(IndicatorError::InvalidParameter(_))));
    }

    #[test]
    fn test_ema() {
        let ema = Ema::new(3).unwrap();
        let result = ema.calculate(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        // alpha = 2/(3+1) = 0.5
        assert_eq!(result.len(), 5);
        assert_relative_eq!(result[0].unwrap(), 1.0);
        assert_relative_eq!(result[1].unwrap(), 1.5);
        assert_relative_eq!(result[2].unwrap(), 2.25);
        assert_relative_eq!(result[4].unwrap(), 4.0625);
    }

    #[test]
    fn test_names() {
        assert_eq!(Sma::new(20).unwrap().name(), "SMA_20");
        assert_eq!(Ema::new(50).unwrap().name(), "EMA_50");
    }

    #[test]
    fn test_ema_window_and_alpha() {
        let ema = Ema::new(20).unwrap();
        assert_eq!(ema.window(), 20);
        assert_relative_eq!(ema.alpha(), 2.0 / 21.0);
        assert_eq!(Sma::new(50).unwrap().window(), 50);
    }
}
