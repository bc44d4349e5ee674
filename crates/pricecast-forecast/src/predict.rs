//! Forecast output types and the prediction arithmetic.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

/// Two-sided coverage of the forecast intervals.
pub const INTERVAL_COVERAGE: f64 = 0.95;

/// Which half of the forecast to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictMode {
    InSample,
    Future,
}

/// In-sample fitted value for one training date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FittedPoint {
    pub date: NaiveDate,
    /// `None` inside the conditioning window
    pub value: Option<f64>,
}

/// Future forecast with its 95% interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub lower_95: f64,
    pub upper_95: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub fitted_values: Vec<FittedPoint>,
    pub future_forecast: Vec<ForecastPoint>,
}

/// Standard normal quantile for the interval half-width.
pub(crate) fn interval_z() -> f64 {
    let upper_tail = 1.0 - (1.0 - INTERVAL_COVERAGE) / 2.0;
    Normal::new(0.0, 1.0)
        .map(|n| n.inverse_cdf(upper_tail))
        .unwrap_or(1.959_963_984_540_054)
}

/// Recursive point forecasts of the differenced series.
///
/// `residuals[t]` is zero inside the conditioning window.
pub(crate) fn forecast_differenced(
    w: &[f64],
    residuals: &[f64],
    constant: f64,
    ar: &[f64],
    ma: &[f64],
    horizon: usize,
) -> Vec<f64> {
    let n = w.len();
    let mut extended = w.to_vec();
    extended.reserve(horizon);
    for h in 0..horizon {
        let t = n + h;
        let mut value = constant;
        for (i, phi) in ar.iter().enumerate() {
            value += phi * extended[t - i - 1];
        }
        for (j, theta) in ma.iter().enumerate() {
            let lag = t - j - 1;
            if lag < n {
                value += theta * residuals[lag];
            }
        }
        extended.push(value);
    }
    extended.split_off(n)
}

/// Undo `d` differences, anchoring each level at the last observed value.
pub(crate) fn integrate(y: &[f64], d: usize, forecasts: Vec<f64>) -> Vec<f64> {
    // anchors[k] = last value of the k-th difference of y
    let mut anchors = Vec::with_capacity(d);
    let mut level = y.to_vec();
    for _ in 0..d {
        anchors.push(level.last().copied().unwrap_or(0.0));
        level = level.windows(2).map(|w| w[1] - w[0]).collect();
    }

    let mut out = forecasts;
    for anchor in anchors.into_iter().rev() {
        let mut running = anchor;
        for v in out.iter_mut() {
            running += *v;
            *v = running;
        }
    }
    out
}

/// MA(∞) weights of `θ(B) / (φ(B)(1-B)^d)`, first `count` terms.
pub(crate) fn psi_weights(ar: &[f64], ma: &[f64], d: usize, count: usize) -> Vec<f64> {
    // 1 - Σ φ_i B^i
    let mut poly = vec![1.0];
    poly.extend(ar.iter().map(|phi| -phi));
    for _ in 0..d {
        let mut next = vec![0.0; poly.len() + 1];
        for (i, c) in poly.iter().enumerate() {
            next[i] += c;
            next[i + 1] -= c;
        }
        poly = next;
    }
    let phi_star: Vec<f64> = poly[1..].iter().map(|c| -c).collect();

    let mut psi = Vec::with_capacity(count);
    for j in 0..count {
        if j == 0 {
            psi.push(1.0);
            continue;
        }
        let mut value = ma.get(j - 1).copied().unwrap_or(0.0);
        for i in 1..=j.min(phi_star.len()) {
            value += phi_star[i - 1] * psi[j - i];
        }
        psi.push(value);
    }
    psi
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_interval_z() {
        assert_relative_eq!(interval_z(), 1.959964, epsilon = 1e-5);
    }

    #[test]
    fn test_integrate_random_walk_drift() {
        let y = [10.0, 11.0, 12.0];
        assert_eq!(integrate(&y, 1, vec![1.0, 1.0, 1.0]), vec![13.0, 14.0, 15.0]);
        assert_eq!(integrate(&y, 0, vec![5.0]), vec![5.0]);
    }

    #[test]
    fn test_integrate_twice() {
        // y = t^2: second difference is 2
        let y = [0.0, 1.0, 4.0, 9.0];
        let out = integrate(&y, 2, vec![2.0, 2.0]);
        assert_eq!(out, vec![16.0, 25.0]);
    }

    #[test]
    fn test_psi_weights() {
        // random walk: all ones
        assert_eq!(psi_weights(&[], &[], 1, 4), vec![1.0, 1.0, 1.0, 1.0]);
        // AR(1): powers of phi
        let psi = psi_weights(&[0.5], &[], 0, 4);
        assert_relative_eq!(psi[3], 0.125);
        // MA(1): 1, theta, 0
        assert_eq!(psi_weights(&[], &[0.4], 0, 3), vec![1.0, 0.4, 0.0]);
    }

    #[test]
    fn test_forecast_differenced_ar1() {
        let w = [0.0, 1.0, 2.0];
        let e = [0.0, 0.0, 0.0];
        let f = forecast_differenced(&w, &e, 1.0, &[0.5], &[], 2);
        assert_relative_eq!(f[0], 2.0);
        assert_relative_eq!(f[1], 2.0);
    }
}
