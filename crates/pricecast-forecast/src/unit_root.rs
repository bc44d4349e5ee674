//! KPSS stationarity test and the differencing order it implies.

use pricecast_core::FitError;
use tracing::debug;

use crate::estimation::difference;

/// 5% critical value of the KPSS level-stationarity statistic.
pub const KPSS_CRITICAL_5PCT: f64 = 0.463;

/// Shorter inputs are never rejected.
const MIN_KPSS_OBS: usize = 3;

/// Relative spread under which a series counts as constant.
const CONSTANT_TOLERANCE: f64 = 1e-9;

pub fn is_constant(y: &[f64]) -> bool {
    if y.is_empty() {
        return true;
    }
    let (lo, hi) = y
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    hi - lo <= CONSTANT_TOLERANCE * hi.abs().max(lo.abs()).max(1.0)
}

/// KPSS statistic against level stationarity.
///
/// The long-run variance uses Bartlett weights with `⌊3√n / 13⌋` lags.
/// Returns `None` for constant or very short input.
pub fn kpss_statistic(y: &[f64]) -> Option<f64> {
    let n = y.len();
    if n < MIN_KPSS_OBS || is_constant(y) {
        return None;
    }
    let n_f = n as f64;
    let mean = y.iter().sum::<f64>() / n_f;
    let e: Vec<f64> = y.iter().map(|v| v - mean).collect();
    let autocovariance =
        |lag: usize| e[lag..].iter().zip(&e).map(|(a, b)| a * b).sum::<f64>() / n_f;

    let lags = ((3.0 * n_f.sqrt() / 13.0) as usize).min(n - 1);
    let mut long_run = autocovariance(0);
    for lag in 1..=lags {
        let weight = 1.0 - lag as f64 / (lags as f64 + 1.0);
        long_run += 2.0 * weight * autocovariance(lag);
    }
    if long_run <= 0.0 {
        return None;
    }

    let mut partial = 0.0;
    let eta = e
        .iter()
        .map(|v| {
            partial += v;
            partial * partial
        })
        .sum::<f64>()
        / (n_f * n_f);
    Some(eta / long_run)
}

/// Whether the KPSS test fails to reject level stationarity at 5%.
pub fn is_level_stationary(y: &[f64]) -> bool {
    kpss_statistic(y).map_or(true, |stat| stat <= KPSS_CRITICAL_5PCT)
}

/// Smallest `d <= max_d` after which `y` passes the KPSS test.
pub fn differencing_order(y: &[f64], max_d: usize) -> Result<usize, FitError> {
    let mut w = y.to_vec();
    for d in 0..=max_d {
        if is_level_stationary(&w) {
            debug!(d, statistic = ?kpss_statistic(&w), "Differencing order chosen");
            return Ok(d);
        }
        if d < max_d {
            w = difference(&w, 1);
        }
    }
    Err(FitError::NonStationary { d: max_d })
}
