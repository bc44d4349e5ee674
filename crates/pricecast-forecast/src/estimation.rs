//! Conditional-sum-of-squares estimation for a single ARIMA order.

use pricecast_core::{FitError, Order};
use tracing::trace;

use crate::linalg::least_squares;
use crate::optimizer::{nelder_mead, NelderMeadOptions};

/// Largest partial autocorrelation still treated as stationary.
const UNIT_ROOT_MARGIN: f64 = 1e-3;

/// Lower bound on the innovation variance.
const SIGMA2_FLOOR: f64 = 1e-12;

/// Apply `d` first differences.
pub fn difference(values: &[f64], d: usize) -> Vec<f64> {
    let mut out = values.to_vec();
    for _ in 0..d {
        out = out.windows(2).map(|w| w[1] - w[0]).collect();
    }
    out
}

/// Largest absolute partial autocorrelation implied by AR coefficients.
///
/// Runs the Levinson step-down recursion on `x_t = Σ a_j x_{t-j}`. Returns
/// `None` as soon as a partial autocorrelation reaches one in magnitude,
/// i.e. the polynomial has a root on or inside the unit circle.
pub fn max_partial_autocorrelation(coeffs: &[f64]) -> Option<f64> {
    if coeffs.iter().any(|c| !c.is_finite()) {
        return None;
    }
    let mut a = coeffs.to_vec();
    let mut largest = 0.0_f64;
    for k in (1..=a.len()).rev() {
        let r = a[k - 1];
        if r.abs() >= 1.0 {
            return None;
        }
        largest = largest.max(r.abs());
        let denom = 1.0 - r * r;
        let prev: Vec<f64> = (1..k).map(|j| (a[j - 1] + r * a[k - j - 1]) / denom).collect();
        a = prev;
    }
    Some(largest)
}

/// Whether `1 + Σ θ_j B^j` has all roots outside the unit circle.
pub fn is_invertible(ma: &[f64]) -> bool {
    let negated: Vec<f64> = ma.iter().map(|t| -t).collect();
    max_partial_autocorrelation(&negated).is_some()
}

/// Parameter vector layout: `[c?, φ_1..φ_p, θ_1..θ_q]`.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub order: Order,
    pub constant: bool,
}

impl Layout {
    pub fn new(order: Order) -> Self {
        Self {
            order,
            constant: order.d < 2,
        }
    }

    pub fn len(&self) -> usize {
        usize::from(self.constant) + self.order.p + self.order.q
    }

    /// Parameter count used by the information criteria (includes σ²).
    pub fn criterion_params(&self) -> usize {
        self.len() + 1
    }

    pub fn split<'a>(&self, params: &'a [f64]) -> (f64, &'a [f64], &'a [f64]) {
        let offset = usize::from(self.constant);
        let constant = if self.constant { params[0] } else { 0.0 };
        let ar = &params[offset..offset + self.order.p];
        let ma = &params[offset + self.order.p..];
        (constant, ar, ma)
    }

    fn join(&self, constant: f64, ar: &[f64], ma: &[f64]) -> Vec<f64> {
        let mut params = Vec::with_capacity(self.len());
        if self.constant {
            params.push(constant);
        }
        params.extend_from_slice(ar);
        params.extend_from_slice(ma);
        params
    }
}

/// One-step residuals of `w` for the given parameters.
///
/// Residuals before `start` are fixed at zero and excluded from the fit.
pub fn css_residuals(w: &[f64], start: usize, constant: f64, ar: &[f64], ma: &[f64]) -> Vec<f64> {
    let mut e = vec![0.0; w.len()];
    for t in start..w.len() {
        let mut predicted = constant;
        for (i, phi) in ar.iter().enumerate() {
            predicted += phi * w[t - i - 1];
        }
        for (j, theta) in ma.iter().enumerate() {
            if t >= j + 1 + start {
                predicted += theta * e[t - j - 1];
            }
        }
        e[t] = w[t] - predicted;
    }
    e
}

fn sum_of_squares(e: &[f64], start: usize) -> f64 {
    e[start..].iter().map(|v| v * v).sum()
}

/// Result of estimating one order.
#[derive(Debug, Clone)]
pub struct Estimate {
    pub order: Order,
    pub constant: Option<f64>,
    pub ar: Vec<f64>,
    pub ma: Vec<f64>,
    pub sigma2: f64,
    /// Residuals aligned with the differenced series
    pub residuals: Vec<f64>,
    /// Index into the differenced series of the first scored residual
    pub start: usize,
    pub effective_obs: usize,
    pub iterations: usize,
}

impl Estimate {
    pub fn log_likelihood(&self) -> f64 {
        let n = self.effective_obs as f64;
        -0.5 * n * ((2.0 * std::f64::consts::PI * self.sigma2).ln() + 1.0)
    }

    pub fn param_count(&self) -> usize {
        Layout::new(self.order).criterion_params()
    }
}

/// Estimate `order` on `y`, scoring residuals from position `conditioning`
/// of the undifferenced series onwards.
pub fn estimate(
    y: &[f64],
    order: Order,
    conditioning: usize,
    options: &NelderMeadOptions,
) -> Result<Estimate, FitError> {
    let required = order.min_observations();
    if y.len() < required {
        return Err(FitError::InsufficientData {
            required,
            available: y.len(),
        });
    }
    let conditioning = conditioning.max(order.d + order.p);
    if y.len() <= conditioning {
        return Err(FitError::InsufficientData {
            required: conditioning + 1,
            available: y.len(),
        });
    }

    let w = difference(y, order.d);
    let start = conditioning - order.d;
    let layout = Layout::new(order);

    let initial = hannan_rissanen(&w, start, layout);
    let initial = shrink_into_region(initial, layout);
    let steps = initial_steps(&initial, &w, layout);

    let objective = |params: &[f64]| {
        let (c, ar, ma) = layout.split(params);
        if max_partial_autocorrelation(ar).is_none() || !is_invertible(ma) {
            return f64::INFINITY;
        }
        let value = sum_of_squares(&css_residuals(&w, start, c, ar, ma), start);
        if value.is_finite() {
            value
        } else {
            f64::INFINITY
        }
    };

    let minimum = nelder_mead(objective, &initial, &steps, options);
    trace!(
        order = %order,
        iterations = minimum.iterations,
        css = minimum.value,
        "Nelder-Mead finished"
    );

    if !minimum.converged || minimum.x.iter().any(|v| !v.is_finite()) {
        return Err(FitError::NotConverged {
            order,
            iterations: minimum.iterations,
        });
    }

    let (c, ar, ma) = layout.split(&minimum.x);
    match max_partial_autocorrelation(ar) {
        Some(r) if r < 1.0 - UNIT_ROOT_MARGIN => {}
        _ => return Err(FitError::NonStationary { d: order.d }),
    }

    let residuals = css_residuals(&w, start, c, ar, ma);
    let effective_obs = w.len() - start;
    let sigma2 = (sum_of_squares(&residuals, start) / effective_obs as f64).max(SIGMA2_FLOOR);

    Ok(Estimate {
        order,
        constant: layout.constant.then_some(c),
        ar: ar.to_vec(),
        ma: ma.to_vec(),
        sigma2,
        residuals,
        start,
        effective_obs,
        iterations: minimum.iterations,
    })
}

/// Start values: long autoregression for innovations, then a regression of
/// `w_t` on its lags and lagged innovations.
fn hannan_rissanen(w: &[f64], start: usize, layout: Layout) -> Vec<f64> {
    let Order { p, q, .. } = layout.order;
    let mean = w[start..].iter().sum::<f64>() / (w.len() - start) as f64;
    let fallback = layout.join(mean, &vec![0.0; p], &vec![0.0; q]);

    if p == 0 && q == 0 {
        return fallback;
    }

    let innovations = if q > 0 {
        let long = ((w.len() as f64).ln().ceil() as usize).max(p + q).max(1);
        match long_ar_residuals(w, long) {
            Some(e) => Some((e, long)),
            None => return fallback,
        }
    } else {
        None
    };

    let first = match &innovations {
        Some((_, long)) => start.max(long + q),
        None => start,
    };
    if first >= w.len() {
        return fallback;
    }

    let mut rows = Vec::with_capacity(w.len() - first);
    let mut targets = Vec::with_capacity(w.len() - first);
    for t in first..w.len() {
        let mut row = Vec::with_capacity(layout.len());
        if layout.constant {
            row.push(1.0);
        }
        row.extend((1..=p).map(|i| w[t - i]));
        if let Some((e, _)) = &innovations {
            row.extend((1..=q).map(|j| e[t - j]));
        }
        rows.push(row);
        targets.push(w[t]);
    }

    least_squares(&rows, &targets).unwrap_or(fallback)
}

fn long_ar_residuals(w: &[f64], lags: usize) -> Option<Vec<f64>> {
    if w.len() <= 2 * lags + 1 {
        return None;
    }
    let rows: Vec<Vec<f64>> = (lags..w.len())
        .map(|t| {
            let mut row = vec![1.0];
            row.extend((1..=lags).map(|i| w[t - i]));
            row
        })
        .collect();
    let beta = least_squares(&rows, &w[lags..])?;

    let mut e = vec![0.0; w.len()];
    for (offset, row) in rows.iter().enumerate() {
        let fitted: f64 = row.iter().zip(&beta).map(|(x, b)| x * b).sum();
        e[lags + offset] = w[lags + offset] - fitted;
    }
    Some(e)
}

/// Pull AR and MA coefficients towards zero until they are admissible.
fn shrink_into_region(mut params: Vec<f64>, layout: Layout) -> Vec<f64> {
    let offset = usize::from(layout.constant);
    for _ in 0..200 {
        let (_, ar, ma) = layout.split(&params);
        let negated: Vec<f64> = ma.iter().map(|t| -t).collect();
        let ar_ok = max_partial_autocorrelation(ar).is_some_and(|r| r < 0.99);
        let ma_ok = max_partial_autocorrelation(&negated).is_some_and(|r| r < 0.99);
        if ar_ok && ma_ok {
            return params;
        }
        for v in params[offset..].iter_mut() {
            *v *= 0.9;
        }
    }
    for v in params[offset..].iter_mut() {
        *v = 0.0;
    }
    params
}

fn initial_steps(initial: &[f64], w: &[f64], layout: Layout) -> Vec<f64> {
    let n = w.len() as f64;
    let mean = w.iter().sum::<f64>() / n;
    let sd = (w.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();

    initial
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            if layout.constant && i == 0 {
                (0.1 * v.abs()).max(0.1 * sd).max(1e-4)
            } else {
                0.1
            }
        })
        .collect()
}
