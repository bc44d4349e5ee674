//! Order selection by information criterion.

use pricecast_core::{FitError, Order, ValidationError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::estimation::{estimate, Estimate};
use crate::optimizer::NelderMeadOptions;
use crate::roots::has_near_common_factor;
use crate::unit_root::differencing_order;

/// Largest AR or MA lag accepted anywhere.
pub const MAX_LAG: usize = 12;
/// Largest differencing order accepted anywhere.
pub const MAX_DIFFERENCING: usize = 2;

/// Relative tolerance under which two scores are considered equal.
const TIE_TOLERANCE: f64 = 1e-9;

/// Criterion used to rank candidate orders. Lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InformationCriterion {
    #[default]
    Aic,
    Aicc,
    Bic,
}

impl InformationCriterion {
    /// Score an estimate with `k` free parameters (σ² included).
    pub fn score(&self, log_likelihood: f64, k: usize, n: usize) -> f64 {
        let k_f = k as f64;
        let n_f = n as f64;
        let aic = -2.0 * log_likelihood + 2.0 * k_f;
        match self {
            InformationCriterion::Aic => aic,
            InformationCriterion::Aicc => {
                if n > k + 1 {
                    aic + 2.0 * k_f * (k_f + 1.0) / (n_f - k_f - 1.0)
                } else {
                    f64::INFINITY
                }
            }
            InformationCriterion::Bic => -2.0 * log_likelihood + k_f * n_f.ln(),
        }
    }
}

impl fmt::Display for InformationCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InformationCriterion::Aic => write!(f, "AIC"),
            InformationCriterion::Aicc => write!(f, "AICc"),
            InformationCriterion::Bic => write!(f, "BIC"),
        }
    }
}

impl FromStr for InformationCriterion {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "aic" => Ok(InformationCriterion::Aic),
            "aicc" => Ok(InformationCriterion::Aicc),
            "bic" => Ok(InformationCriterion::Bic),
            other => Err(ValidationError::InvalidSetting {
                field: "criterion".to_string(),
                reason: format!("unknown criterion '{}'", other),
            }),
        }
    }
}

/// Inclusive upper bounds of the automatic order search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchBounds {
    pub max_p: usize,
    pub max_d: usize,
    pub max_q: usize,
}

impl Default for SearchBounds {
    fn default() -> Self {
        Self {
            max_p: 5,
            max_d: 2,
            max_q: 5,
        }
    }
}

impl SearchBounds {
    pub fn new(max_p: usize, max_d: usize, max_q: usize) -> Result<Self, ValidationError> {
        let bounds = Self { max_p, max_d, max_q };
        bounds.validate()?;
        Ok(bounds)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_order(Order::new(self.max_p, self.max_d, self.max_q))
    }

    /// Every `(p, q)` combination at differencing order `d`.
    pub fn candidates_at(&self, d: usize) -> Vec<Order> {
        let mut out = Vec::with_capacity((self.max_p + 1) * (self.max_q + 1));
        for p in 0..=self.max_p {
            for q in 0..=self.max_q {
                out.push(Order::new(p, d, q));
            }
        }
        out
    }

    /// Conditioning window shared by all candidates at `d`.
    pub fn conditioning(&self, d: usize) -> usize {
        d + self.max_p
    }
}

/// How the model order is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum OrderMode {
    Auto(SearchBounds),
    Fixed(Order),
}

impl Default for OrderMode {
    fn default() -> Self {
        OrderMode::Auto(SearchBounds::default())
    }
}

impl OrderMode {
    /// The historical fixed order `(5,1,0)`.
    pub fn legacy_fixed() -> Self {
        OrderMode::Fixed(Order::new(5, 1, 0))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            OrderMode::Auto(bounds) => bounds.validate(),
            OrderMode::Fixed(order) => check_order(*order),
        }
    }
}

impl fmt::Display for OrderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderMode::Auto(b) => write!(f, "auto(p<={}, d<={}, q<={})", b.max_p, b.max_d, b.max_q),
            OrderMode::Fixed(order) => write!(f, "fixed{}", order),
        }
    }
}

fn check_order(order: Order) -> Result<(), ValidationError> {
    let invalid = |reason: String| ValidationError::InvalidOrder {
        p: order.p,
        d: order.d,
        q: order.q,
        reason,
    };
    if order.p > MAX_LAG || order.q > MAX_LAG {
        return Err(invalid(format!("lags are limited to {}", MAX_LAG)));
    }
    if order.d > MAX_DIFFERENCING {
        return Err(invalid(format!(
            "differencing is limited to {}",
            MAX_DIFFERENCING
        )));
    }
    Ok(())
}

/// A fitted candidate with its score.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub estimate: Estimate,
    pub score: f64,
}

impl Candidate {
    fn tie_key(&self) -> (usize, usize, usize) {
        let o = self.estimate.order;
        (o.p + o.q, o.p, o.d)
    }

    /// Ordering used by the search: score, then the simpler order on ties.
    pub fn compare(&self, other: &Candidate) -> Ordering {
        let scale = self.score.abs().max(other.score.abs()).max(f64::MIN_POSITIVE);
        if (self.score - other.score).abs() <= TIE_TOLERANCE * scale {
            self.tie_key().cmp(&other.tie_key())
        } else {
            self.score.total_cmp(&other.score)
        }
    }
}

/// Fit and score one order on the given conditioning window.
pub fn score_order(
    y: &[f64],
    order: Order,
    conditioning: usize,
    criterion: InformationCriterion,
    options: &NelderMeadOptions,
) -> Result<Candidate, FitError> {
    let estimate = estimate(y, order, conditioning, options)?;
    let score = criterion.score(
        estimate.log_likelihood(),
        estimate.param_count(),
        estimate.effective_obs,
    );
    if !score.is_finite() {
        return Err(FitError::NotConverged {
            order,
            iterations: estimate.iterations,
        });
    }
    Ok(Candidate { estimate, score })
}

/// Lowest-ranked candidate under [`Candidate::compare`].
pub fn best_candidate(candidates: impl IntoIterator<Item = Candidate>) -> Option<Candidate> {
    candidates.into_iter().reduce(|best, candidate| {
        if candidate.compare(&best) == Ordering::Less {
            candidate
        } else {
            best
        }
    })
}

/// Outcome of an automatic order search.
#[derive(Debug, Clone)]
pub struct Selection {
    pub candidate: Candidate,
    /// Conditioning window the candidates were scored on
    pub conditioning: usize,
}

/// Automatic order selection.
///
/// The differencing order comes from repeated KPSS tests; `(p, q)` are then
/// searched exhaustively at that order on a common conditioning window.
/// Fits whose AR and MA factors nearly cancel are skipped. When nothing at
/// `d` is stationary the search retries at `d + 1`, up to `max_d`.
pub fn search(
    y: &[f64],
    bounds: &SearchBounds,
    criterion: InformationCriterion,
    options: &NelderMeadOptions,
) -> Result<Selection, FitError> {
    let mut d = differencing_order(y, bounds.max_d)?;
    loop {
        match search_at(y, bounds, d, criterion, options) {
            Err(FitError::NonStationary { .. }) if d < bounds.max_d => {
                debug!(d, "No stationary candidate, differencing again");
                d += 1;
            }
            outcome => return outcome,
        }
    }
}

fn search_at(
    y: &[f64],
    bounds: &SearchBounds,
    d: usize,
    criterion: InformationCriterion,
    options: &NelderMeadOptions,
) -> Result<Selection, FitError> {
    let conditioning = bounds.conditioning(d);
    if y.len() <= conditioning {
        return Err(FitError::InsufficientData {
            required: conditioning + 1,
            available: y.len(),
        });
    }

    let mut scored = Vec::new();
    let mut insufficient: Option<FitError> = None;
    let mut non_stationary = false;
    let mut other_failures = 0usize;

    for order in bounds.candidates_at(d) {
        match score_order(y, order, conditioning, criterion, options) {
            Ok(candidate) if has_near_common_factor(&candidate.estimate.ar, &candidate.estimate.ma) => {
                debug!(order = %order, score = candidate.score, "Skipping candidate with cancelling AR and MA roots");
                other_failures += 1;
            }
            Ok(candidate) => {
                debug!(order = %order, score = candidate.score, %criterion, "Scored candidate");
                scored.push(candidate);
            }
            Err(err) => {
                debug!(order = %order, error = %err, "Skipping candidate");
                match err {
                    FitError::InsufficientData { required, .. } => {
                        let smaller = match &insufficient {
                            Some(FitError::InsufficientData { required: r, .. }) => required < *r,
                            _ => true,
                        };
                        if smaller {
                            insufficient = Some(err);
                        }
                    }
                    FitError::NonStationary { .. } => non_stationary = true,
                    _ => other_failures += 1,
                }
            }
        }
    }

    match best_candidate(scored) {
        Some(candidate) => Ok(Selection {
            candidate,
            conditioning,
        }),
        None if non_stationary => Err(FitError::NonStationary { d }),
        None => match insufficient {
            Some(err) if other_failures == 0 => Err(err),
            _ => Err(FitError::NoCandidate),
        },
    }
}
