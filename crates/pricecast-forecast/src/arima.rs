//! ARIMA estimator and fitted model.

use chrono::NaiveDate;
use pricecast_core::{
    month_end_after, FitError, Frequency, Horizon, Order, PriceSeries, TradingCalendar,
    ValidationError, WeekdayCalendar,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::estimation::difference;
use crate::optimizer::NelderMeadOptions;
use crate::predict::{
    forecast_differenced, integrate, interval_z, psi_weights, FittedPoint, ForecastPoint,
    ForecastResult, PredictMode,
};
use crate::selection::{score_order, search, Candidate, InformationCriterion, OrderMode};

/// Lifecycle of a forecasting model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelState {
    Unfit,
    Fitting,
    Fit,
    Failed,
}

impl fmt::Display for ModelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ModelState::Unfit => "unfit",
            ModelState::Fitting => "fitting",
            ModelState::Fit => "fit",
            ModelState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Fits ARIMA models to price series.
#[derive(Debug, Clone)]
pub struct ArimaEstimator {
    criterion: InformationCriterion,
    optimizer: NelderMeadOptions,
    calendar: Arc<dyn TradingCalendar>,
}

impl Default for ArimaEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl ArimaEstimator {
    pub fn new() -> Self {
        Self {
            criterion: InformationCriterion::default(),
            optimizer: NelderMeadOptions::default(),
            calendar: Arc::new(WeekdayCalendar),
        }
    }

    pub fn with_criterion(mut self, criterion: InformationCriterion) -> Self {
        self.criterion = criterion;
        self
    }

    pub fn with_optimizer(mut self, optimizer: NelderMeadOptions) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Calendar used to date daily forecasts.
    pub fn with_calendar(mut self, calendar: Arc<dyn TradingCalendar>) -> Self {
        self.calendar = calendar;
        self
    }

    pub fn criterion(&self) -> InformationCriterion {
        self.criterion
    }

    /// Fit `series` under `mode`.
    pub fn fit(&self, series: &PriceSeries, mode: &OrderMode) -> Result<FittedArima, FitError> {
        debug!(symbol = %series.symbol, state = %ModelState::Unfit, %mode, "Preparing model");
        mode.validate()?;

        let y = series.closes();
        debug!(symbol = %series.symbol, state = %ModelState::Fitting, observations = y.len(), "Fitting");

        let outcome = match mode {
            OrderMode::Auto(bounds) => search(&y, bounds, self.criterion, &self.optimizer)
                .map(|selection| (selection.candidate, selection.conditioning)),
            OrderMode::Fixed(order) => {
                let conditioning = order.d + order.p;
                score_order(&y, *order, conditioning, self.criterion, &self.optimizer)
                    .map(|candidate| (candidate, conditioning))
            }
        };

        let (candidate, conditioning) = match outcome {
            Ok(found) => found,
            Err(err) => {
                warn!(symbol = %series.symbol, state = %ModelState::Failed, error = %err, "Model fit failed");
                return Err(err);
            }
        };

        let model = FittedArima::from_candidate(
            candidate,
            conditioning,
            self.criterion,
            series,
            Arc::clone(&self.calendar),
        );
        info!(
            symbol = %series.symbol,
            state = %ModelState::Fit,
            order = %model.order(),
            criterion = %self.criterion,
            score = model.summary.score,
            "Selected model"
        );
        Ok(model)
    }
}

/// Serializable description of a fitted model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub order: Order,
    pub constant: Option<f64>,
    pub ar: Vec<f64>,
    pub ma: Vec<f64>,
    pub sigma2: f64,
    pub log_likelihood: f64,
    pub aic: f64,
    pub aicc: f64,
    pub bic: f64,
    pub criterion: InformationCriterion,
    /// Value of the selection criterion
    pub score: f64,
    pub observations: usize,
    /// Leading training positions without a fitted value
    pub conditioning: usize,
}

/// An estimated ARIMA model bound to its training series.
#[derive(Debug, Clone)]
pub struct FittedArima {
    summary: ModelSummary,
    frequency: Frequency,
    dates: Vec<NaiveDate>,
    y: Vec<f64>,
    w: Vec<f64>,
    residuals: Vec<f64>,
    calendar: Arc<dyn TradingCalendar>,
}

impl FittedArima {
    fn from_candidate(
        candidate: Candidate,
        conditioning: usize,
        criterion: InformationCriterion,
        series: &PriceSeries,
        calendar: Arc<dyn TradingCalendar>,
    ) -> Self {
        let est = candidate.estimate;
        let ll = est.log_likelihood();
        let k = est.param_count();
        let n = est.effective_obs;
        let y = series.closes();
        let w = difference(&y, est.order.d);

        let summary = ModelSummary {
            order: est.order,
            constant: est.constant,
            ar: est.ar,
            ma: est.ma,
            sigma2: est.sigma2,
            log_likelihood: ll,
            aic: InformationCriterion::Aic.score(ll, k, n),
            aicc: InformationCriterion::Aicc.score(ll, k, n),
            bic: InformationCriterion::Bic.score(ll, k, n),
            criterion,
            score: candidate.score,
            observations: y.len(),
            conditioning: conditioning.max(est.order.d + est.order.p),
        };

        Self {
            summary,
            frequency: series.frequency,
            dates: series.dates(),
            y,
            w,
            residuals: est.residuals,
            calendar,
        }
    }

    pub fn order(&self) -> Order {
        self.summary.order
    }

    pub fn summary(&self) -> &ModelSummary {
        &self.summary
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Produce one half of the forecast.
    ///
    /// `horizon` must be at least 1 in both modes.
    pub fn predict(&self, horizon: usize, mode: PredictMode) -> Result<ForecastResult, ValidationError> {
        if horizon < Horizon::MIN {
            return Err(ValidationError::HorizonOutOfRange {
                value: horizon as i64,
                min: Horizon::MIN,
                max: Horizon::MAX,
            });
        }
        Ok(match mode {
            PredictMode::InSample => ForecastResult {
                fitted_values: self.fitted_values(),
                future_forecast: Vec::new(),
            },
            PredictMode::Future => ForecastResult {
                fitted_values: Vec::new(),
                future_forecast: self.future(horizon),
            },
        })
    }

    /// Both halves at once.
    pub fn forecast(&self, horizon: Horizon) -> ForecastResult {
        ForecastResult {
            fitted_values: self.fitted_values(),
            future_forecast: self.future(horizon.periods()),
        }
    }

    fn fitted_values(&self) -> Vec<FittedPoint> {
        let d = self.summary.order.d;
        let conditioning = self.summary.conditioning;
        self.dates
            .iter()
            .zip(&self.y)
            .enumerate()
            .map(|(t, (&date, &y))| {
                let value = (t >= conditioning).then(|| y - self.residuals[t - d]);
                FittedPoint { date, value }
            })
            .collect()
    }

    fn future(&self, horizon: usize) -> Vec<ForecastPoint> {
        let s = &self.summary;
        let differenced = forecast_differenced(
            &self.w,
            &self.residuals,
            s.constant.unwrap_or(0.0),
            &s.ar,
            &s.ma,
            horizon,
        );
        let values = integrate(&self.y, s.order.d, differenced);

        let psi = psi_weights(&s.ar, &s.ma, s.order.d, horizon);
        let z = interval_z();
        let mut cumulative = 0.0;
        let half_widths: Vec<f64> = psi
            .iter()
            .map(|p| {
                cumulative += p * p;
                z * (s.sigma2 * cumulative).sqrt()
            })
            .collect();

        self.future_dates(horizon)
            .into_iter()
            .zip(values)
            .zip(half_widths)
            .map(|((date, value), half)| ForecastPoint {
                date,
                value,
                lower_95: value - half,
                upper_95: value + half,
            })
            .collect()
    }

    fn future_dates(&self, horizon: usize) -> Vec<NaiveDate> {
        let Some(&last) = self.dates.last() else {
            return Vec::new();
        };
        match self.frequency {
            Frequency::Monthly => (1..=horizon as u32)
                .map(|k| month_end_after(last, k))
                .collect(),
            Frequency::Daily => self.calendar.sessions_after(last, horizon),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::SearchBounds;
    use chrono::Datelike;
    use pricecast_core::{HolidayCalendar, PricePoint};

    fn noise(n: usize, seed: u64) -> Vec<f64> {
        let mut state = seed;
        (0..n)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                ((state >> 11) as f64 / (1u64 << 53) as f64) - 0.5
            })
            .collect()
    }

    fn monthly(closes: Vec<f64>) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2010, 1, 31).unwrap();
        let points = closes
            .into_iter()
            .enumerate()
            .map(|(i, c)| PricePoint::new(month_end_after(start, i as u32), c))
            .collect();
        PriceSeries::new("TEST", Frequency::Monthly, points).unwrap()
    }

    fn daily(closes: Vec<f64>) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let dates = WeekdayCalendar.sessions_after(start, closes.len());
        let points = dates
            .into_iter()
            .zip(closes)
            .map(|(d, c)| PricePoint::new(d, c))
            .collect();
        PriceSeries::new("TEST", Frequency::Daily, points).unwrap()
    }

    fn random_walk(n: usize) -> Vec<f64> {
        let eps = noise(n, 42);
        let mut level = 100.0;
        eps.iter()
            .map(|e| {
                level += 0.3 + 2.0 * e;
                level
            })
            .collect()
    }

    #[test]
    fn test_fixed_fit_and_in_sample_length() {
        let series = monthly(random_walk(120));
        let model = ArimaEstimator::new()
            .fit(&series, &OrderMode::legacy_fixed())
            .unwrap();

        assert_eq!(model.order(), Order::new(5, 1, 0));
        let result = model.predict(12, PredictMode::InSample).unwrap();
        assert_eq!(result.fitted_values.len(), series.len());
        assert!(result.future_forecast.is_empty());
        assert!(result.fitted_values[..6].iter().all(|p| p.value.is_none()));
        assert!(result.fitted_values[6..].iter().all(|p| p.value.is_some()));
        for (fitted, point) in result.fitted_values.iter().zip(series.iter()) {
            assert_eq!(fitted.date, point.date);
        }
    }

    #[test]
    fn test_future_monthly_dates() {
        let series = monthly(random_walk(60));
        let model = ArimaEstimator::new()
            .fit(&series, &OrderMode::Fixed(Order::new(1, 1, 0)))
            .unwrap();
        let result = model.predict(6, PredictMode::Future).unwrap();

        assert_eq!(result.future_forecast.len(), 6);
        let last = series.last().unwrap().date;
        let mut previous = last;
        for (k, point) in result.future_forecast.iter().enumerate() {
            assert_eq!(point.date, month_end_after(last, k as u32 + 1));
            assert!(point.date > previous);
            assert_eq!(point.date, pricecast_core::month_end(point.date));
            assert!(point.lower_95 <= point.value && point.value <= point.upper_95);
            previous = point.date;
        }
        // intervals widen with the horizon
        let widths: Vec<f64> = result
            .future_forecast
            .iter()
            .map(|p| p.upper_95 - p.lower_95)
            .collect();
        assert!(widths.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_future_daily_dates_skip_weekends_and_holidays() {
        let series = daily(random_walk(80));
        let last = series.last().unwrap().date;
        let holiday = WeekdayCalendar.next_session(last);
        let model = ArimaEstimator::new()
            .with_calendar(Arc::new(HolidayCalendar::new([holiday])))
            .fit(&series, &OrderMode::Fixed(Order::new(0, 1, 1)))
            .unwrap();
        let result = model.predict(10, PredictMode::Future).unwrap();

        assert_eq!(result.future_forecast.len(), 10);
        assert!(result.future_forecast.iter().all(|p| p.date.weekday().number_from_monday() <= 5));
        assert!(result.future_forecast.iter().all(|p| p.date != holiday));
        assert!(result.future_forecast[0].date > last);
        assert!(result
            .future_forecast
            .windows(2)
            .all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_predict_is_idempotent() {
        let series = monthly(random_walk(90));
        let model = ArimaEstimator::new()
            .fit(&series, &OrderMode::Fixed(Order::new(2, 1, 1)))
            .unwrap();

        let first = model.predict(24, PredictMode::Future).unwrap();
        let second = model.predict(24, PredictMode::Future).unwrap();
        assert_eq!(first, second);
        assert_eq!(model.forecast(Horizon::new(24).unwrap()), model.forecast(Horizon::new(24).unwrap()));
    }

    #[test]
    fn test_predict_rejects_zero_horizon() {
        let series = monthly(random_walk(40));
        let model = ArimaEstimator::new()
            .fit(&series, &OrderMode::Fixed(Order::new(1, 1, 0)))
            .unwrap();
        assert!(matches!(
            model.predict(0, PredictMode::Future),
            Err(ValidationError::HorizonOutOfRange { value: 0, .. })
        ));
        assert!(model.predict(0, PredictMode::InSample).is_err());
    }

    #[test]
    fn test_fixed_insufficient_data() {
        let series = monthly(vec![100.0, 101.0, 102.0, 103.0]);
        let err = ArimaEstimator::new()
            .fit(&series, &OrderMode::legacy_fixed())
            .unwrap_err();
        assert_eq!(
            err,
            FitError::InsufficientData {
                required: 7,
                available: 4
            }
        );
    }

    #[test]
    fn test_invalid_fixed_order() {
        let series = monthly(random_walk(40));
        let err = ArimaEstimator::new()
            .fit(&series, &OrderMode::Fixed(Order::new(1, 5, 0)))
            .unwrap_err();
        assert!(matches!(err, FitError::InvalidOrder(_)));
    }

    #[test]
    fn test_auto_selects_within_bounds() {
        let series = monthly(random_walk(96));
        let bounds = SearchBounds::new(2, 1, 2).unwrap();
        let model = ArimaEstimator::new()
            .fit(&series, &OrderMode::Auto(bounds))
            .unwrap();

        let order = model.order();
        assert!(order.p <= 2 && order.d <= 1 && order.q <= 2);
        assert_eq!(model.summary().conditioning, order.d + 2);
        assert!(model.summary().score.is_finite());
        let result = model.forecast(Horizon::default());
        assert_eq!(result.fitted_values.len(), 96);
        assert_eq!(result.future_forecast.len(), 12);
    }

    fn gaussian(n: usize, seed: u64) -> Vec<f64> {
        let mut state = seed;
        let mut uniform = || {
            state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
            let mut z = state;
            z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
            z ^= z >> 31;
            ((z >> 11) as f64 + 0.5) / (1u64 << 53) as f64
        };
        (0..n)
            .map(|_| {
                let (u1, u2) = (uniform(), uniform());
                (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
            })
            .collect()
    }

    #[test]
    fn test_auto_recovers_first_difference_on_random_walks() {
        let estimator = ArimaEstimator::new();
        for seed in 3..=12 {
            let mut level = 100.0;
            let walk: Vec<f64> = gaussian(120, seed)
                .into_iter()
                .map(|e| {
                    level += 0.2 + e;
                    level
                })
                .collect();
            let model = estimator
                .fit(&monthly(walk), &OrderMode::default())
                .unwrap();
            assert_eq!(model.order().d, 1, "seed {}", seed);
            assert_eq!(model.summary().conditioning, 1 + 5);
        }
    }

    #[test]
    fn test_auto_non_stationary_at_max_d() {
        let series = monthly(random_walk(120));
        let bounds = SearchBounds::new(2, 0, 2).unwrap();
        let err = ArimaEstimator::new()
            .fit(&series, &OrderMode::Auto(bounds))
            .unwrap_err();
        assert_eq!(err, FitError::NonStationary { d: 0 });
    }

    #[test]
    fn test_auto_failures_surface_as_errors() {
        let short = monthly(vec![100.0, 101.0, 102.0]);
        let err = ArimaEstimator::new()
            .fit(&short, &OrderMode::default())
            .unwrap_err();
        assert_eq!(
            err,
            FitError::InsufficientData {
                required: 6,
                available: 3
            }
        );

        let oscillating: Vec<f64> = (0..60).map(|t| 10.0 + (1.3 * t as f64).sin()).collect();
        let stalled = ArimaEstimator::new().with_optimizer(NelderMeadOptions {
            max_iterations: 0,
            ..NelderMeadOptions::default()
        });
        let err = stalled
            .fit(&monthly(oscillating), &OrderMode::Auto(SearchBounds::new(1, 1, 1).unwrap()))
            .unwrap_err();
        assert_eq!(err, FitError::NoCandidate);
    }

    #[test]
    fn test_criterion_carried_into_summary() {
        let estimator = ArimaEstimator::new().with_criterion(InformationCriterion::Bic);
        assert_eq!(estimator.criterion(), InformationCriterion::Bic);
        let model = estimator
            .fit(&monthly(random_walk(60)), &OrderMode::Fixed(Order::new(1, 1, 0)))
            .unwrap();
        let summary = model.summary();
        assert_eq!(summary.criterion, InformationCriterion::Bic);
        assert_eq!(summary.score, summary.bic);
        assert_eq!(summary.observations, 60);
    }

    #[test]
    fn test_model_state_display() {
        assert_eq!(ModelState::Fitting.to_string(), "fitting");
        assert_eq!(ModelState::Failed.to_string(), "failed");
    }
}
