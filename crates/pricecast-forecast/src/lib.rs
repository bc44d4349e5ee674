//! ARIMA forecasting with automatic order selection.
//!
//! The estimator works on the conditional sum of squares: Hannan–Rissanen
//! regressions provide start values, a Nelder–Mead simplex refines them, and
//! parameters outside the stationary or invertible region are rejected.
//! Automatic selection fixes the differencing order with a KPSS test before
//! comparing `(p, q)` by information criterion.
//!
//! ```ignore
//! let model = ArimaEstimator::new().fit(&series, &OrderMode::default())?;
//! let result = model.predict(12, PredictMode::Future)?;
//! ```

pub mod arima;
pub mod estimation;
pub mod linalg;
pub mod optimizer;
pub mod predict;
pub mod roots;
pub mod selection;
pub mod unit_root;

pub use arima::{ArimaEstimator, FittedArima, ModelState, ModelSummary};
pub use optimizer::NelderMeadOptions;
pub use predict::{FittedPoint, ForecastPoint, ForecastResult, PredictMode, INTERVAL_COVERAGE};
pub use selection::{InformationCriterion, OrderMode, SearchBounds};
