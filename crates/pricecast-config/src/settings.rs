//! Configuration structures.

use chrono::NaiveDate;
use pricecast_core::{
    DateRange, Frequency, HolidayCalendar, Horizon, Order, TradingCalendar, ValidationError,
    WeekdayCalendar,
};
use pricecast_data::retry::{Backoff, RetryPolicy};
use pricecast_data::yahoo::{DEFAULT_CHART_URL, DEFAULT_SEARCH_URL, DEFAULT_USER_AGENT};
use pricecast_data::YahooConfig;
use pricecast_forecast::{InformationCriterion, NelderMeadOptions, OrderMode, SearchBounds};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: &[&str] = &["pretty", "json"];

fn invalid(field: &str, reason: impl Into<String>) -> ValidationError {
    ValidationError::InvalidSetting {
        field: field.to_string(),
        reason: reason.into(),
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub provider: ProviderSettings,
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default)]
    pub calendar: CalendarSettings,
}

impl AppConfig {
    /// Check every section, reporting the first bad value.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.logging.validate()?;
        self.provider.validate()?;
        self.analysis.validate()?;
        Ok(())
    }

    /// Render the effective configuration.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "pricecast".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    /// Also write logs to this file
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if !LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(invalid(
                "logging.level",
                format!("'{}' is not one of {}", self.level, LOG_LEVELS.join(", ")),
            ));
        }
        if !LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(invalid(
                "logging.format",
                format!("'{}' is not one of {}", self.format, LOG_FORMATS.join(", ")),
            ));
        }
        Ok(())
    }
}

/// Market data endpoints and network behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub chart_url: String,
    pub search_url: String,
    /// Per-attempt timeout
    pub timeout_ms: u64,
    pub user_agent: String,
    pub search_limit: usize,
    pub retry: RetrySettings,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            chart_url: DEFAULT_CHART_URL.to_string(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
            timeout_ms: 10_000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            search_limit: 10,
            retry: RetrySettings::default(),
        }
    }
}

impl ProviderSettings {
    /// Client settings for [`pricecast_data::YahooProvider`].
    pub fn yahoo_config(&self) -> YahooConfig {
        YahooConfig {
            chart_url: self.chart_url.clone(),
            search_url: self.search_url.clone(),
            user_agent: self.user_agent.clone(),
            search_limit: self.search_limit,
            retry: self.retry_policy(),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        let backoff = Backoff::Exponential {
            base: Duration::from_millis(self.retry.base_delay_ms),
            factor: self.retry.factor,
            max: Duration::from_millis(self.retry.max_delay_ms),
            jitter: self.retry.jitter,
        };
        RetryPolicy::new(
            self.retry.max_retries,
            backoff,
            Duration::from_millis(self.timeout_ms),
        )
    }

    fn validate(&self) -> Result<(), ValidationError> {
        for (field, url) in [
            ("provider.chart_url", &self.chart_url),
            ("provider.search_url", &self.search_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(invalid(field, format!("'{}' is not an http(s) URL", url)));
            }
        }
        if self.timeout_ms == 0 {
            return Err(invalid("provider.timeout_ms", "must be positive"));
        }
        if self.search_limit == 0 {
            return Err(invalid("provider.search_limit", "must be positive"));
        }
        if self.user_agent.trim().is_empty() {
            return Err(invalid("provider.user_agent", "must not be empty"));
        }
        self.retry.validate()
    }
}

/// Retry and backoff knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub factor: f64,
    pub jitter: bool,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 250,
            max_delay_ms: 4_000,
            factor: 2.0,
            jitter: true,
        }
    }
}

impl RetrySettings {
    fn validate(&self) -> Result<(), ValidationError> {
        if !self.factor.is_finite() || self.factor < 1.0 {
            return Err(invalid("provider.retry.factor", "must be at least 1.0"));
        }
        if self.base_delay_ms > self.max_delay_ms {
            return Err(invalid(
                "provider.retry.base_delay_ms",
                "must not exceed max_delay_ms",
            ));
        }
        Ok(())
    }
}

/// Defaults for an analysis run; the CLI may override each one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub interval: Frequency,
    pub output: Frequency,
    /// Periods, or see [`Horizon`] for accepted values
    pub horizon: usize,
    pub order: OrderSettings,
    /// Preset name or `YYYY-MM-DD..YYYY-MM-DD`
    pub range: String,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            interval: Frequency::Daily,
            output: Frequency::Monthly,
            horizon: 12,
            order: OrderSettings::default(),
            range: "max".to_string(),
        }
    }
}

impl AnalysisSettings {
    pub fn horizon(&self) -> Result<Horizon, ValidationError> {
        Horizon::new(self.horizon)
    }

    pub fn range(&self) -> Result<DateRange, ValidationError> {
        self.range.parse()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.interval.is_coarser_than(self.output) {
            return Err(ValidationError::UnsupportedResample {
                from: self.interval,
                to: self.output,
            });
        }
        self.horizon()?;
        self.range()?;
        self.order.order_mode()?;
        Ok(())
    }
}

/// Which [`OrderMode`] the settings describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    #[default]
    Auto,
    Fixed,
}

/// ARIMA order selection. `p`, `d`, `q` apply to fixed mode, the `max_*`
/// bounds to auto mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderSettings {
    #[serde(rename = "mode")]
    pub kind: OrderKind,
    pub p: usize,
    pub d: usize,
    pub q: usize,
    pub max_p: usize,
    pub max_d: usize,
    pub max_q: usize,
    pub criterion: InformationCriterion,
    /// Nelder–Mead iteration cap per candidate
    pub max_iterations: usize,
}

impl Default for OrderSettings {
    fn default() -> Self {
        let bounds = SearchBounds::default();
        Self {
            kind: OrderKind::Auto,
            p: 5,
            d: 1,
            q: 0,
            max_p: bounds.max_p,
            max_d: bounds.max_d,
            max_q: bounds.max_q,
            criterion: InformationCriterion::default(),
            max_iterations: NelderMeadOptions::default().max_iterations,
        }
    }
}

impl OrderSettings {
    pub fn optimizer(&self) -> NelderMeadOptions {
        NelderMeadOptions {
            max_iterations: self.max_iterations,
            ..NelderMeadOptions::default()
        }
    }

    pub fn order_mode(&self) -> Result<OrderMode, ValidationError> {
        let mode = match self.kind {
            OrderKind::Auto => {
                OrderMode::Auto(SearchBounds::new(self.max_p, self.max_d, self.max_q)?)
            }
            OrderKind::Fixed => OrderMode::Fixed(Order::new(self.p, self.d, self.q)),
        };
        mode.validate()?;
        if self.max_iterations == 0 {
            return Err(invalid("analysis.order.max_iterations", "must be greater than 0"));
        }
        Ok(mode)
    }
}

/// Trading calendar for daily forecasts.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CalendarSettings {
    /// Extra non-trading days on top of weekends
    pub holidays: Vec<NaiveDate>,
}

impl CalendarSettings {
    pub fn calendar(&self) -> Arc<dyn TradingCalendar> {
        if self.holidays.is_empty() {
            Arc::new(WeekdayCalendar)
        } else {
            Arc::new(HolidayCalendar::new(self.holidays.iter().copied()))
        }
    }
}
