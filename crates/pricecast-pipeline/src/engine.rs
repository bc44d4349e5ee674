//! Analysis pipeline: resolve, acquire, then indicators and forecast side by side.

use chrono::Utc;
use pricecast_core::{
    FitError, MarketDataProvider, PricecastError, PricecastResult, PriceSeries, SymbolSearch,
};
use pricecast_data::{fetch_fundamentals, SeriesAcquirer, SymbolResolver};
use pricecast_forecast::{ArimaEstimator, ForecastResult, ModelSummary};
use pricecast_indicators::IndicatorEngine;
use std::sync::Arc;
use tokio::task::JoinError;
use tracing::{info, info_span, Instrument, Span};
use uuid::Uuid;

use crate::charts::ChartSet;
use crate::report::AnalysisReport;
use crate::request::AnalysisRequest;

fn join_error(err: JoinError) -> PricecastError {
    PricecastError::Internal(format!("analysis task failed: {}", err))
}

/// Runs one [`AnalysisRequest`] end to end.
pub struct AnalysisPipeline {
    provider: Arc<dyn MarketDataProvider>,
    resolver: SymbolResolver,
    acquirer: SeriesAcquirer,
    indicators: IndicatorEngine,
    estimator: ArimaEstimator,
}

impl AnalysisPipeline {
    /// Create a pipeline over the given collaborators.
    pub fn new(provider: Arc<dyn MarketDataProvider>, search: Arc<dyn SymbolSearch>) -> Self {
        Self {
            resolver: SymbolResolver::new(Arc::clone(&provider), search),
            acquirer: SeriesAcquirer::new(Arc::clone(&provider)),
            provider,
            indicators: IndicatorEngine::new(),
            estimator: ArimaEstimator::new(),
        }
    }

    /// Use a custom estimator (criterion, optimizer, calendar).
    pub fn with_estimator(mut self, estimator: ArimaEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    /// Run the analysis.
    ///
    /// Indicators and the model fit only read the series, so they run as two
    /// blocking tasks over a shared copy while fundamentals are fetched.
    pub async fn run(&self, request: &AnalysisRequest) -> PricecastResult<AnalysisReport> {
        let request_id = Uuid::new_v4();
        let span = info_span!("analysis", %request_id, query = %request.query);
        self.run_inner(request_id, request).instrument(span).await
    }

    async fn run_inner(
        &self,
        request_id: Uuid,
        request: &AnalysisRequest,
    ) -> PricecastResult<AnalysisReport> {
        request.validate()?;

        let symbol = self.resolver.resolve(&request.query).await?;
        let series = Arc::new(
            self.acquirer
                .acquire(&symbol.symbol, &request.range, request.interval, request.output)
                .await?,
        );

        let indicator_task = {
            let series = Arc::clone(&series);
            let engine = self.indicators.clone();
            let span = Span::current();
            tokio::task::spawn_blocking(move || {
                let _enter = span.enter();
                engine.compute(&series)
            })
        };

        let forecast_task = {
            let series = Arc::clone(&series);
            let estimator = self.estimator.clone();
            let mode = request.order_mode;
            let horizon = request.horizon;
            let span = Span::current();
            tokio::task::spawn_blocking(move || -> Result<(ModelSummary, ForecastResult), FitError> {
                let _enter = span.enter();
                let model = estimator.fit(&series, &mode)?;
                Ok((model.summary().clone(), model.forecast(horizon)))
            })
        };

        let fundamentals_task = async {
            if request.include_fundamentals {
                Some(fetch_fundamentals(self.provider.as_ref(), &symbol.symbol).await)
            } else {
                None
            }
        };

        let (indicators, fitted, fundamentals) =
            tokio::join!(indicator_task, forecast_task, fundamentals_task);
        let indicators = indicators.map_err(join_error)?;
        let (model, forecast) = fitted.map_err(join_error)??;

        let series = Arc::try_unwrap(series).unwrap_or_else(|shared| PriceSeries::clone(&shared));
        let charts = ChartSet::build(&series, &forecast);

        info!(
            symbol = %symbol.symbol,
            order = %model.order,
            horizon = forecast.future_forecast.len(),
            "Analysis complete"
        );

        Ok(AnalysisReport {
            request_id,
            generated_at: Utc::now(),
            symbol,
            series,
            indicators,
            model,
            forecast,
            charts,
            fundamentals,
            preview_rows: request.preview_rows,
        })
    }
}
