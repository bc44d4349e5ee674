use async_trait::async_trait;
use pricecast_core::{
    DateRange, Frequency, Fundamentals, Horizon, MarketDataProvider, NetworkError, OhlcRow, Order,
    PriceHistory, PricecastError, Provenance, QuoteMeta, SearchMatch, Symbol, SymbolSearch,
    ValidationError,
};
use pricecast_forecast::{OrderMode, SearchBounds};
use pricecast_pipeline::{AnalysisPipeline, AnalysisRequest};
use std::sync::Arc;

const DAY_MS: i64 = 86_400_000;
// 2021-01-04 00:00:00 UTC
const START_MS: i64 = 1_609_718_400_000;

/// Serves 2021 through 2023 as synthetic daily closes for one ticker.
struct SyntheticProvider {
    ticker: &'static str,
}

impl SyntheticProvider {
    fn history(&self) -> PriceHistory {
        let mut state: u64 = 42;
        let rows = (0..1092)
            .map(|i| {
                state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
                let noise = ((state >> 33) as f64 / (1u64 << 31) as f64) - 0.5;
                let t = i as f64;
                let close = 100.0 + 0.05 * t + 4.0 * (t / 40.0).sin() + noise;
                OhlcRow::close_only(START_MS + i * DAY_MS, Some(close))
            })
            .collect();
        PriceHistory::new(rows, self.meta())
    }

    fn meta(&self) -> QuoteMeta {
        QuoteMeta {
            short_name: Some("Synthetic Corp".into()),
            currency: Some("USD".into()),
            regular_market_price: Some(155.0),
            ..Default::default()
        }
    }
}

#[async_trait]
impl MarketDataProvider for SyntheticProvider {
    async fn fetch_history(
        &self,
        symbol: &Symbol,
        _interval: Frequency,
        _range: &DateRange,
    ) -> Result<PriceHistory, NetworkError> {
        if symbol.as_str() == self.ticker {
            Ok(self.history())
        } else {
            Ok(PriceHistory::default())
        }
    }

    async fn fetch_quote(&self, symbol: &Symbol) -> Result<PriceHistory, NetworkError> {
        if symbol.as_str() == self.ticker {
            Ok(PriceHistory::new(
                vec![OhlcRow::close_only(START_MS, Some(155.0))],
                self.meta(),
            ))
        } else {
            Ok(PriceHistory::default())
        }
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}

struct ListSearch(Vec<SearchMatch>);

#[async_trait]
impl SymbolSearch for ListSearch {
    async fn search(&self, _query: &str) -> Result<Vec<SearchMatch>, NetworkError> {
        Ok(self.0.clone())
    }

    fn name(&self) -> &str {
        "list"
    }
}

fn pipeline(matches: Vec<SearchMatch>) -> AnalysisPipeline {
    AnalysisPipeline::new(
        Arc::new(SyntheticProvider { ticker: "SYN" }),
        Arc::new(ListSearch(matches)),
    )
}

#[tokio::test]
async fn test_monthly_forecast_end_to_end() {
    let request = AnalysisRequest::new("SYN")
        .with_horizon(Horizon::new(6).unwrap())
        .with_order_mode(OrderMode::Fixed(Order::new(1, 1, 0)));

    let report = pipeline(vec![]).run(&request).await.unwrap();

    assert!(report.symbol.is_direct_hit());
    assert_eq!(report.series.frequency, Frequency::Monthly);
    assert_eq!(report.series.len(), 36);
    assert_eq!(report.indicators.len(), report.series.len());
    assert_eq!(report.model.order, Order::new(1, 1, 0));

    let future = &report.forecast.future_forecast;
    assert_eq!(future.len(), 6);
    let last = report.series.last().unwrap().date;
    assert!(future[0].date > last);
    assert!(future.windows(2).all(|w| w[0].date < w[1].date));
    assert!(future
        .iter()
        .all(|p| p.lower_95 <= p.value && p.value <= p.upper_95));

    assert_eq!(report.forecast.fitted_values.len(), report.series.len());
    assert!(report.forecast.fitted_values[0].value.is_none());
    assert_eq!(report.charts.trend.len(), 36);
    assert_eq!(report.charts.future_overlay.len(), 6);

    match report.fundamentals {
        Some(Fundamentals::Available(ref summary)) => {
            assert_eq!(summary.company_name.as_deref(), Some("Synthetic Corp"));
        }
        ref other => panic!("unexpected fundamentals: {:?}", other),
    }
}

#[tokio::test]
async fn test_company_name_resolved_through_search() {
    let matches = vec![SearchMatch::new("SYN", Some("NMS")).with_name("Synthetic Corp")];
    let request = AnalysisRequest::new("Synthetic Corp")
        .with_order_mode(OrderMode::Auto(SearchBounds::new(1, 1, 1).unwrap()))
        .with_fundamentals(false);

    let report = pipeline(matches).run(&request).await.unwrap();

    assert_eq!(report.symbol.as_str(), "SYN");
    assert!(matches!(report.symbol.provenance, Provenance::Searched { .. }));
    assert!(report.fundamentals.is_none());
    assert_eq!(report.forecast.future_forecast.len(), 12);
}

#[tokio::test]
async fn test_unknown_query_is_not_found() {
    let request = AnalysisRequest::new("zzz-not-a-real-company-xyz");
    let err = pipeline(vec![]).run(&request).await.unwrap_err();
    assert!(matches!(err, PricecastError::NotFound { .. }));
}

#[tokio::test]
async fn test_upsampling_rejected_before_fetch() {
    let request =
        AnalysisRequest::new("SYN").with_frequencies(Frequency::Monthly, Frequency::Daily);
    let err = pipeline(vec![]).run(&request).await.unwrap_err();
    assert!(matches!(
        err,
        PricecastError::Validation(ValidationError::UnsupportedResample { .. })
    ));
}
