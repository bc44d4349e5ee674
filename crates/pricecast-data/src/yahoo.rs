//! Yahoo Finance chart and search endpoints.

use async_trait::async_trait;
use chrono::NaiveTime;
use pricecast_core::{
    DateRange, Frequency, MarketDataProvider, NetworkError, OhlcRow, PriceHistory, QuoteMeta,
    SearchMatch, Symbol, SymbolSearch,
};
use reqwest::{header, Client};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::retry::RetryPolicy;

pub const DEFAULT_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
pub const DEFAULT_SEARCH_URL: &str = "https://query2.finance.yahoo.com/v1/finance/search";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Endpoint and client settings.
#[derive(Debug, Clone)]
pub struct YahooConfig {
    pub chart_url: String,
    pub search_url: String,
    pub user_agent: String,
    /// Maximum quotes requested from the search endpoint
    pub search_limit: usize,
    pub retry: RetryPolicy,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            chart_url: DEFAULT_CHART_URL.to_string(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            search_limit: 10,
            retry: RetryPolicy::default(),
        }
    }
}

/// HTTP client for Yahoo Finance.
pub struct YahooProvider {
    config: YahooConfig,
    client: Client,
}

impl YahooProvider {
    pub fn new(config: YahooConfig) -> Result<Self, NetworkError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::REFERER,
            header::HeaderValue::from_static("https://finance.yahoo.com/"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&config.user_agent)
                .map_err(|e| NetworkError::Transport(e.to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| NetworkError::Transport(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &YahooConfig {
        &self.config
    }

    fn chart_url(&self, symbol: &Symbol, interval: Frequency, range: &DateRange) -> String {
        let base = format!(
            "{}/{}",
            self.config.chart_url.trim_end_matches('/'),
            urlencoding::encode(symbol.as_str())
        );
        match range {
            DateRange::Max => format!("{}?range=max&interval={}", base, interval.as_interval()),
            DateRange::Between { start, end } => format!(
                "{}?period1={}&period2={}&interval={}",
                base,
                start.and_time(NaiveTime::MIN).and_utc().timestamp(),
                end.and_time(NaiveTime::MIN).and_utc().timestamp(),
                interval.as_interval()
            ),
        }
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}?q={}&quotesCount={}&newsCount=0",
            self.config.search_url,
            urlencoding::encode(query),
            self.config.search_limit
        )
    }

    async fn get_body(&self, url: &str) -> Result<String, NetworkError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| NetworkError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(NetworkError::Status {
                status: status.as_u16(),
            });
        }

        resp.text()
            .await
            .map_err(|e| NetworkError::Transport(e.to_string()))
    }

    async fn get_with_retry(&self, label: &str, url: String) -> Result<String, NetworkError> {
        debug!(call = label, url = %url, "Requesting");
        self.config
            .retry
            .run(label, || self.get_body(&url))
            .await
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    async fn fetch_history(
        &self,
        symbol: &Symbol,
        interval: Frequency,
        range: &DateRange,
    ) -> Result<PriceHistory, NetworkError> {
        let body = self
            .get_with_retry("chart", self.chart_url(symbol, interval, range))
            .await?;
        parse_chart(&body)
    }

    async fn fetch_quote(&self, symbol: &Symbol) -> Result<PriceHistory, NetworkError> {
        let url = format!(
            "{}/{}?range=1d&interval=1d",
            self.config.chart_url.trim_end_matches('/'),
            urlencoding::encode(symbol.as_str())
        );
        let body = self.get_with_retry("quote", url).await?;
        parse_chart(&body)
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}

#[async_trait]
impl SymbolSearch for YahooProvider {
    async fn search(&self, query: &str) -> Result<Vec<SearchMatch>, NetworkError> {
        let body = self.get_with_retry("search", self.search_url(query)).await?;
        parse_search(&body)
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}

// Yahoo Finance API response structures
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Deserialize)]
struct YahooApiError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    meta: Option<YahooChartMeta>,
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: YahooChartIndicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooChartMeta {
    currency: Option<String>,
    long_name: Option<String>,
    short_name: Option<String>,
    full_exchange_name: Option<String>,
    exchange_name: Option<String>,
    regular_market_price: Option<f64>,
    previous_close: Option<f64>,
    chart_previous_close: Option<f64>,
    fifty_two_week_high: Option<f64>,
    fifty_two_week_low: Option<f64>,
    market_cap: Option<f64>,
    #[serde(rename = "gmtoffset")]
    gmt_offset: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct YahooSearchResponse {
    #[serde(default)]
    quotes: Vec<YahooSearchQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooSearchQuote {
    symbol: String,
    #[serde(default)]
    shortname: Option<String>,
    #[serde(default)]
    longname: Option<String>,
    #[serde(default)]
    exchange: Option<String>,
    #[serde(rename = "quoteType", default)]
    quote_type: Option<String>,
}

impl From<YahooChartMeta> for QuoteMeta {
    fn from(meta: YahooChartMeta) -> Self {
        QuoteMeta {
            currency: meta.currency,
            long_name: meta.long_name,
            short_name: meta.short_name,
            exchange: meta.full_exchange_name.or(meta.exchange_name),
            regular_market_price: meta.regular_market_price,
            previous_close: meta.previous_close.or(meta.chart_previous_close),
            year_high: meta.fifty_two_week_high,
            year_low: meta.fifty_two_week_low,
            market_cap: meta.market_cap,
            gmt_offset: meta.gmt_offset.unwrap_or(0),
        }
    }
}

/// Decode a chart payload into rows and meta.
///
/// An API-level "no data" error yields an empty history.
pub fn parse_chart(body: &str) -> Result<PriceHistory, NetworkError> {
    let response: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| NetworkError::Decode(format!("failed to parse yahoo chart: {}", e)))?;

    if let Some(error) = response.chart.error {
        debug!(
            code = error.code.as_deref().unwrap_or("unknown"),
            description = error.description.as_deref().unwrap_or(""),
            "Chart API returned an error"
        );
        return Ok(PriceHistory::default());
    }

    let Some(result) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(PriceHistory::default());
    };

    let meta: QuoteMeta = result.meta.unwrap_or_default().into();
    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let field = |values: &[Option<f64>], i: usize| values.get(i).copied().flatten();

    let rows = timestamps
        .iter()
        .enumerate()
        .map(|(i, &ts)| OhlcRow {
            timestamp: ts * 1000,
            open: field(&quote.open, i),
            high: field(&quote.high, i),
            low: field(&quote.low, i),
            close: field(&quote.close, i),
            volume: field(&quote.volume, i),
        })
        .collect();

    Ok(PriceHistory::new(rows, meta))
}

/// Decode a search payload into ranked matches, preserving Yahoo's order.
pub fn parse_search(body: &str) -> Result<Vec<SearchMatch>, NetworkError> {
    let response: YahooSearchResponse = serde_json::from_str(body)
        .map_err(|e| NetworkError::Decode(format!("failed to parse search response: {}", e)))?;

    Ok(response
        .quotes
        .into_iter()
        .map(|q| SearchMatch {
            symbol: q.symbol,
            exchange: q.exchange,
            name: q.longname.or(q.shortname),
            quote_type: q.quote_type,
        })
        .collect())
}
