//! Analysis report generation.

use chrono::{DateTime, Utc};
use pricecast_core::{Fundamentals, PriceSeries, Provenance, ResolvedSymbol};
use pricecast_forecast::{ForecastResult, ModelSummary};
use pricecast_indicators::IndicatorSet;
use serde::{Deserialize, Serialize};
use std::io::Write;
use uuid::Uuid;

use crate::charts::ChartSet;

const RULE: &str = "═══════════════════════════════════════════════════════════\n";
const SECTION: &str = "───────────────────────────────────────────────────────────\n";

/// Complete analysis report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Correlates log lines with this run
    pub request_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub symbol: ResolvedSymbol,
    pub series: PriceSeries,
    pub indicators: IndicatorSet,
    pub model: ModelSummary,
    pub forecast: ForecastResult,
    pub charts: ChartSet,
    /// `None` when the lookup was not requested
    pub fundamentals: Option<Fundamentals>,
    /// Rows shown in the text preview
    pub preview_rows: usize,
}

fn opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}

impl AnalysisReport {
    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str(RULE);
        s.push_str(&format!("                 PRICE FORECAST: {:<26}\n", self.symbol.as_str()));
        s.push_str(RULE);
        s.push('\n');

        s.push_str("SYMBOL\n");
        s.push_str(SECTION);
        s.push_str(&format!("  Ticker:              {}\n", self.symbol.as_str()));
        match &self.symbol.provenance {
            Provenance::DirectHit => s.push_str("  Resolved By:         direct quote\n"),
            Provenance::Searched { exchange, name } => {
                s.push_str("  Resolved By:         symbol search\n");
                if let Some(name) = name {
                    s.push_str(&format!("  Name:                {}\n", name));
                }
                if let Some(exchange) = exchange {
                    s.push_str(&format!("  Exchange:            {}\n", exchange));
                }
            }
        }
        s.push('\n');

        s.push_str("SERIES\n");
        s.push_str(SECTION);
        s.push_str(&format!("  Frequency:           {}\n", self.series.frequency));
        s.push_str(&format!("  Observations:        {}\n", self.series.len()));
        if let (Some(first), Some(last)) = (self.series.first(), self.series.last()) {
            s.push_str(&format!("  First:               {} {:.2}\n", first.date, first.close));
            s.push_str(&format!("  Last:                {} {:.2}\n", last.date, last.close));
        }
        s.push('\n');

        if let Some(latest) = self.indicators.latest() {
            s.push_str("LATEST INDICATORS\n");
            s.push_str(SECTION);
            s.push_str(&format!("  SMA 20 / 50:         {} / {}\n", opt(latest.sma_20), opt(latest.sma_50)));
            s.push_str(&format!("  EMA 20 / 50:         {} / {}\n", opt(latest.ema_20), opt(latest.ema_50)));
            s.push_str(&format!("  RSI 14:              {}\n", opt(latest.rsi_14)));
            s.push_str(&format!(
                "  Return:              {}\n",
                latest.returns.map_or_else(|| "-".to_string(), |r| format!("{:.2}%", r * 100.0))
            ));
            s.push('\n');
        }

        s.push_str("MODEL\n");
        s.push_str(SECTION);
        s.push_str(&format!("  Order:               ARIMA{}\n", self.model.order));
        s.push_str(&format!("  {:<21}{:.3}\n", format!("{}:", self.model.criterion), self.model.score));
        s.push_str(&format!("  Log Likelihood:      {:.3}\n", self.model.log_likelihood));
        s.push_str(&format!("  Sigma²:              {:.4}\n", self.model.sigma2));
        s.push('\n');

        s.push_str("FORECAST\n");
        s.push_str(SECTION);
        for point in &self.forecast.future_forecast {
            s.push_str(&format!(
                "  {}          {:>10.2}  [{:.2}, {:.2}]\n",
                point.date, point.value, point.lower_95, point.upper_95
            ));
        }
        s.push('\n');

        if let Some(fundamentals) = &self.fundamentals {
            s.push_str("FUNDAMENTALS\n");
            s.push_str(SECTION);
            match fundamentals {
                Fundamentals::Available(f) => {
                    if let Some(name) = &f.company_name {
                        s.push_str(&format!("  Company:             {}\n", name));
                    }
                    if let Some(currency) = &f.currency {
                        s.push_str(&format!("  Currency:            {}\n", currency));
                    }
                    s.push_str(&format!("  Market Price:        {}\n", opt(f.market_price)));
                    s.push_str(&format!("  Previous Close:      {}\n", opt(f.previous_close)));
                    s.push_str(&format!("  52w High / Low:      {} / {}\n", opt(f.year_high), opt(f.year_low)));
                    s.push_str(&format!("  Market Cap:          {}\n", opt(f.market_cap)));
                }
                Fundamentals::Unavailable { reason } => {
                    s.push_str(&format!("  Unavailable:         {}\n", reason));
                }
            }
            s.push('\n');
        }

        if self.preview_rows > 0 {
            s.push_str(&self.preview(self.preview_rows));
            s.push('\n');
        }

        s.push_str(RULE);
        s
    }

    /// Last `n` rows of the indicator table as text.
    pub fn preview(&self, n: usize) -> String {
        let mut s = String::new();
        s.push_str("RECENT DATA\n");
        s.push_str(SECTION);
        s.push_str("  Date          Close   SMA_20   EMA_20   RSI_14\n");
        for row in self.indicators.tail(n) {
            s.push_str(&format!(
                "  {}  {:>8.2} {:>8} {:>8} {:>8}\n",
                row.date,
                row.close,
                opt(row.sma_20),
                opt(row.ema_20),
                opt(row.rsi_14)
            ));
        }
        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export the indicator table as CSV.
    pub fn write_indicators_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);
        for row in self.indicators.rows() {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Export the future forecast as CSV.
    pub fn write_forecast_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);
        for point in &self.forecast.future_forecast {
            wtr.serialize(point)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
