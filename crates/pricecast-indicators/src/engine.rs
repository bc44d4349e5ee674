//! Standard indicator table over a close-price series.

use chrono::NaiveDate;
use pricecast_core::{Indicator, PriceSeries};
use serde::{Deserialize, Serialize};

use crate::momentum::{Returns, Rsi};
use crate::moving_average::{Ema, Sma};

/// One row of the indicator table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    pub close: f64,
    #[serde(rename = "SMA_20")]
    pub sma_20: Option<f64>,
    #[serde(rename = "SMA_50")]
    pub sma_50: Option<f64>,
    #[serde(rename = "EMA_20")]
    pub ema_20: Option<f64>,
    #[serde(rename = "EMA_50")]
    pub ema_50: Option<f64>,
    #[serde(rename = "RSI_14")]
    pub rsi_14: Option<f64>,
    #[serde(rename = "Returns")]
    pub returns: Option<f64>,
}

/// Indicator rows index-aligned with the source series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub symbol: String,
    rows: Vec<IndicatorRow>,
}

impl IndicatorSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[IndicatorRow] {
        &self.rows
    }

    /// Last `n` rows, or all of them if shorter.
    pub fn tail(&self, n: usize) -> &[IndicatorRow] {
        &self.rows[self.rows.len().saturating_sub(n)..]
    }

    pub fn latest(&self) -> Option<&IndicatorRow> {
        self.rows.last()
    }

    /// Column headers in table order.
    pub fn column_names() -> &'static [&'static str] {
        &["Date", "Close", "SMA_20", "SMA_50", "EMA_20", "EMA_50", "RSI_14", "Returns"]
    }
}

/// Computes the fixed indicator set.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    sma_20: Sma,
    sma_50: Sma,
    ema_20: Ema,
    ema_50: Ema,
    rsi_14: Rsi,
    returns: Returns,
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl IndicatorEngine {
    pub fn new() -> Self {
        Self {
            sma_20: Sma::with_window(20),
            sma_50: Sma::with_window(50),
            ema_20: Ema::with_window(20),
            ema_50: Ema::with_window(50),
            rsi_14: Rsi::with_period(14),
            returns: Returns,
        }
    }

    /// Compute every indicator over `series`. Pure and deterministic.
    pub fn compute(&self, series: &PriceSeries) -> IndicatorSet {
        let closes = series.closes();
        let sma_20 = self.sma_20.calculate(&closes);
        let sma_50 = self.sma_50.calculate(&closes);
        let ema_20 = self.ema_20.calculate(&closes);
        let ema_50 = self.ema_50.calculate(&closes);
        let rsi_14 = self.rsi_14.calculate(&closes);
        let returns = self.returns.calculate(&closes);

        let rows = series
            .iter()
            .enumerate()
            .map(|(t, point)| IndicatorRow {
                date: point.date,
                close: point.close,
                sma_20: sma_20[t],
                sma_50: sma_50[t],
                ema_20: ema_20[t],
                ema_50: ema_50[t],
                rsi_14: rsi_14[t],
                returns: returns[t],
            })
            .collect();

        IndicatorSet {
            symbol: series.symbol.clone(),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricecast_core::{month_end_after, Frequency, PricePoint};

    fn monthly_series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 31).unwrap();
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PricePoint::new(month_end_after(start, i as u32), c))
            .collect();
        PriceSeries::new("TEST", Frequency::Monthly, points).unwrap()
    }

    #[test]
    fn test_rows_are_aligned() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let series = monthly_series(&closes);
        let set = IndicatorEngine::new().compute(&series);

        assert_eq!(set.len(), series.len());
        for (row, point) in set.rows().iter().zip(series.iter()) {
            assert_eq!(row.date, point.date);
            assert_eq!(row.close, point.close);
        }
        assert!(set.rows()[18].sma_20.is_none());
        assert!(set.rows()[19].sma_20.is_some());
        assert!(set.rows()[48].sma_50.is_none());
        assert!(set.rows()[49].sma_50.is_some());
        assert!(set.rows()[0].ema_50.is_some());
        assert!(set.rows()[13].rsi_14.is_none());
        assert_eq!(set.rows()[14].rsi_14, Some(100.0));
    }

    #[test]
    fn test_short_series_has_no_fabricated_values() {
        let series = monthly_series(&[100.0, 102.0, 101.0]);
        let set = IndicatorEngine::new().compute(&series);

        assert_eq!(set.len(), 3);
        assert!(set.rows().iter().all(|r| r.sma_20.is_none() && r.rsi_14.is_none()));
        assert!(set.rows()[0].returns.is_none());
        assert!(set.rows()[1].returns.is_some());
    }

    #[test]
    fn test_tail_and_latest() {
        let series = monthly_series(&[100.0, 102.0, 101.0, 105.0, 107.0, 106.0, 110.0]);
        let set = IndicatorEngine::new().compute(&series);

        assert_eq!(set.tail(2).len(), 2);
        assert_eq!(set.tail(100).len(), 7);
        assert_eq!(set.latest().map(|r| r.close), Some(110.0));
    }

    #[test]
    fn test_compute_is_deterministic() {
        let series = monthly_series(&[100.0, 102.0, 101.0, 105.0, 107.0]);
        let engine = IndicatorEngine::new();
        assert_eq!(engine.compute(&series), engine.compute(&series));
    }

    #[test]
    fn test_serialized_column_names() {
        let series = monthly_series(&[100.0, 101.0]);
        let set = IndicatorEngine::new().compute(&series);
        let json = serde_json::to_value(set.rows()[1]).unwrap();
        assert!(json.get("SMA_20").is_some());
        assert!(json.get("RSI_14").is_some());
        assert!(json.get("Returns").is_some());
    }
}
