//! Fetching and normalizing price history.

use chrono::{Datelike, NaiveDate};
use pricecast_core::{
    month_end, DateRange, Frequency, MarketDataProvider, OhlcRow, PricePoint, PriceSeries,
    PricecastError, PricecastResult, Symbol, ValidationError,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Turns provider rows into a clean [`PriceSeries`].
#[derive(Clone)]
pub struct SeriesAcquirer {
    provider: Arc<dyn MarketDataProvider>,
}

impl SeriesAcquirer {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    /// Fetch `symbol` at the native `interval` and emit it at `output` frequency.
    pub async fn acquire(
        &self,
        symbol: &Symbol,
        range: &DateRange,
        interval: Frequency,
        output: Frequency,
    ) -> PricecastResult<PriceSeries> {
        if interval.is_coarser_than(output) {
            return Err(ValidationError::UnsupportedResample {
                from: interval,
                to: output,
            }
            .into());
        }

        let no_data = || PricecastError::NoData {
            symbol: symbol.to_string(),
        };

        let history = match self.provider.fetch_history(symbol, interval, range).await {
            Ok(history) => history,
            Err(err) => {
                warn!(symbol = %symbol, provider = self.provider.name(), error = %err, "History fetch failed");
                return Err(no_data());
            }
        };

        let raw = history.rows.len();
        let points = clean_rows(&history.rows, history.meta.gmt_offset);
        debug!(symbol = %symbol, raw, kept = points.len(), "Cleaned provider rows");

        let points = match output {
            Frequency::Monthly => resample_monthly(&points),
            Frequency::Daily => points,
        };
        if points.is_empty() {
            return Err(no_data());
        }

        let series = PriceSeries::new(symbol.as_str(), output, points)?;
        if let (Some(first), Some(last)) = (series.first(), series.last()) {
            info!(
                symbol = %symbol,
                %interval,
                %output,
                points = series.len(),
                first = %first.date,
                last = %last.date,
                "Acquired series"
            );
        }
        Ok(series)
    }
}

/// Drop unusable closes, convert to exchange-local dates, sort, and keep the
/// last observation of any repeated date.
pub fn clean_rows(rows: &[OhlcRow], utc_offset_secs: i32) -> Vec<PricePoint> {
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut ordered: Vec<&OhlcRow> = rows.iter().collect();
    // stable: equal timestamps keep provider order
    ordered.sort_by_key(|r| r.timestamp);
    for row in ordered {
        let (Some(close), Some(date)) = (row.valid_close(), row.local_date(utc_offset_secs)) else {
            continue;
        };
        by_date.insert(date, close);
    }
    by_date
        .into_iter()
        .map(|(date, close)| PricePoint::new(date, close))
        .collect()
}

/// Last close of each calendar month, stamped with the month-end date.
pub fn resample_monthly(points: &[PricePoint]) -> Vec<PricePoint> {
    let mut by_month: BTreeMap<(i32, u32), PricePoint> = BTreeMap::new();
    for point in points {
        let key = (point.date.year(), point.date.month());
        let keep = by_month.get(&key).map_or(true, |p| point.date >= p.date);
        if keep {
            by_month.insert(key, *point);
        }
    }
    by_month
        .into_values()
        .map(|p| PricePoint::new(month_end(p.date), p.close))
        .collect()
}
