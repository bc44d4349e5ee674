//! Offline price history from CSV files.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use pricecast_core::{
    DateRange, Frequency, MarketDataProvider, NetworkError, OhlcRow, PriceHistory, QuoteMeta,
    Symbol,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Open", alias = "open", default)]
    open: Option<f64>,
    #[serde(alias = "High", alias = "high", default)]
    high: Option<f64>,
    #[serde(alias = "Low", alias = "low", default)]
    low: Option<f64>,
    #[serde(alias = "Close", alias = "close", alias = "Adj Close", default)]
    close: Option<f64>,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: Option<f64>,
}

#[derive(Debug, Clone)]
enum Layout {
    /// One file holding a single symbol
    File { path: PathBuf, symbol: Symbol },
    /// `<dir>/<SYMBOL>.csv`
    Directory(PathBuf),
}

/// Market data served from local CSV files.
///
/// Rows are reported at their stored frequency; the requested interval is
/// not resampled here.
#[derive(Debug, Clone)]
pub struct CsvProvider {
    layout: Layout,
}

impl CsvProvider {
    /// Serve `symbol` from a single file.
    pub fn from_file(path: impl Into<PathBuf>, symbol: Symbol) -> Self {
        Self {
            layout: Layout::File {
                path: path.into(),
                symbol,
            },
        }
    }

    /// Serve any symbol with a `<SYMBOL>.csv` file in `dir`.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            layout: Layout::Directory(dir.into()),
        }
    }

    /// Symbols this provider can serve.
    pub fn symbols(&self) -> Vec<Symbol> {
        match &self.layout {
            Layout::File { symbol, .. } => vec![symbol.clone()],
            Layout::Directory(dir) => {
                let Ok(entries) = std::fs::read_dir(dir) else {
                    return Vec::new();
                };
                let mut symbols: Vec<Symbol> = entries
                    .filter_map(Result::ok)
                    .map(|e| e.path())
                    .filter(|p| p.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv")))
                    .filter_map(|p| {
                        let stem = p.file_stem()?.to_str()?.to_string();
                        Symbol::parse(&stem).ok()
                    })
                    .collect();
                symbols.sort_by(|a, b| a.as_str().cmp(b.as_str()));
                symbols
            }
        }
    }

    fn path_for(&self, symbol: &Symbol) -> Option<PathBuf> {
        match &self.layout {
            Layout::File { path, symbol: own } => (own == symbol).then(|| path.clone()),
            Layout::Directory(dir) => {
                let path = dir.join(format!("{}.csv", symbol.as_str()));
                path.exists().then_some(path)
            }
        }
    }

    fn load(&self, symbol: &Symbol) -> Result<Vec<OhlcRow>, NetworkError> {
        match self.path_for(symbol) {
            Some(path) => load_rows(&path),
            None => {
                debug!(symbol = %symbol, "No CSV file for symbol");
                Ok(Vec::new())
            }
        }
    }

    fn meta(symbol: &Symbol, rows: &[OhlcRow]) -> QuoteMeta {
        let closes: Vec<f64> = rows.iter().filter_map(OhlcRow::valid_close).collect();
        let last = closes.last().copied();
        let previous = closes.len().checked_sub(2).map(|i| closes[i]);
        QuoteMeta {
            short_name: Some(symbol.to_string()),
            regular_market_price: last,
            previous_close: previous,
            ..Default::default()
        }
    }
}

#[async_trait]
impl MarketDataProvider for CsvProvider {
    async fn fetch_history(
        &self,
        symbol: &Symbol,
        _interval: Frequency,
        range: &DateRange,
    ) -> Result<PriceHistory, NetworkError> {
        let rows: Vec<OhlcRow> = self
            .load(symbol)?
            .into_iter()
            .filter(|row| row.local_date(0).is_some_and(|d| range.contains(d)))
            .collect();
        let meta = Self::meta(symbol, &rows);
        Ok(PriceHistory::new(rows, meta))
    }

    async fn fetch_quote(&self, symbol: &Symbol) -> Result<PriceHistory, NetworkError> {
        let rows = self.load(symbol)?;
        let meta = Self::meta(symbol, &rows);
        let last = rows.iter().rev().find(|r| r.valid_close().is_some()).copied();
        Ok(PriceHistory::new(last.into_iter().collect(), meta))
    }

    fn name(&self) -> &str {
        "csv"
    }
}

/// Load rows from a CSV file, oldest first.
pub fn load_rows(path: &Path) -> Result<Vec<OhlcRow>, NetworkError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| NetworkError::Transport(format!("{}: {}", path.display(), e)))?;

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let record: CsvRecord = result.map_err(|e| NetworkError::Decode(e.to_string()))?;
        let timestamp = parse_timestamp(&record.date)?;
        rows.push(OhlcRow {
            timestamp,
            open: record.open,
            high: record.high,
            low: record.low,
            close: record.close,
            volume: record.volume,
        });
    }

    rows.sort_by_key(|r| r.timestamp);
    Ok(rows)
}

/// Parse various timestamp formats into Unix milliseconds.
fn parse_timestamp(date_str: &str) -> Result<i64, NetworkError> {
    let datetime_formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
    for format in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }

    let date_formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];
    for format in date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d.and_time(chrono::NaiveTime::MIN).and_utc().timestamp_millis());
        }
    }

    // Unix timestamp, milliseconds if > 10 digits
    if let Ok(ts) = date_str.parse::<i64>() {
        return Ok(if ts > 10_000_000_000 { ts } else { ts * 1000 });
    }

    Err(NetworkError::Decode(format!(
        "Could not parse date: {}",
        date_str
    )))
}
