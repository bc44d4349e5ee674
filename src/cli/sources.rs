//! Market data collaborators chosen from the command line.

use anyhow::{bail, Context, Result};
use pricecast_config::AppConfig;
use pricecast_core::{MarketDataProvider, SearchMatch, Symbol, SymbolSearch};
use pricecast_data::{CsvProvider, StaticSymbolSearch, YahooProvider};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub struct Sources {
    pub provider: Arc<dyn MarketDataProvider>,
    pub search: Arc<dyn SymbolSearch>,
}

/// Yahoo Finance by default, or local CSV files with `--data`.
pub fn build(data: Option<&Path>, config: &AppConfig) -> Result<Sources> {
    match data {
        Some(path) => offline(path),
        None => {
            let yahoo = Arc::new(
                YahooProvider::new(config.provider.yahoo_config())
                    .context("Failed to build HTTP client")?,
            );
            Ok(Sources {
                provider: yahoo.clone(),
                search: yahoo,
            })
        }
    }
}

fn offline(path: &Path) -> Result<Sources> {
    if !path.exists() {
        bail!(
            "Data path '{}' does not exist. Provide a CSV file or a directory of <SYMBOL>.csv files (e.g. --data ./data)",
            path.display()
        );
    }

    let provider = if path.is_file() {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .context("CSV file name is not valid UTF-8")?;
        let symbol = Symbol::parse(stem)
            .with_context(|| format!("File name '{}' is not a ticker", stem))?;
        CsvProvider::from_file(path, symbol)
    } else {
        CsvProvider::from_dir(path)
    };

    let entries: Vec<SearchMatch> = provider
        .symbols()
        .iter()
        .map(|symbol| SearchMatch::new(symbol.as_str(), Some("CSV")))
        .collect();
    info!(path = %path.display(), symbols = entries.len(), "Using offline CSV data");

    Ok(Sources {
        provider: Arc::new(provider),
        search: Arc::new(StaticSymbolSearch::new(entries)),
    })
}
