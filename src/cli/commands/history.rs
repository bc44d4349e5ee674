//! History export command implementation.

use anyhow::{Context, Result};
use pricecast_config::AppConfig;
use pricecast_data::{SeriesAcquirer, SymbolResolver};
use pricecast_indicators::IndicatorEngine;
use std::fs::File;
use std::io::{self, Write};
use tracing::info;

use crate::cli::sources::Sources;
use crate::cli::HistoryArgs;

pub async fn run(args: HistoryArgs, config: &AppConfig, sources: Sources) -> Result<()> {
    let request = args.series.request(config)?;
    request.validate()?;

    let resolver = SymbolResolver::new(sources.provider.clone(), sources.search);
    let acquirer = SeriesAcquirer::new(sources.provider);

    let resolved = resolver.resolve(&request.query).await?;
    let series = acquirer
        .acquire(&resolved.symbol, &request.range, request.interval, request.output)
        .await?;
    let table = IndicatorEngine::new().compute(&series);

    let writer: Box<dyn Write> = match &args.out {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut csv = csv::Writer::from_writer(writer);
    for row in table.rows() {
        csv.serialize(row)?;
    }
    csv.flush()?;

    info!(symbol = %resolved.symbol, rows = table.len(), "History exported");
    Ok(())
}
