//! Forecast command implementation.

use anyhow::{Context, Result};
use pricecast_config::AppConfig;
use pricecast_forecast::{ArimaEstimator, OrderMode};
use pricecast_pipeline::AnalysisPipeline;
use std::fs::File;
use tracing::info;

use crate::cli::sources::Sources;
use crate::cli::{ForecastArgs, OutputFormat};

pub async fn run(args: ForecastArgs, config: &AppConfig, sources: Sources) -> Result<()> {
    let mut request = args.series.request(config)?;
    if let Some(horizon) = args.horizon {
        request.horizon = horizon;
    }
    if args.classic {
        request.order_mode = OrderMode::legacy_fixed();
    } else if let Some(order) = args.order {
        request.order_mode = OrderMode::Fixed(order);
    }
    request.include_fundamentals = !args.no_fundamentals;
    request.preview_rows = args.preview;

    let criterion = args.criterion.unwrap_or(config.analysis.order.criterion);
    let estimator = ArimaEstimator::new()
        .with_criterion(criterion)
        .with_optimizer(config.analysis.order.optimizer())
        .with_calendar(config.calendar.calendar());

    info!(
        query = %request.query,
        range = %request.range,
        horizon = %request.horizon,
        order = %request.order_mode,
        criterion = %estimator.criterion(),
        "Starting forecast"
    );

    let pipeline = AnalysisPipeline::new(sources.provider, sources.search).with_estimator(estimator);
    let report = pipeline.run(&request).await?;

    match args.format {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => println!("{}", report.summary()),
    }

    if let Some(save_path) = &args.save {
        let json = report.to_json()?;
        std::fs::write(save_path, json)
            .with_context(|| format!("Failed to write {}", save_path.display()))?;
        info!("Report saved to {:?}", save_path);
    }

    if let Some(csv_path) = &args.forecast_csv {
        let file = File::create(csv_path)
            .with_context(|| format!("Failed to create {}", csv_path.display()))?;
        report.write_forecast_csv(file)?;
        info!("Forecast saved to {:?}", csv_path);
    }

    Ok(())
}
