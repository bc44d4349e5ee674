//! CLI definitions.

pub mod commands;
pub mod sources;

use clap::{Parser, Subcommand, ValueEnum};
use pricecast_config::AppConfig;
use pricecast_core::{DateRange, Frequency, Horizon, Order, ValidationError};
use pricecast_forecast::InformationCriterion;
use pricecast_pipeline::AnalysisRequest;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pricecast")]
#[command(author, version, about = "Ticker resolution, technical indicators and ARIMA price forecasts")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "PRICECAST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (overrides the configuration)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    /// Also write JSON logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Serve prices from a CSV file or a directory of `<SYMBOL>.csv` files instead of the network
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve, analyse and forecast one company or ticker
    Forecast(ForecastArgs),
    /// Resolve a company name or ticker to a symbol
    Resolve(ResolveArgs),
    /// Export the price series and indicator table as CSV
    History(HistoryArgs),
    /// Validate configuration
    ValidateConfig(ValidateArgs),
}

/// Series selection shared by commands that fetch history.
#[derive(clap::Args)]
pub struct SeriesArgs {
    /// Company name or ticker, e.g. "Reliance Industries" or AAPL
    pub query: String,

    /// History range: max, 2010-2018, 2021-2025 or YYYY-MM-DD..YYYY-MM-DD
    #[arg(short, long)]
    pub range: Option<DateRange>,

    /// Native fetch interval (1d, 1mo)
    #[arg(long)]
    pub interval: Option<Frequency>,

    /// Frequency of the analysed series (1d, 1mo)
    #[arg(long)]
    pub frequency: Option<Frequency>,
}

impl SeriesArgs {
    /// Request built from configured defaults, overridden by the flags given.
    pub fn request(&self, config: &AppConfig) -> Result<AnalysisRequest, ValidationError> {
        let analysis = &config.analysis;
        let range = match self.range {
            Some(range) => range,
            None => analysis.range()?,
        };
        Ok(AnalysisRequest::new(self.query.clone())
            .with_range(range)
            .with_frequencies(
                self.interval.unwrap_or(analysis.interval),
                self.frequency.unwrap_or(analysis.output),
            )
            .with_horizon(analysis.horizon()?)
            .with_order_mode(analysis.order.order_mode()?))
    }
}

#[derive(clap::Args)]
pub struct ForecastArgs {
    #[command(flatten)]
    pub series: SeriesArgs,

    /// Periods to forecast: 1-60, or 6m, 1y, 2y
    #[arg(short = 'H', long)]
    pub horizon: Option<Horizon>,

    /// Fixed ARIMA order "p,d,q" instead of automatic selection
    #[arg(long, conflicts_with = "classic")]
    pub order: Option<Order>,

    /// Use the classic fixed ARIMA(5,1,0)
    #[arg(long)]
    pub classic: bool,

    /// Criterion for automatic order selection (aic, aicc, bic)
    #[arg(long)]
    pub criterion: Option<InformationCriterion>,

    /// Skip the fundamentals lookup
    #[arg(long)]
    pub no_fundamentals: bool,

    /// Rows of recent data shown in the text report
    #[arg(long, default_value = "5")]
    pub preview: usize,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Save the JSON report to a file
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Write the forecast table as CSV to a file
    #[arg(long)]
    pub forecast_csv: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct ResolveArgs {
    /// Company name or ticker
    pub query: String,
}

#[derive(clap::Args)]
pub struct HistoryArgs {
    #[command(flatten)]
    pub series: SeriesArgs,

    /// Output file; stdout when omitted
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Print the effective configuration as TOML
    #[arg(long)]
    pub print: bool,
}
