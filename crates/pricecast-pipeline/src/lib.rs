//! End-to-end analysis: symbol resolution, series acquisition, indicators,
//! ARIMA forecast and the resulting report.

mod charts;
mod engine;
mod report;
mod request;

pub use charts::{ChartPoint, ChartSet};
pub use engine::AnalysisPipeline;
pub use report::AnalysisReport;
pub use request::AnalysisRequest;
