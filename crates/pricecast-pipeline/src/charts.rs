//! Plot-ready datasets. The core never draws; front-ends render these.

use chrono::NaiveDate;
use pricecast_core::PriceSeries;
use pricecast_forecast::ForecastResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// The three standard charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSet {
    /// Observed closes
    pub trend: Vec<ChartPoint>,
    /// In-sample fitted values, conditioning window omitted
    pub fit_overlay: Vec<ChartPoint>,
    /// Future point forecasts
    pub future_overlay: Vec<ChartPoint>,
}

impl ChartSet {
    pub fn build(series: &PriceSeries, forecast: &ForecastResult) -> Self {
        let trend = series
            .iter()
            .map(|p| ChartPoint {
                date: p.date,
                value: p.close,
            })
            .collect();
        let fit_overlay = forecast
            .fitted_values
            .iter()
            .filter_map(|p| p.value.map(|value| ChartPoint { date: p.date, value }))
            .collect();
        let future_overlay = forecast
            .future_forecast
            .iter()
            .map(|p| ChartPoint {
                date: p.date,
                value: p.value,
            })
            .collect();

        Self {
            trend,
            fit_overlay,
            future_overlay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricecast_core::{Frequency, PricePoint};
    use pricecast_forecast::{FittedPoint, ForecastPoint};

    #[test]
    fn test_build_skips_undefined_fits() {
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let d3 = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let series = PriceSeries::new(
            "AAPL",
            Frequency::Monthly,
            vec![PricePoint::new(d1, 10.0), PricePoint::new(d2, 11.0)],
        )
        .unwrap();
        let forecast = ForecastResult {
            fitted_values: vec![
                FittedPoint { date: d1, value: None },
                FittedPoint { date: d2, value: Some(10.8) },
            ],
            future_forecast: vec![ForecastPoint {
                date: d3,
                value: 11.2,
                lower_95: 9.0,
                upper_95: 13.4,
            }],
        };

        let charts = ChartSet::build(&series, &forecast);
        assert_eq!(charts.trend.len(), 2);
        assert_eq!(charts.fit_overlay, vec![ChartPoint { date: d2, value: 10.8 }]);
        assert_eq!(charts.future_overlay[0].date, d3);
    }
}
