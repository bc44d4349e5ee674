//! Benchmarks for indicator implementations.

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pricecast_core::{Frequency, Indicator, PricePoint, PriceSeries};
use pricecast_indicators::{Ema, IndicatorEngine, Rsi, Sma};

fn generate_test_data(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| 100.0 + (i as f64 * 0.1).sin() * 10.0)
        .collect()
}

fn benchmark_single(c: &mut Criterion) {
    let mut group = c.benchmark_group("single");

    for size in [1000, 10000, 100000].iter() {
        let data = generate_test_data(*size);

        group.bench_with_input(BenchmarkId::new("sma_20", size), &data, |b, data| {
            let sma = Sma::new(20).unwrap();
            b.iter(|| sma.calculate(black_box(data)))
        });

        group.bench_with_input(BenchmarkId::new("ema_20", size), &data, |b, data| {
            let ema = Ema::new(20).unwrap();
            b.iter(|| ema.calculate(black_box(data)))
        });

        group.bench_with_input(BenchmarkId::new("rsi_14", size), &data, |b, data| {
            let rsi = Rsi::new(14).unwrap();
            b.iter(|| rsi.calculate(black_box(data)))
        });
    }

    group.finish();
}

fn benchmark_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");
    let start = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();

    for size in [240, 5000].iter() {
        let points = generate_test_data(*size)
            .into_iter()
            .enumerate()
            .map(|(i, c)| PricePoint::new(start + chrono::Duration::days(i as i64), c))
            .collect();
        let series = PriceSeries::new("BENCH", Frequency::Daily, points).unwrap();
        let engine = IndicatorEngine::new();

        group.bench_with_input(BenchmarkId::new("compute", size), &series, |b, series| {
            b.iter(|| engine.compute(black_box(series)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_single, benchmark_engine);
criterion_main!(benches);
