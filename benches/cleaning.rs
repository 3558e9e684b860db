//! Benchmarks for cleaning and comparison.

use chrono::{Duration, NaiveDate};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use polars::prelude::*;
use solar_potential::features::timestamp_series;
use solar_potential::{CleaningConfig, ComparisonConfig, SolarDataset, clean, compare};

fn station(country: &str, rows: usize, scale: f64) -> SolarDataset {
    let start = NaiveDate::from_ymd_opt(2021, 8, 9)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid start");
    let stamps: Vec<_> = (0..rows)
        .map(|i| Some(start + Duration::minutes(i as i64)))
        .collect();

    let irradiance = |factor: f64| -> Vec<Option<f64>> {
        (0..rows)
            .map(|i| {
                let hour = (i / 60) % 24;
                let value = if (6..=18).contains(&hour) {
                    scale * 900.0 * (std::f64::consts::PI * (hour as f64 - 6.0) / 12.0).sin()
                } else {
                    -1.0
                };
                // sparse gaps and spikes
                match i % 997 {
                    0 => None,
                    1 => Some(value * 40.0 + 5_000.0),
                    _ => Some(value * factor),
                }
            })
            .collect()
    };
    let wind: Vec<Option<f64>> = (0..rows).map(|i| Some(2.0 + (i % 7) as f64 * 0.4)).collect();

    let frame = DataFrame::new(vec![
        timestamp_series("Timestamp", &stamps)
            .expect("timestamps")
            .into_column(),
        Column::new("GHI".into(), irradiance(1.0)),
        Column::new("DNI".into(), irradiance(0.7)),
        Column::new("DHI".into(), irradiance(0.25)),
        Column::new("ModA".into(), irradiance(0.95)),
        Column::new("ModB".into(), irradiance(0.93)),
        Column::new("WS".into(), wind.clone()),
        Column::new("WSgust".into(), wind),
        Column::new("Precipitation".into(), vec![Some(0.0); rows]),
    ])
    .expect("frame");
    SolarDataset::new(country, frame)
}

fn bench_clean(c: &mut Criterion) {
    let mut group = c.benchmark_group("clean");
    let config = CleaningConfig::default();

    for rows in [1_440, 14_400, 144_000] {
        let dataset = station("benin", rows, 1.0);
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &dataset, |b, dataset| {
            b.iter(|| clean(black_box(dataset), &config).expect("clean"));
        });
    }

    group.finish();
}

fn bench_compare(c: &mut Criterion) {
    let config = CleaningConfig::default();
    let cleaned: Vec<SolarDataset> = [("benin", 1.1), ("sierraleone", 0.8), ("togo", 1.0)]
        .into_iter()
        .map(|(country, scale)| {
            clean(&station(country, 14_400, scale), &config)
                .expect("clean")
                .0
        })
        .collect();

    c.bench_function("compare_ghi", |b| {
        b.iter(|| compare(black_box(&cleaned), "GHI", &ComparisonConfig::default()).expect("compare"));
    });
}

criterion_group!(benches, bench_clean, bench_compare);
criterion_main!(benches);
