//! Tests for the comparison engine

pub mod exports;

use crate::models::SolarDataset;
use polars::prelude::*;

/// Dataset with a single metric column
pub fn dataset(country: &str, metric: &str, values: &[Option<f64>]) -> SolarDataset {
    let frame = DataFrame::new(vec![Column::new(metric.into(), values.to_vec())]).unwrap();
    SolarDataset::new(country, frame)
}

pub fn constant(country: &str, value: f64, count: usize) -> SolarDataset {
    dataset(country, "GHI", &vec![Some(value); count])
}
