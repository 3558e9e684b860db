//! CSV loading at the pipeline boundary.
//!
//! The loader is the only place where raw text is interpreted. It conforms a
//! file to the fixed sensor schema: numeric columns become `Float64`,
//! `Cleaning` becomes `Boolean`, `Timestamp` becomes a millisecond
//! `Datetime`, and rows are sorted by time. Tokens that cannot be read are
//! missing values, never errors.

use crate::columns::float_column;
use crate::constants::{
    CLEANING, COMMENTS, NUMERIC_COLUMNS, OPTIONAL_NUMERIC_COLUMNS, TIMESTAMP,
};
use crate::error::{Result, SolarError};
use crate::features::{timestamp_series, timestamps};
use crate::models::SolarDataset;
use polars::prelude::*;
use std::path::Path;
use tracing::debug;

const INFER_SCHEMA_ROWS: usize = 10_000;

/// Load one country's CSV export
pub fn load_csv(path: &Path, country: &str) -> Result<SolarDataset> {
    if !path.exists() {
        return Err(SolarError::DatasetNotFound {
            path: path.to_path_buf(),
        });
    }

    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_ignore_errors(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
        .map_err(|e| SolarError::InvalidFormat {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    debug!(
        "Read {} rows x {} columns from {}",
        frame.height(),
        frame.width(),
        path.display()
    );

    let frame = conform_schema(&frame)?;
    let frame = sort_by_timestamp(frame)?;
    Ok(SolarDataset::new(country, frame))
}

/// Cast known columns to their schema types, leaving unknown columns as read
pub fn conform_schema(frame: &DataFrame) -> Result<DataFrame> {
    let mut out = frame.clone();

    for name in NUMERIC_COLUMNS.iter().chain(OPTIONAL_NUMERIC_COLUMNS) {
        if frame.column(name).is_ok() {
            out.with_column(float_column(frame, name)?.into_series())?;
        }
    }

    if frame.column(CLEANING).is_ok() {
        let flags: Vec<Option<bool>> = float_column(frame, CLEANING)?
            .into_iter()
            .map(|value| value.map(|v| v != 0.0))
            .collect();
        out.with_column(Series::new(CLEANING.into(), flags))?;
    }

    if let Some(values) = timestamps(frame)? {
        out.with_column(timestamp_series(TIMESTAMP, &values)?)?;
    }

    if let Ok(comments) = frame.column(COMMENTS) {
        let comments = comments.cast(&DataType::String)?;
        out.with_column(comments)?;
    }

    Ok(out)
}

/// Stable sort by Timestamp with missing timestamps last
pub fn sort_by_timestamp(frame: DataFrame) -> Result<DataFrame> {
    if frame.column(TIMESTAMP).is_err() {
        return Ok(frame);
    }
    let sorted = frame
        .lazy()
        .sort_by_exprs(
            [col(TIMESTAMP)],
            SortMultipleOptions::default()
                .with_maintain_order(true)
                .with_nulls_last(true),
        )
        .collect()?;
    Ok(sorted)
}
