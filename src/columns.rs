//! Typed access to frame columns.

use crate::error::Result;
use polars::prelude::*;

/// Read a column as `Float64`, casting non-float columns.
///
/// The cast is non-strict, so unparseable strings come back as nulls.
pub fn float_column(frame: &DataFrame, name: &str) -> Result<Float64Chunked> {
    let column = frame.column(name)?;
    let casted = column.cast(&DataType::Float64)?;
    Ok(casted.f64()?.clone())
}

/// Non-missing, non-NaN values of a numeric column, in row order
pub fn present_values(frame: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let values = float_column(frame, name)?;
    Ok(values.into_iter().flatten().filter(|v| !v.is_nan()).collect())
}

/// Build a nullable Float64 series
pub fn float_series(name: &str, values: Vec<Option<f64>>) -> Series {
    Series::new(name.into(), values)
}

/// Names of numeric columns, excluding the given keys
pub fn numeric_column_names(frame: &DataFrame, exclude: &[&str]) -> Vec<String> {
    frame
        .get_columns()
        .iter()
        .filter(|column| {
            let dtype = column.dtype();
            dtype.is_float() || dtype.is_integer()
        })
        .map(|column| column.name().to_string())
        .filter(|name| !exclude.contains(&name.as_str()))
        .collect()
}
