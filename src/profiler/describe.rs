//! Numeric overview and pairwise correlation.

use crate::columns::{float_column, numeric_column_names, present_values};
use crate::constants::{HOUR, MONTH};
use crate::error::Result;
use crate::features::timestamps;
use crate::stats;
use chrono::NaiveDateTime;
use polars::prelude::*;
use serde::Serialize;

/// Summary statistics of one numeric column over its present values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub median: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeCoverage {
    pub first: NaiveDateTime,
    pub last: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Description {
    pub rows: usize,
    pub columns: Vec<ColumnSummary>,
    /// Earliest and latest timestamp, when any are present
    pub coverage: Option<TimeCoverage>,
}

impl Description {
    pub fn column(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|summary| summary.column == name)
    }

    /// One row per column
    pub fn to_frame(&self) -> Result<DataFrame> {
        let pick = |f: fn(&ColumnSummary) -> Option<f64>| -> Vec<Option<f64>> {
            self.columns.iter().map(f).collect()
        };
        let names: Vec<&str> = self.columns.iter().map(|c| c.column.as_str()).collect();
        let counts: Vec<u64> = self.columns.iter().map(|c| c.count as u64).collect();

        let frame = DataFrame::new(vec![
            Column::new("column".into(), names),
            Column::new("count".into(), counts),
            Column::new("mean".into(), pick(|c| c.mean)),
            Column::new("std".into(), pick(|c| c.std)),
            Column::new("min".into(), pick(|c| c.min)),
            Column::new("median".into(), pick(|c| c.median)),
            Column::new("max".into(), pick(|c| c.max)),
        ])?;
        Ok(frame)
    }
}

/// Count, mean, std, min, median and max of every numeric column.
///
/// Derived Hour and Month columns are left out.
pub fn describe(frame: &DataFrame) -> Result<Description> {
    let mut columns = Vec::new();
    for name in numeric_column_names(frame, &[HOUR, MONTH]) {
        let values = present_values(frame, &name)?;
        columns.push(ColumnSummary {
            count: values.len(),
            mean: stats::mean(&values),
            std: stats::sample_std(&values),
            min: stats::min(&values),
            median: stats::median(&values),
            max: stats::max(&values),
            column: name,
        });
    }

    let coverage = timestamps(frame)?.and_then(|values| {
        let present: Vec<NaiveDateTime> = values.into_iter().flatten().collect();
        let first = present.iter().min()?;
        let last = present.iter().max()?;
        Some(TimeCoverage {
            first: *first,
            last: *last,
        })
    });

    Ok(Description {
        rows: frame.height(),
        columns,
        coverage,
    })
}

/// Symmetric Pearson correlation matrix
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major; `None` where fewer than two complete pairs exist or a
    /// column is constant
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }

    /// Square frame with a leading `column` name column
    pub fn to_frame(&self) -> Result<DataFrame> {
        let mut frame_columns = vec![Column::new("column".into(), self.columns.clone())];
        for (j, name) in self.columns.iter().enumerate() {
            let values: Vec<Option<f64>> = self.values.iter().map(|row| row[j]).collect();
            frame_columns.push(Column::new(name.as_str().into(), values));
        }
        Ok(DataFrame::new(frame_columns)?)
    }
}

/// Pairwise Pearson correlation using rows where both columns are present.
///
/// Columns absent from the frame are left out of the matrix.
pub fn correlation_matrix(frame: &DataFrame, columns: &[String]) -> Result<CorrelationMatrix> {
    let mut names = Vec::new();
    let mut series = Vec::new();
    for name in columns {
        if frame.column(name).is_ok() {
            let values: Vec<Option<f64>> = float_column(frame, name)?
                .into_iter()
                .map(|v| v.filter(|v| !v.is_nan()))
                .collect();
            names.push(name.clone());
            series.push(values);
        }
    }

    let values = series
        .iter()
        .map(|a| {
            series
                .iter()
                .map(|b| {
                    let (xs, ys): (Vec<f64>, Vec<f64>) = a
                        .iter()
                        .zip(b)
                        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
                        .unzip();
                    stats::pearson(&xs, &ys)
                })
                .collect()
        })
        .collect();

    Ok(CorrelationMatrix {
        columns: names,
        values,
    })
}
