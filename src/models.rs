//! Core data structures shared by the cleaner, profiler and comparison engine.

use polars::prelude::{DataFrame, DataType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One country's sensor table.
///
/// Rows are in timestamp order. Transforms never mutate a dataset; they
/// return a new one carrying the same country tag.
#[derive(Debug, Clone)]
pub struct SolarDataset {
    country: String,
    frame: DataFrame,
}

impl SolarDataset {
    pub fn new(country: impl Into<String>, frame: DataFrame) -> Self {
        Self {
            country: country.into(),
            frame,
        }
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Same country, new table
    pub fn with_frame(&self, frame: DataFrame) -> Self {
        Self {
            country: self.country.clone(),
            frame,
        }
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.column(name).is_ok()
    }

    pub fn column_names(&self) -> Vec<String> {
        column_names(&self.frame)
    }
}

/// Column names of a frame in schema order
pub fn column_names(frame: &DataFrame) -> Vec<String> {
    frame
        .get_columns()
        .iter()
        .map(|column| column.name().to_string())
        .collect()
}

/// Coarse kind of a column's values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ValueKind {
    Numeric,
    Boolean,
    Categorical,
    Temporal,
}

impl ValueKind {
    pub fn of(dtype: &DataType) -> Self {
        if dtype.is_bool() {
            ValueKind::Boolean
        } else if dtype.is_float() || dtype.is_integer() {
            ValueKind::Numeric
        } else if dtype.is_temporal() {
            ValueKind::Temporal
        } else {
            ValueKind::Categorical
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Numeric => "numeric",
            ValueKind::Boolean => "boolean",
            ValueKind::Categorical => "categorical",
            ValueKind::Temporal => "temporal",
        };
        f.write_str(name)
    }
}

/// Statistics reported at the end of a pipeline run
#[derive(Debug, Default)]
pub struct PipelineStats {
    pub countries_processed: usize,
    pub countries_failed: usize,
    pub rows_in: usize,
    pub rows_out: usize,
    pub comparisons_written: usize,
    pub output_path: PathBuf,
    pub processing_time_ms: u128,
}
