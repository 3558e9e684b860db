//! Error handling for solar dataset processing.
//!
//! Structural problems (missing required columns, too few countries to
//! compare) are errors. Per-value problems are never errors: malformed values
//! become missing and per-step issues are recorded as warnings on the
//! cleaning report instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolarError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Schema error in dataset {country}: required column '{column}' is missing")]
    Schema { country: String, column: String },

    #[error("Invalid comparison input: {reason}")]
    ComparisonInput { reason: String },

    #[error("Dataset not found at path: {path}")]
    DatasetNotFound { path: PathBuf },

    #[error("Invalid input file: {path} - {reason}")]
    InvalidFormat { path: PathBuf, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Statistics error: {message}")]
    Statistics { message: String },

    #[error("Processing failed for dataset {country}: {reason}")]
    ProcessingFailed { country: String, reason: String },
}

impl SolarError {
    pub fn comparison_input(reason: impl Into<String>) -> Self {
        Self::ComparisonInput {
            reason: reason.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn statistics(message: impl std::fmt::Display) -> Self {
        Self::Statistics {
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SolarError>;
