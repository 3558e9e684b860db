//! Configuration management and validation.
//!
//! Every threshold and column list used by the cleaner and the comparison
//! engine lives here and is passed in explicitly; there are no process-wide
//! defaults beyond the `Default` impls.

use crate::constants::*;
use crate::error::{Result, SolarError};
use polars::prelude::ParquetCompression;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Clock-hour window treated as night, inclusive on both ends.
///
/// A window whose start is after its end wraps past midnight, so the default
/// `19..=5` covers 19:00 through 05:59.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightWindow {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl Default for NightWindow {
    fn default() -> Self {
        Self {
            start_hour: DEFAULT_NIGHT_START_HOUR,
            end_hour: DEFAULT_NIGHT_END_HOUR,
        }
    }
}

impl NightWindow {
    pub fn new(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }

    pub fn contains(&self, hour: u32) -> bool {
        if self.start_hour <= self.end_hour {
            (self.start_hour..=self.end_hour).contains(&hour)
        } else {
            hour >= self.start_hour || hour <= self.end_hour
        }
    }

    fn validate(&self) -> Result<()> {
        if self.start_hour > 23 || self.end_hour > 23 {
            return Err(SolarError::configuration(format!(
                "night window hours must be within 0-23, got {}..={}",
                self.start_hour, self.end_hour
            )));
        }
        Ok(())
    }
}

/// Configuration for the cleaning pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningConfig {
    /// Absolute z-score above which a row is an outlier
    pub outlier_z_threshold: f64,

    /// Upper bound on outlier passes; later passes rescore the kept rows
    pub outlier_max_passes: usize,

    /// Columns screened for outliers
    pub outlier_columns: Vec<String>,

    /// Columns whose remaining gaps are median-filled
    pub imputation_columns: Vec<String>,

    /// Hours during which negative irradiance is clamped to zero
    pub night_hours: NightWindow,

    /// Columns clamped during the night window
    pub irradiance_columns: Vec<String>,

    /// Null fraction at or above which a column is dropped
    pub missing_column_threshold: f64,

    /// Columns that must exist before any step runs
    pub required_columns: Vec<String>,

    /// Source column for the HasRain feature
    pub precipitation_column: String,
}

fn owned(columns: &[&str]) -> Vec<String> {
    columns.iter().map(|c| c.to_string()).collect()
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            outlier_z_threshold: DEFAULT_Z_THRESHOLD,
            outlier_max_passes: DEFAULT_OUTLIER_PASSES,
            outlier_columns: owned(DEFAULT_OUTLIER_COLUMNS),
            imputation_columns: owned(DEFAULT_IMPUTATION_COLUMNS),
            night_hours: NightWindow::default(),
            irradiance_columns: owned(IRRADIANCE_COLUMNS),
            missing_column_threshold: DEFAULT_MISSING_COLUMN_THRESHOLD,
            required_columns: owned(&[TIMESTAMP]),
            precipitation_column: PRECIPITATION.to_string(),
        }
    }
}

impl CleaningConfig {
    pub fn with_z_threshold(mut self, threshold: f64) -> Self {
        self.outlier_z_threshold = threshold;
        self
    }

    /// Repeat outlier filtering up to `passes` times; `usize::MAX` runs it
    /// to a fixed point
    pub fn with_outlier_passes(mut self, passes: usize) -> Self {
        self.outlier_max_passes = passes;
        self
    }

    pub fn with_outlier_columns(mut self, columns: Vec<String>) -> Self {
        self.outlier_columns = columns;
        self
    }

    pub fn with_imputation_columns(mut self, columns: Vec<String>) -> Self {
        self.imputation_columns = columns;
        self
    }

    pub fn with_night_hours(mut self, night_hours: NightWindow) -> Self {
        self.night_hours = night_hours;
        self
    }

    pub fn with_missing_column_threshold(mut self, threshold: f64) -> Self {
        self.missing_column_threshold = threshold;
        self
    }

    pub fn with_required_columns(mut self, columns: Vec<String>) -> Self {
        self.required_columns = columns;
        self
    }

    /// Reject values that would make a step meaningless
    pub fn validate(&self) -> Result<()> {
        if !self.outlier_z_threshold.is_finite() || self.outlier_z_threshold <= 0.0 {
            return Err(SolarError::configuration(format!(
                "outlier z threshold must be a positive number, got {}",
                self.outlier_z_threshold
            )));
        }
        if self.outlier_max_passes == 0 {
            return Err(SolarError::configuration(
                "outlier passes must be at least 1",
            ));
        }
        if !(self.missing_column_threshold > 0.0 && self.missing_column_threshold <= 1.0) {
            return Err(SolarError::configuration(format!(
                "missing column threshold must be within (0, 1], got {}",
                self.missing_column_threshold
            )));
        }
        self.night_hours.validate()?;
        debug!("Cleaning configuration validated: {:?}", self);
        Ok(())
    }
}

/// Direction of the country ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RankOrder {
    /// Highest mean first
    #[default]
    Descending,
    /// Lowest mean first
    Ascending,
}

/// Configuration for cross-country comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonConfig {
    /// Minimum number of distinct countries
    pub min_countries: usize,

    pub rank_order: RankOrder,

    /// Alpha used to mark a test result significant
    pub significance_level: f64,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            min_countries: MIN_COMPARISON_COUNTRIES,
            rank_order: RankOrder::Descending,
            significance_level: DEFAULT_SIGNIFICANCE_LEVEL,
        }
    }
}

impl ComparisonConfig {
    pub fn with_rank_order(mut self, rank_order: RankOrder) -> Self {
        self.rank_order = rank_order;
        self
    }

    pub fn with_significance_level(mut self, alpha: f64) -> Self {
        self.significance_level = alpha;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_countries < MIN_COMPARISON_COUNTRIES {
            return Err(SolarError::configuration(format!(
                "a comparison needs at least {} countries, configured {}",
                MIN_COMPARISON_COUNTRIES, self.min_countries
            )));
        }
        if !(self.significance_level > 0.0 && self.significance_level < 1.0) {
            return Err(SolarError::configuration(format!(
                "significance level must be within (0, 1), got {}",
                self.significance_level
            )));
        }
        Ok(())
    }
}

/// File format for written tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    Csv,
    Parquet,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Parquet => "parquet",
        }
    }
}

/// Supported compression algorithms for parquet files
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub enum CompressionAlgorithm {
    /// Snappy compression - good balance of speed and compression
    #[default]
    Snappy,
    /// ZSTD compression - better compression ratio, slower
    Zstd,
    /// LZ4 compression - fastest, lower compression ratio
    Lz4,
    /// No compression
    Uncompressed,
}

impl CompressionAlgorithm {
    /// Parse the CLI spelling of a compression algorithm
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "snappy" => Ok(Self::Snappy),
            "zstd" => Ok(Self::Zstd),
            "lz4" => Ok(Self::Lz4),
            "none" | "uncompressed" => Ok(Self::Uncompressed),
            other => Err(SolarError::configuration(format!(
                "unknown compression algorithm '{}'",
                other
            ))),
        }
    }

    /// Convert to polars ParquetCompression type
    pub fn to_polars_compression(&self) -> ParquetCompression {
        match self {
            CompressionAlgorithm::Snappy => ParquetCompression::Snappy,
            CompressionAlgorithm::Zstd => ParquetCompression::Zstd(None),
            CompressionAlgorithm::Lz4 => ParquetCompression::Lz4Raw,
            CompressionAlgorithm::Uncompressed => ParquetCompression::Uncompressed,
        }
    }
}

/// Global configuration for a pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub cleaning: CleaningConfig,

    pub comparison: ComparisonConfig,

    /// Metrics compared across countries
    pub metrics: Vec<String>,

    pub output_format: OutputFormat,

    pub compression: CompressionAlgorithm,

    /// Country datasets processed concurrently
    pub max_concurrent_countries: usize,

    /// Write per-country profile and quality tables
    pub write_profiles: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cleaning: CleaningConfig::default(),
            comparison: ComparisonConfig::default(),
            metrics: owned(DEFAULT_COMPARISON_METRICS),
            output_format: OutputFormat::Csv,
            compression: CompressionAlgorithm::Snappy,
            max_concurrent_countries: num_cpus::get(),
            write_profiles: true,
        }
    }
}

impl PipelineConfig {
    pub fn with_cleaning(mut self, cleaning: CleaningConfig) -> Self {
        self.cleaning = cleaning;
        self
    }

    pub fn with_comparison(mut self, comparison: ComparisonConfig) -> Self {
        self.comparison = comparison;
        self
    }

    pub fn with_metrics(mut self, metrics: Vec<String>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn with_max_concurrent_countries(mut self, max: usize) -> Self {
        self.max_concurrent_countries = max.max(1);
        self
    }

    pub fn without_profiles(mut self) -> Self {
        self.write_profiles = false;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.cleaning.validate()?;
        self.comparison.validate()?;
        if self.metrics.is_empty() {
            return Err(SolarError::configuration("no comparison metrics configured"));
        }
        Ok(())
    }
}
