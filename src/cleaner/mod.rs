//! Cleaning pipeline for one country's sensor table.
//!
//! `clean` runs five steps in a fixed order, each a pure function of its
//! input frame:
//!
//! 1. drop columns whose null fraction reaches the configured threshold
//! 2. clamp negative night-time irradiance to zero
//! 3. remove rows with a monitored |z-score| above the threshold
//! 4. fill remaining gaps with the post-outlier column median
//! 5. derive Hour, Month and HasRain
//!
//! Imputation runs after outlier removal so the medians are not pulled by
//! the rows that were removed.

pub mod derive;
pub mod drop_null;
pub mod imputation;
pub mod night;
pub mod outliers;
pub mod report;

#[cfg(test)]
mod tests;

pub use derive::derive_features;
pub use drop_null::drop_fully_null_columns;
pub use imputation::impute_median;
pub use night::fix_night_irradiance;
pub use outliers::filter_outliers;
pub use report::{CleaningReport, CleaningStep, CleaningWarning, OutlierSummary, StepAudit};

use crate::config::CleaningConfig;
use crate::error::{Result, SolarError};
use crate::models::SolarDataset;
use polars::prelude::DataFrame;
use tracing::{debug, info, warn};

/// Frame produced by a single step with its audit entry
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub frame: DataFrame,
    pub audit: StepAudit,
    pub warnings: Vec<CleaningWarning>,
}

impl StepOutcome {
    fn finish(frame: DataFrame, mut audit: StepAudit, warnings: Vec<CleaningWarning>) -> Self {
        audit.rows_after = frame.height();
        Self {
            frame,
            audit,
            warnings,
        }
    }
}

/// Clean one country's raw table.
///
/// Fails only when a required column is missing or the configuration is
/// invalid. Configured columns that are absent are skipped with a warning in
/// the report.
pub fn clean(raw: &SolarDataset, config: &CleaningConfig) -> Result<(SolarDataset, CleaningReport)> {
    config.validate()?;
    check_required_columns(raw, config)?;

    info!(
        "Cleaning {} ({} rows, {} columns)",
        raw.country(),
        raw.height(),
        raw.frame().width()
    );
    let mut report = CleaningReport::new(raw.country(), raw.height());

    let dropped = drop_fully_null_columns(raw.frame(), config.missing_column_threshold)?;
    report.dropped_columns = dropped.audit.columns.clone();
    let frame = report.record(dropped);

    let night = fix_night_irradiance(&frame, &config.irradiance_columns, config.night_hours)?;
    report.night_values_clamped = night.audit.values_affected;
    let frame = report.record(night);

    let (filtered, outliers) = filter_outliers(
        &frame,
        &config.outlier_columns,
        config.outlier_z_threshold,
        config.outlier_max_passes,
    )?;
    report.outliers = outliers;
    let frame = report.record(filtered);

    let (imputed, medians) = impute_median(&frame, &config.imputation_columns)?;
    report.values_imputed = imputed.audit.values_affected;
    report.imputed_medians = medians;
    let frame = report.record(imputed);

    let derived = derive_features(&frame, &config.precipitation_column)?;
    let frame = report.record(derived);

    report.rows_out = frame.height();
    info!(
        "Cleaned {}: {} -> {} rows, {} warnings",
        raw.country(),
        report.rows_in,
        report.rows_out,
        report.warnings.len()
    );

    Ok((raw.with_frame(frame), report))
}

fn check_required_columns(raw: &SolarDataset, config: &CleaningConfig) -> Result<()> {
    match config
        .required_columns
        .iter()
        .find(|column| !raw.has_column(column))
    {
        Some(column) => Err(SolarError::Schema {
            country: raw.country().to_string(),
            column: column.clone(),
        }),
        None => Ok(()),
    }
}

impl CleaningReport {
    /// Append a step's audit and warnings, handing back its frame
    fn record(&mut self, outcome: StepOutcome) -> DataFrame {
        debug!(
            "{} [{}]: {} -> {} rows, {} values affected",
            self.country,
            outcome.audit.step,
            outcome.audit.rows_before,
            outcome.audit.rows_after,
            outcome.audit.values_affected
        );
        for warning in &outcome.warnings {
            warn!("{}: {}", self.country, warning);
        }
        self.steps.push(outcome.audit);
        self.warnings.extend(outcome.warnings);
        outcome.frame
    }
}
