//! Audit trail produced alongside every cleaned dataset.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// The five cleaning steps, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CleaningStep {
    DropFullyNullColumns,
    FixNightIrradiance,
    FilterOutliers,
    ImputeMedian,
    DeriveFeatures,
}

impl fmt::Display for CleaningStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CleaningStep::DropFullyNullColumns => "drop fully-null columns",
            CleaningStep::FixNightIrradiance => "fix night irradiance",
            CleaningStep::FilterOutliers => "filter outliers",
            CleaningStep::ImputeMedian => "impute median",
            CleaningStep::DeriveFeatures => "derive features",
        };
        f.write_str(name)
    }
}

/// Non-fatal conditions met while cleaning
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CleaningWarning {
    /// A configured column is absent; the step skipped it
    MissingColumn { step: CleaningStep, column: String },
    /// No rows are left after the step
    EmptyDataset { step: CleaningStep },
    /// A column had no values to take a median from
    NoImputationValue { column: String },
}

impl fmt::Display for CleaningWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleaningWarning::MissingColumn { step, column } => {
                write!(f, "{}: column '{}' not found, skipped", step, column)
            }
            CleaningWarning::EmptyDataset { step } => {
                write!(f, "{}: dataset is empty", step)
            }
            CleaningWarning::NoImputationValue { column } => {
                write!(f, "impute median: column '{}' has no values", column)
            }
        }
    }
}

/// What a single step did
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepAudit {
    pub step: CleaningStep,
    pub rows_before: usize,
    pub rows_after: usize,
    /// Cells changed (clamped, imputed, derived) or rows removed
    pub values_affected: usize,
    /// Columns the step touched
    pub columns: Vec<String>,
}

impl StepAudit {
    pub fn new(step: CleaningStep, rows_before: usize) -> Self {
        Self {
            step,
            rows_before,
            rows_after: rows_before,
            values_affected: 0,
            columns: Vec::new(),
        }
    }

    pub fn rows_removed(&self) -> usize {
        self.rows_before.saturating_sub(self.rows_after)
    }
}

/// Outcome of the outlier step
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutlierSummary {
    pub rows_removed: usize,
    /// Filter passes run until one removed nothing
    pub passes: usize,
    /// Rows flagged per monitored column, summed over passes
    pub flagged_by_column: BTreeMap<String, usize>,
}

/// Audit report for one `clean` run
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleaningReport {
    pub country: String,
    pub rows_in: usize,
    pub rows_out: usize,
    pub steps: Vec<StepAudit>,
    pub warnings: Vec<CleaningWarning>,
    pub dropped_columns: Vec<String>,
    pub night_values_clamped: usize,
    pub outliers: OutlierSummary,
    /// Median used to fill each imputed column
    pub imputed_medians: BTreeMap<String, f64>,
    pub values_imputed: usize,
}

impl CleaningReport {
    pub fn new(country: impl Into<String>, rows_in: usize) -> Self {
        Self {
            country: country.into(),
            rows_in,
            rows_out: rows_in,
            ..Default::default()
        }
    }

    pub fn step(&self, step: CleaningStep) -> Option<&StepAudit> {
        self.steps.iter().find(|audit| audit.step == step)
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn is_empty_result(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, CleaningWarning::EmptyDataset { .. }))
    }
}
