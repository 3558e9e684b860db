use super::{CleaningStep, CleaningWarning, OutlierSummary, StepAudit, StepOutcome};
use crate::columns::float_column;
use crate::error::Result;
use crate::stats;
use polars::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;

/// Remove rows where any monitored column has |z| above `threshold`.
///
/// z-scores use the column mean and population standard deviation over the
/// present values; missing values never flag a row. A column with zero or
/// undefined spread flags nothing. Each pass recomputes the statistics on the
/// rows the previous pass kept; filtering stops after `max_passes` passes or
/// at the first pass that removes nothing. Row order is preserved.
pub fn filter_outliers(
    frame: &DataFrame,
    columns: &[String],
    threshold: f64,
    max_passes: usize,
) -> Result<(StepOutcome, OutlierSummary)> {
    let step = CleaningStep::FilterOutliers;
    let mut audit = StepAudit::new(step, frame.height());
    let mut warnings = Vec::new();

    let mut monitored = Vec::new();
    for column in columns {
        if frame.column(column).is_ok() {
            monitored.push(column.as_str());
        } else {
            warnings.push(CleaningWarning::MissingColumn {
                step,
                column: column.clone(),
            });
        }
    }

    let mut summary = OutlierSummary::default();
    let mut current = frame.clone();
    while current.height() > 0 && summary.passes < max_passes {
        let (keep, flagged) = outlier_mask(&current, &monitored, threshold)?;
        summary.passes += 1;
        for (column, count) in flagged {
            *summary.flagged_by_column.entry(column).or_default() += count;
        }

        let removed = keep.iter().filter(|kept| !**kept).count();
        if removed == 0 {
            break;
        }
        debug!("Outlier pass {} removed {} rows", summary.passes, removed);
        current = current.filter(&BooleanChunked::from_slice("keep".into(), &keep))?;
        summary.rows_removed += removed;
    }

    if current.height() == 0 {
        warnings.push(CleaningWarning::EmptyDataset { step });
    }

    audit.values_affected = summary.rows_removed;
    audit.columns = monitored.iter().map(|c| c.to_string()).collect();
    Ok((StepOutcome::finish(current, audit, warnings), summary))
}

/// Rows to keep plus the number of rows each column flagged in one pass
pub fn outlier_mask(
    frame: &DataFrame,
    columns: &[&str],
    threshold: f64,
) -> Result<(Vec<bool>, BTreeMap<String, usize>)> {
    let mut keep = vec![true; frame.height()];
    let mut flagged = BTreeMap::new();

    for &column in columns {
        let values = float_column(frame, column)?;
        let present: Vec<f64> = (&values)
            .into_iter()
            .flatten()
            .filter(|v| !v.is_nan())
            .collect();
        let (Some(mean), Some(std)) = (stats::mean(&present), stats::population_std(&present))
        else {
            continue;
        };
        if !(std.is_finite() && std > 0.0) {
            continue;
        }

        let mut count = 0;
        for (row, value) in values.into_iter().enumerate() {
            if value.is_some_and(|v| ((v - mean) / std).abs() > threshold) {
                keep[row] = false;
                count += 1;
            }
        }
        if count > 0 {
            flagged.insert(column.to_string(), count);
        }
    }

    Ok((keep, flagged))
}
