use super::{CleaningStep, CleaningWarning, StepAudit, StepOutcome};
use crate::columns::{float_column, float_series};
use crate::error::Result;
use crate::stats;
use polars::prelude::*;
use std::collections::BTreeMap;

/// Fill missing values of each column with that column's median.
///
/// The median is taken over the frame as given, so callers run this after
/// outlier removal. Returns the median of every targeted column that has
/// values, whether or not it needed filling. A column with no values at all
/// is left as is and reported.
pub fn impute_median(
    frame: &DataFrame,
    columns: &[String],
) -> Result<(StepOutcome, BTreeMap<String, f64>)> {
    let step = CleaningStep::ImputeMedian;
    let mut audit = StepAudit::new(step, frame.height());
    let mut warnings = Vec::new();
    let mut medians = BTreeMap::new();
    let mut out = frame.clone();

    for column in columns {
        if frame.column(column).is_err() {
            warnings.push(CleaningWarning::MissingColumn {
                step,
                column: column.clone(),
            });
            continue;
        }

        let values = float_column(frame, column)?;
        let present: Vec<f64> = (&values)
            .into_iter()
            .flatten()
            .filter(|v| !v.is_nan())
            .collect();
        let Some(median) = stats::median(&present) else {
            if frame.height() > 0 {
                warnings.push(CleaningWarning::NoImputationValue {
                    column: column.clone(),
                });
            }
            continue;
        };
        medians.insert(column.clone(), median);

        let missing = values.null_count();
        if missing == 0 {
            continue;
        }
        let filled: Vec<Option<f64>> = values
            .into_iter()
            .map(|value| Some(value.unwrap_or(median)))
            .collect();
        out.with_column(float_series(column, filled))?;
        audit.columns.push(column.clone());
        audit.values_affected += missing;
    }

    Ok((StepOutcome::finish(out, audit, warnings), medians))
}
