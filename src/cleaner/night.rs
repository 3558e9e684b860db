use super::{CleaningStep, CleaningWarning, StepAudit, StepOutcome};
use crate::columns::{float_column, float_series};
use crate::config::NightWindow;
use crate::constants::TIMESTAMP;
use crate::error::Result;
use crate::features::hours;
use polars::prelude::*;

/// Clamp negative irradiance readings to zero inside the night window.
///
/// Daytime values, missing values and non-negative values are untouched.
/// Rows whose timestamp is missing are treated as daytime.
pub fn fix_night_irradiance(
    frame: &DataFrame,
    columns: &[String],
    window: NightWindow,
) -> Result<StepOutcome> {
    let step = CleaningStep::FixNightIrradiance;
    let mut audit = StepAudit::new(step, frame.height());
    let mut warnings = Vec::new();

    let Some(hours) = hours(frame)? else {
        warnings.push(CleaningWarning::MissingColumn {
            step,
            column: TIMESTAMP.to_string(),
        });
        return Ok(StepOutcome::finish(frame.clone(), audit, warnings));
    };
    let at_night: Vec<bool> = hours
        .iter()
        .map(|hour| hour.is_some_and(|h| window.contains(h)))
        .collect();

    let mut out = frame.clone();
    for column in columns {
        if frame.column(column).is_err() {
            warnings.push(CleaningWarning::MissingColumn {
                step,
                column: column.clone(),
            });
            continue;
        }

        let mut clamped = 0;
        let fixed: Vec<Option<f64>> = float_column(frame, column)?
            .into_iter()
            .zip(&at_night)
            .map(|(value, &night)| match value {
                Some(v) if night && v < 0.0 => {
                    clamped += 1;
                    Some(0.0)
                }
                other => other,
            })
            .collect();

        if clamped > 0 {
            out.with_column(float_series(column, fixed))?;
            audit.columns.push(column.clone());
            audit.values_affected += clamped;
        }
    }

    Ok(StepOutcome::finish(out, audit, warnings))
}
