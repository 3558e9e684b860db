use super::{CleaningStep, CleaningWarning, StepAudit, StepOutcome};
use crate::constants::{HAS_RAIN, HOUR, MONTH, TIMESTAMP};
use crate::error::Result;
use crate::features::{has_rain_series, hour_series, month_series};
use polars::prelude::*;

/// Append Hour, Month and HasRain.
///
/// Without a Timestamp column Hour and Month are all missing; without the
/// precipitation column HasRain is all false. Both cases add a warning.
pub fn derive_features(frame: &DataFrame, precipitation_column: &str) -> Result<StepOutcome> {
    let step = CleaningStep::DeriveFeatures;
    let mut audit = StepAudit::new(step, frame.height());
    let mut warnings = Vec::new();

    for column in [TIMESTAMP, precipitation_column] {
        if frame.column(column).is_err() {
            warnings.push(CleaningWarning::MissingColumn {
                step,
                column: column.to_string(),
            });
        }
    }

    let mut out = frame.clone();
    out.with_column(hour_series(frame)?)?;
    out.with_column(month_series(frame)?)?;
    out.with_column(has_rain_series(frame, precipitation_column)?)?;

    audit.columns = vec![HOUR.to_string(), MONTH.to_string(), HAS_RAIN.to_string()];
    audit.values_affected = audit.columns.len() * frame.height();
    Ok(StepOutcome::finish(out, audit, warnings))
}
