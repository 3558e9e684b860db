use super::{CleaningStep, StepAudit, StepOutcome};
use crate::error::Result;
use polars::prelude::*;

/// Drop columns whose null fraction is at or above `threshold`.
///
/// With the default threshold of 1.0 only entirely empty columns go. A frame
/// with no rows drops nothing. Applying the step twice changes nothing the
/// second time.
pub fn drop_fully_null_columns(frame: &DataFrame, threshold: f64) -> Result<StepOutcome> {
    let rows = frame.height();
    let mut audit = StepAudit::new(CleaningStep::DropFullyNullColumns, rows);

    if rows == 0 {
        return Ok(StepOutcome::finish(frame.clone(), audit, Vec::new()));
    }

    let (dropped, kept): (Vec<&Column>, Vec<&Column>) = frame
        .get_columns()
        .iter()
        .partition(|column| column.null_count() as f64 / rows as f64 >= threshold);

    if dropped.is_empty() {
        return Ok(StepOutcome::finish(frame.clone(), audit, Vec::new()));
    }

    let out = frame.select(kept.iter().map(|column| column.name().clone()))?;
    audit.columns = dropped.iter().map(|column| column.name().to_string()).collect();
    audit.values_affected = dropped.len() * rows;

    Ok(StepOutcome::finish(out, audit, Vec::new()))
}
