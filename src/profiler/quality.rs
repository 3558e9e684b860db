//! Data quality summaries: missing values, column types and value signs.

use crate::columns::float_column;
use crate::error::Result;
use crate::models::ValueKind;
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

/// Missing values of one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingEntry {
    pub column: String,
    pub missing: usize,
    pub fraction: f64,
    /// Fraction is above the flag threshold
    pub flagged: bool,
}

/// Missing count and fraction per column, most incomplete first.
///
/// Columns whose fraction exceeds `threshold` are flagged. Ties keep schema
/// order. An empty frame reports a fraction of zero everywhere.
pub fn missing_table(frame: &DataFrame, threshold: f64) -> Vec<MissingEntry> {
    let rows = frame.height();
    let mut entries: Vec<MissingEntry> = frame
        .get_columns()
        .iter()
        .map(|column| {
            let missing = column.null_count();
            let fraction = if rows == 0 {
                0.0
            } else {
                missing as f64 / rows as f64
            };
            MissingEntry {
                column: column.name().to_string(),
                missing,
                fraction,
                flagged: fraction > threshold,
            }
        })
        .collect();

    entries.sort_by(|a, b| b.fraction.total_cmp(&a.fraction));
    entries
}

/// Missing table as a frame: column, missing, fraction, flagged
pub fn missing_frame(entries: &[MissingEntry]) -> Result<DataFrame> {
    let frame = DataFrame::new(vec![
        Column::new(
            "column".into(),
            entries.iter().map(|e| e.column.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            "missing".into(),
            entries.iter().map(|e| e.missing as u64).collect::<Vec<_>>(),
        ),
        Column::new(
            "fraction".into(),
            entries.iter().map(|e| e.fraction).collect::<Vec<_>>(),
        ),
        Column::new(
            "flagged".into(),
            entries.iter().map(|e| e.flagged).collect::<Vec<_>>(),
        ),
    ])?;
    Ok(frame)
}

/// Type of one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnType {
    pub column: String,
    pub dtype: String,
    pub kind: ValueKind,
    pub non_null: usize,
    pub missing: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DtypeSummary {
    /// Number of columns of each kind
    pub kinds: BTreeMap<ValueKind, usize>,
    pub columns: Vec<ColumnType>,
}

impl DtypeSummary {
    /// One row per column: column, dtype, kind, non_null, missing
    pub fn to_frame(&self) -> Result<DataFrame> {
        let columns = &self.columns;
        let frame = DataFrame::new(vec![
            Column::new(
                "column".into(),
                columns.iter().map(|c| c.column.as_str()).collect::<Vec<_>>(),
            ),
            Column::new(
                "dtype".into(),
                columns.iter().map(|c| c.dtype.as_str()).collect::<Vec<_>>(),
            ),
            Column::new(
                "kind".into(),
                columns.iter().map(|c| c.kind.to_string()).collect::<Vec<_>>(),
            ),
            Column::new(
                "non_null".into(),
                columns.iter().map(|c| c.non_null as u64).collect::<Vec<_>>(),
            ),
            Column::new(
                "missing".into(),
                columns.iter().map(|c| c.missing as u64).collect::<Vec<_>>(),
            ),
        ])?;
        Ok(frame)
    }
}

pub fn dtype_summary(frame: &DataFrame) -> DtypeSummary {
    let mut kinds = BTreeMap::new();
    let columns = frame
        .get_columns()
        .iter()
        .map(|column| {
            let kind = ValueKind::of(column.dtype());
            *kinds.entry(kind).or_insert(0) += 1;
            let missing = column.null_count();
            ColumnType {
                column: column.name().to_string(),
                dtype: column.dtype().to_string(),
                kind,
                non_null: column.len() - missing,
                missing,
            }
        })
        .collect();

    DtypeSummary { kinds, columns }
}

/// Sign breakdown of one numeric column
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValueDistribution {
    pub column: String,
    pub negative: usize,
    pub zero: usize,
    pub positive: usize,
    /// Null or NaN
    pub missing: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DistributionSummary {
    pub columns: Vec<ValueDistribution>,
    /// Requested columns not present in the frame
    pub skipped: Vec<String>,
}

impl DistributionSummary {
    /// One row per present column: column, negative, zero, positive, missing
    pub fn to_frame(&self) -> Result<DataFrame> {
        let count = |f: fn(&ValueDistribution) -> usize| -> Vec<u64> {
            self.columns.iter().map(|c| f(c) as u64).collect()
        };
        let names: Vec<&str> = self.columns.iter().map(|c| c.column.as_str()).collect();

        let frame = DataFrame::new(vec![
            Column::new("column".into(), names),
            Column::new("negative".into(), count(|c| c.negative)),
            Column::new("zero".into(), count(|c| c.zero)),
            Column::new("positive".into(), count(|c| c.positive)),
            Column::new("missing".into(), count(|c| c.missing)),
        ])?;
        Ok(frame)
    }
}

/// Count negative, zero, positive and missing values of each column
pub fn value_distribution_summary(
    frame: &DataFrame,
    columns: &[String],
) -> Result<DistributionSummary> {
    let mut summary = DistributionSummary::default();

    for column in columns {
        if frame.column(column).is_err() {
            summary.skipped.push(column.clone());
            continue;
        }

        let mut counts = ValueDistribution {
            column: column.clone(),
            ..Default::default()
        };
        for value in &float_column(frame, column)? {
            match value {
                Some(v) if v < 0.0 => counts.negative += 1,
                Some(v) if v == 0.0 => counts.zero += 1,
                Some(v) if v > 0.0 => counts.positive += 1,
                _ => counts.missing += 1,
            }
        }
        summary.columns.push(counts);
    }

    Ok(summary)
}
