//! Grouped aggregations: diurnal curve, monthly facets and cleaning impact.

use crate::columns::numeric_column_names;
use crate::constants::{CLEANING, HOUR, MOD_A, MOD_B, MONTH};
use crate::error::Result;
use crate::features::ensure_time_features;
use polars::prelude::*;

/// Row count column added by `cleaning_impact`
pub const COUNT: &str = "Count";

/// Mean of every numeric column per clock hour, ordered by hour.
///
/// Hour is derived from Timestamp when the frame has not been cleaned.
/// Hours without rows have no entry.
pub fn diurnal_curve(frame: &DataFrame) -> Result<DataFrame> {
    grouped_means(frame, HOUR)
}

/// Mean of every numeric column per calendar month, ordered by month
pub fn monthly_facets(frame: &DataFrame) -> Result<DataFrame> {
    grouped_means(frame, MONTH)
}

fn grouped_means(frame: &DataFrame, key: &str) -> Result<DataFrame> {
    let frame = ensure_time_features(frame)?;
    let aggregations: Vec<Expr> = numeric_column_names(&frame, &[HOUR, MONTH])
        .iter()
        .map(|name| col(name.as_str()).mean())
        .collect();

    let grouped = frame
        .lazy()
        .filter(col(key).is_not_null())
        .group_by([col(key)])
        .agg(aggregations)
        .sort_by_exprs([col(key)], SortMultipleOptions::default())
        .collect()?;
    Ok(grouped)
}

/// Mean ModA/ModB and row count for rows with and without a cleaning event
pub fn cleaning_impact(frame: &DataFrame) -> Result<DataFrame> {
    frame.column(CLEANING)?;

    let mut aggregations: Vec<Expr> = [MOD_A, MOD_B]
        .into_iter()
        .filter(|name| frame.column(name).is_ok())
        .map(|name| col(name).mean())
        .collect();
    aggregations.push(len().alias(COUNT));

    let grouped = frame
        .clone()
        .lazy()
        .group_by([col(CLEANING)])
        .agg(aggregations)
        .sort_by_exprs(
            [col(CLEANING)],
            SortMultipleOptions::default().with_nulls_last(true),
        )
        .collect()?;
    Ok(grouped)
}
