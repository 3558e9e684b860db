//! Time and weather features derived from raw columns.
//!
//! Hour, Month and HasRain are pure functions of Timestamp and
//! Precipitation. The cleaner appends them; the profiler derives Hour and
//! Month on the fly when grouping a table that has not been cleaned yet.

use crate::columns::float_column;
use crate::constants::{HAS_RAIN, HOUR, MONTH, TIMESTAMP, TIMESTAMP_FORMATS};
use crate::error::Result;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};
use polars::prelude::*;

/// Parse a loader timestamp token; anything unrecognised is missing
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Build a millisecond-resolution Datetime series
pub fn timestamp_series(name: &str, values: &[Option<NaiveDateTime>]) -> Result<Series> {
    let millis: Vec<Option<i64>> = values
        .iter()
        .map(|value| value.map(|ts| ts.and_utc().timestamp_millis()))
        .collect();
    let series = Series::new(name.into(), millis)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
    Ok(series)
}

/// Timestamps of every row, or `None` when the frame has no Timestamp column.
///
/// Datetime, Date and String columns are accepted; values that cannot be
/// interpreted are missing.
pub fn timestamps(frame: &DataFrame) -> Result<Option<Vec<Option<NaiveDateTime>>>> {
    let Ok(column) = frame.column(TIMESTAMP) else {
        return Ok(None);
    };

    let values: Vec<Option<NaiveDateTime>> = match column.dtype() {
        DataType::Datetime(unit, _) => {
            let unit = *unit;
            let physical = column.cast(&DataType::Int64)?;
            physical
                .i64()?
                .into_iter()
                .map(|value| value.and_then(|v| from_epoch(v, unit)))
                .collect()
        }
        DataType::Date => {
            let physical = column.cast(&DataType::Int32)?;
            let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0));
            physical
                .i32()?
                .into_iter()
                .map(|days| {
                    days.zip(epoch)
                        .and_then(|(days, epoch)| {
                            epoch.checked_add_signed(chrono::Duration::days(days as i64))
                        })
                })
                .collect()
        }
        DataType::String => column
            .str()?
            .into_iter()
            .map(|value| value.and_then(parse_timestamp))
            .collect(),
        _ => vec![None; frame.height()],
    };

    Ok(Some(values))
}

fn from_epoch(value: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let utc = match unit {
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(value)),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(value),
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(value),
    };
    utc.map(|ts| ts.naive_utc())
}

/// Clock hour (0-23) of every row
pub fn hours(frame: &DataFrame) -> Result<Option<Vec<Option<u32>>>> {
    Ok(timestamps(frame)?.map(|values| {
        values
            .into_iter()
            .map(|ts| ts.map(|ts| ts.hour()))
            .collect()
    }))
}

/// Calendar month (1-12) of every row
pub fn months(frame: &DataFrame) -> Result<Option<Vec<Option<u32>>>> {
    Ok(timestamps(frame)?.map(|values| {
        values
            .into_iter()
            .map(|ts| ts.map(|ts| ts.month()))
            .collect()
    }))
}

fn int_series(name: &str, values: Option<Vec<Option<u32>>>, height: usize) -> Series {
    let values: Vec<Option<i32>> = match values {
        Some(values) => values.into_iter().map(|v| v.map(|v| v as i32)).collect(),
        None => vec![None; height],
    };
    Series::new(name.into(), values)
}

/// Hour feature column; all missing when the frame has no timestamps
pub fn hour_series(frame: &DataFrame) -> Result<Series> {
    Ok(int_series(HOUR, hours(frame)?, frame.height()))
}

/// Month feature column; all missing when the frame has no timestamps
pub fn month_series(frame: &DataFrame) -> Result<Series> {
    Ok(int_series(MONTH, months(frame)?, frame.height()))
}

/// HasRain feature: precipitation strictly above zero, missing counts as dry.
///
/// Returns all-false when the precipitation column is absent.
pub fn has_rain_series(frame: &DataFrame, precipitation_column: &str) -> Result<Series> {
    let flags: Vec<bool> = if frame.column(precipitation_column).is_ok() {
        float_column(frame, precipitation_column)?
            .into_iter()
            .map(|value| value.is_some_and(|v| v > 0.0))
            .collect()
    } else {
        vec![false; frame.height()]
    };
    Ok(Series::new(HAS_RAIN.into(), flags))
}

/// Frame with Hour and Month columns, derived from Timestamp when absent
pub fn ensure_time_features(frame: &DataFrame) -> Result<DataFrame> {
    let mut out = frame.clone();
    if out.column(HOUR).is_err() {
        out.with_column(hour_series(frame)?)?;
    }
    if out.column(MONTH).is_err() {
        out.with_column(month_series(frame)?)?;
    }
    Ok(out)
}
