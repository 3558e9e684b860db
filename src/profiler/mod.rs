//! Read-only profiling of sensor tables.
//!
//! Every function here takes a frame by reference and returns plain structs
//! or new frames; nothing is mutated. The same functions run on raw tables
//! (quality checks before cleaning) and on cleaned ones.

pub mod describe;
pub mod grouping;
pub mod quality;

pub use describe::{
    ColumnSummary, CorrelationMatrix, Description, TimeCoverage, correlation_matrix, describe,
};
pub use grouping::{cleaning_impact, diurnal_curve, monthly_facets};
pub use quality::{
    ColumnType, DistributionSummary, DtypeSummary, MissingEntry, ValueDistribution, dtype_summary,
    missing_frame, missing_table, value_distribution_summary,
};
