//! Solar Potential Library
//!
//! Cleans, profiles and compares solar irradiance sensor datasets, one table
//! per country.
//!
//! This library provides tools for:
//! - Loading station CSV exports into typed polars frames
//! - Cleaning: dropping empty columns, fixing night-time irradiance,
//!   removing z-score outliers, median imputation and time features
//! - Profiling: missing values, value distributions, diurnal and monthly
//!   aggregates, correlations
//! - Comparing a metric across countries with summary statistics, one-way
//!   ANOVA, Kruskal-Wallis and a ranking
//! - Running the whole pipeline concurrently over a directory of exports

pub mod cleaner;
pub mod cli;
pub mod columns;
pub mod comparison;
pub mod config;
pub mod constants;
pub mod error;
pub mod features;
pub mod loader;
pub mod models;
pub mod processor;
pub mod profiler;
pub mod stats;

pub use cleaner::{CleaningReport, CleaningWarning, clean};
pub use comparison::{ComparisonResult, compare, compare_all};
pub use config::{CleaningConfig, ComparisonConfig, NightWindow, PipelineConfig, RankOrder};
pub use error::{Result, SolarError};
pub use loader::load_csv;
pub use models::SolarDataset;
pub use processor::PipelineRunner;
