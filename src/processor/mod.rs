//! Pipeline runner over a directory of country exports.
//!
//! Orchestrates the complete workflow: discover one raw file per country,
//! load, clean and profile each country concurrently on blocking tasks,
//! write the cleaned tables, then fan in all cleaned datasets for the
//! cross-country comparison of every configured metric.

pub mod discovery;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::{
    discovery::{CountryFile, FileDiscovery},
    writer::TableWriter,
};

use crate::cleaner::{CleaningReport, clean};
use crate::comparison::{ComparisonResult, compare};
use crate::config::PipelineConfig;
use crate::constants::{
    CLEAN_FILE_SUFFIX, CLEANING, DEFAULT_CORRELATION_COLUMNS, DEFAULT_DISTRIBUTION_COLUMNS,
    DEFAULT_MISSING_FLAG_THRESHOLD,
};
use crate::error::{Result, SolarError};
use crate::loader::load_csv;
use crate::models::{PipelineStats, SolarDataset};
use crate::profiler::{
    cleaning_impact, correlation_matrix, describe, diurnal_curve, dtype_summary, missing_frame,
    missing_table, monthly_facets, value_distribution_summary,
};

use colored::*;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tokio::fs;
use tokio::task;
use tracing::{debug, error, info, warn};

/// Name of the default output directory inside the input directory
const DEFAULT_OUTPUT_DIR: &str = "processed";

/// What processing one country produced
#[derive(Debug)]
struct CountryOutcome {
    cleaned: SolarDataset,
    report: CleaningReport,
}

/// Runs the load, clean, profile and compare pipeline
#[derive(Debug)]
pub struct PipelineRunner {
    input_path: PathBuf,
    output_path: PathBuf,
    config: PipelineConfig,
    file_discovery: FileDiscovery,
}

impl PipelineRunner {
    /// Create a runner; outputs default to `<input>/processed`
    pub fn new(input_path: PathBuf, output_path: Option<PathBuf>) -> Result<Self> {
        if !input_path.is_dir() {
            return Err(SolarError::DatasetNotFound { path: input_path });
        }
        let output_path = output_path.unwrap_or_else(|| input_path.join(DEFAULT_OUTPUT_DIR));

        Ok(Self {
            file_discovery: FileDiscovery::new(input_path.clone()),
            input_path,
            output_path,
            config: PipelineConfig::default(),
        })
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn output_path(&self) -> &PathBuf {
        &self.output_path
    }

    fn table_writer(&self) -> TableWriter {
        TableWriter::new(
            self.output_path.clone(),
            self.config.output_format,
            self.config.compression,
        )
    }

    /// Main processing entry point
    pub async fn run(&mut self) -> Result<PipelineStats> {
        let start_time = Instant::now();
        self.config.validate()?;

        println!("{}", "Starting solar dataset processing".bright_green().bold());
        println!("  {} {}", "Input:".bright_cyan(), self.input_path.display());
        println!("  {} {}", "Output:".bright_cyan(), self.output_path.display());

        // Step 1: Discover country files
        println!("\n{}", "Discovering country files...".bright_yellow());
        let files = self.file_discovery.discover_country_files().await?;
        println!(
            "  {} {} country files",
            "Found".bright_green(),
            files.len().to_string().bright_white().bold()
        );

        let mut stats = PipelineStats {
            output_path: self.output_path.clone(),
            ..Default::default()
        };
        if files.is_empty() {
            stats.processing_time_ms = start_time.elapsed().as_millis();
            return Ok(stats);
        }

        fs::create_dir_all(&self.output_path).await?;

        // Step 2: Clean and profile countries concurrently
        println!("\n{}", "Cleaning countries...".bright_yellow());
        let outcomes = self.process_countries(&files).await;

        let mut cleaned = Vec::new();
        for (file, outcome) in files.iter().zip(outcomes) {
            match outcome {
                Ok(outcome) => {
                    stats.countries_processed += 1;
                    stats.rows_in += outcome.report.rows_in;
                    stats.rows_out += outcome.report.rows_out;
                    cleaned.push(outcome.cleaned);
                }
                Err(e) => {
                    error!("Failed to process {}: {}", file.path.display(), e);
                    stats.countries_failed += 1;
                }
            }
        }

        // Step 3: Compare countries
        if cleaned.len() >= self.config.comparison.min_countries {
            println!("\n{}", "Comparing countries...".bright_yellow());
            stats.comparisons_written = self.compare_countries(cleaned).await?;
        } else {
            warn!(
                "Skipping comparison: {} cleaned countries, need {}",
                cleaned.len(),
                self.config.comparison.min_countries
            );
        }

        stats.processing_time_ms = start_time.elapsed().as_millis();
        print_summary(&stats);
        Ok(stats)
    }

    /// Process every country on a blocking task, keeping input order
    async fn process_countries(&self, files: &[CountryFile]) -> Vec<Result<CountryOutcome>> {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb.set_message("Cleaning");

        let concurrent_limit = self.config.max_concurrent_countries.clamp(1, files.len());
        debug!("Processing {} countries, {} at a time", files.len(), concurrent_limit);

        let mut results: Vec<(usize, Result<CountryOutcome>)> =
            stream::iter(files.iter().cloned().enumerate())
                .map(|(index, file)| {
                    let pb = pb.clone();
                    let writer = self.table_writer();
                    let config = self.config.clone();
                    async move {
                        pb.set_message(format!("Cleaning: {}", file.country));
                        let country = file.country.clone();
                        let result =
                            task::spawn_blocking(move || process_country(&file, &config, &writer))
                                .await
                                .map_err(|e| SolarError::ProcessingFailed {
                                    country,
                                    reason: format!("task failed to complete: {}", e),
                                })
                                .and_then(|result| result);
                        pb.inc(1);
                        (index, result)
                    }
                })
                .buffer_unordered(concurrent_limit)
                .collect()
                .await;

        pb.finish_with_message("Cleaning complete");
        results.sort_by_key(|(index, _)| *index);
        results.into_iter().map(|(_, result)| result).collect()
    }

    /// Compare every configured metric and write its tables
    async fn compare_countries(&self, cleaned: Vec<SolarDataset>) -> Result<usize> {
        let metrics = self.config.metrics.clone();
        let comparison = self.config.comparison.clone();
        let writer = self.table_writer();

        task::spawn_blocking(move || -> Result<usize> {
            let mut written = 0;
            for metric in &metrics {
                match compare(&cleaned, metric, &comparison) {
                    Ok(result) => {
                        write_comparison(&writer, &result)?;
                        print_ranking(&result);
                        written += 1;
                    }
                    Err(e) => warn!("Skipping comparison of {}: {}", metric, e),
                }
            }
            Ok(written)
        })
        .await
        .map_err(|e| SolarError::ProcessingFailed {
            country: "all".to_string(),
            reason: format!("comparison task failed to complete: {}", e),
        })?
    }
}

/// Load, clean and profile one country, writing its tables
fn process_country(
    file: &CountryFile,
    config: &PipelineConfig,
    writer: &TableWriter,
) -> Result<CountryOutcome> {
    let raw = load_csv(&file.path, &file.country)?;

    let (cleaned, report) = clean(&raw, &config.cleaning)?;
    if report.is_empty_result() {
        warn!("{}: no rows left after cleaning", file.country);
    }

    writer.write(
        cleaned.frame(),
        &format!("{}{}", file.country, CLEAN_FILE_SUFFIX),
    )?;
    if config.write_profiles {
        write_profiles(writer, &raw, &cleaned)?;
    }

    info!(
        "{}: {} -> {} rows, {} outliers removed, {} values imputed",
        file.country,
        report.rows_in,
        report.rows_out,
        report.outliers.rows_removed,
        report.values_imputed
    );
    Ok(CountryOutcome { cleaned, report })
}

fn owned(columns: &[&str]) -> Vec<String> {
    columns.iter().map(|c| c.to_string()).collect()
}

/// Write the quality tables of the raw export and the profiles of the
/// cleaned table
fn write_profiles(writer: &TableWriter, raw: &SolarDataset, cleaned: &SolarDataset) -> Result<()> {
    let country = cleaned.country();
    let name = |suffix: &str| format!("{}_{}", country, suffix);

    let missing = missing_table(raw.frame(), DEFAULT_MISSING_FLAG_THRESHOLD);
    for entry in missing.iter().filter(|entry| entry.flagged) {
        debug!(
            "{}: column {} is {:.1}% missing",
            country,
            entry.column,
            entry.fraction * 100.0
        );
    }
    writer.write(&missing_frame(&missing)?, &name("missing"))?;
    writer.write(&dtype_summary(raw.frame()).to_frame()?, &name("dtypes"))?;

    let distribution_columns = owned(DEFAULT_DISTRIBUTION_COLUMNS);
    for (dataset, suffix) in [(raw, "distribution_raw"), (cleaned, "distribution_clean")] {
        let summary = value_distribution_summary(dataset.frame(), &distribution_columns)?;
        writer.write(&summary.to_frame()?, &name(suffix))?;
    }

    writer.write(&describe(cleaned.frame())?.to_frame()?, &name("describe"))?;
    writer.write(&diurnal_curve(cleaned.frame())?, &name("diurnal"))?;
    writer.write(&monthly_facets(cleaned.frame())?, &name("monthly"))?;

    if cleaned.has_column(CLEANING) {
        writer.write(&cleaning_impact(cleaned.frame())?, &name("cleaning_impact"))?;
    } else {
        warn!("{}: no {} column, skipping cleaning impact", country, CLEANING);
    }

    let correlations = correlation_matrix(cleaned.frame(), &owned(DEFAULT_CORRELATION_COLUMNS))?;
    if !correlations.columns.is_empty() {
        writer.write(&correlations.to_frame()?, &name("correlation"))?;
    }
    Ok(())
}

/// Write the summary, ranking, tests and values tables of one metric
fn write_comparison(writer: &TableWriter, result: &ComparisonResult) -> Result<()> {
    let prefix = format!("comparison_{}", result.metric);
    writer.write(&result.summary_frame()?, &format!("{}_summary", prefix))?;
    writer.write(&result.ranking_frame()?, &format!("{}_ranking", prefix))?;
    writer.write(&result.tests_frame()?, &format!("{}_tests", prefix))?;
    writer.write(&result.values_frame()?, &format!("{}_values", prefix))?;
    Ok(())
}

fn print_ranking(result: &ComparisonResult) {
    println!("  {} {}", "Metric:".bright_cyan(), result.metric.bright_white().bold());
    for entry in &result.ranking {
        let value = entry
            .value
            .map(|v| format!("{:.2}", v))
            .unwrap_or_else(|| "n/a".to_string());
        println!("    {}. {} ({})", entry.rank, entry.country, value);
    }
    let verdict = if result.anova.is_significant(result.significance_level) {
        "significant".bright_green()
    } else {
        "not significant".bright_yellow()
    };
    println!(
        "    ANOVA F={:.3} p={:.4} ({})",
        result.anova.statistic, result.anova.p_value, verdict
    );
}

fn print_summary(stats: &PipelineStats) {
    println!("\n{}", "Processing Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time_ms.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Countries processed:".bright_cyan(),
        stats.countries_processed.to_string().bright_white()
    );
    if stats.countries_failed > 0 {
        println!(
            "  {} {}",
            "Countries failed:".bright_red(),
            stats.countries_failed.to_string().bright_red().bold()
        );
    }
    println!(
        "  {} {} -> {}",
        "Rows:".bright_cyan(),
        stats.rows_in.to_string().bright_white(),
        stats.rows_out.to_string().bright_white().bold()
    );
    println!(
        "  {} {}",
        "Metrics compared:".bright_cyan(),
        stats.comparisons_written.to_string().bright_white()
    );
}
