//! Basic processing integration tests

use super::{create_country_exports, write_station_csv};
use crate::config::{OutputFormat, PipelineConfig};
use crate::loader::load_csv;
use crate::processor::PipelineRunner;
use polars::prelude::*;
use std::fs;
use tempfile::TempDir;

fn quiet_config() -> PipelineConfig {
    PipelineConfig::default().with_max_concurrent_countries(2)
}

#[tokio::test]
async fn test_basic_processing_pipeline() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_country_exports(temp_dir.path());
    let output = temp_dir.path().join("output");

    let mut runner = PipelineRunner::new(input, Some(output.clone()))
        .unwrap()
        .with_config(quiet_config());
    let stats = runner.run().await.unwrap();

    assert_eq!(stats.countries_processed, 3);
    assert_eq!(stats.countries_failed, 0);
    assert_eq!(stats.rows_in, 3 * 72);
    assert_eq!(stats.rows_out, stats.rows_in);
    assert_eq!(stats.comparisons_written, 3);
    assert_eq!(stats.output_path, output);

    for country in ["benin", "sierraleone", "togo"] {
        for suffix in [
            "clean",
            "missing",
            "dtypes",
            "distribution_raw",
            "distribution_clean",
            "describe",
            "diurnal",
            "monthly",
            "cleaning_impact",
            "correlation",
        ] {
            let path = output.join(format!("{}_{}.csv", country, suffix));
            assert!(path.exists(), "missing {}", path.display());
        }
    }
    for metric in ["GHI", "DNI", "DHI"] {
        for table in ["summary", "ranking", "tests", "values"] {
            let path = output.join(format!("comparison_{}_{}.csv", metric, table));
            assert!(path.exists(), "missing {}", path.display());
        }
    }
}

#[tokio::test]
async fn test_cleaned_output_reloads() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_country_exports(temp_dir.path());
    let output = temp_dir.path().join("output");

    let mut runner = PipelineRunner::new(input, Some(output.clone()))
        .unwrap()
        .with_config(quiet_config());
    runner.run().await.unwrap();

    let cleaned = load_csv(&output.join("benin_clean.csv"), "benin").unwrap();
    assert!(!cleaned.has_column("Comments"));
    assert!(cleaned.has_column("Hour"));
    assert!(cleaned.has_column("HasRain"));
    assert_eq!(cleaned.height(), 72);
}

fn read_csv(path: &std::path::Path) -> DataFrame {
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .unwrap()
        .finish()
        .unwrap()
}

fn count_for(frame: &DataFrame, column: &str, field: &str) -> i64 {
    let names = frame.column("column").unwrap().str().unwrap();
    let row = names
        .into_iter()
        .position(|name| name == Some(column))
        .unwrap();
    let counts = frame.column(field).unwrap().cast(&DataType::Int64).unwrap();
    counts.i64().unwrap().get(row).unwrap()
}

#[tokio::test]
async fn test_quality_profiles_before_and_after_cleaning() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_country_exports(temp_dir.path());
    let output = temp_dir.path().join("output");

    let mut runner = PipelineRunner::new(input, Some(output.clone()))
        .unwrap()
        .with_config(quiet_config());
    runner.run().await.unwrap();

    // 11 night hours a day over three days
    let raw = read_csv(&output.join("benin_distribution_raw.csv"));
    assert_eq!(count_for(&raw, "GHI", "negative"), 33);
    let clean = read_csv(&output.join("benin_distribution_clean.csv"));
    assert_eq!(count_for(&clean, "GHI", "negative"), 0);
    // clamped night readings plus the 06:00 and 18:00 readings at zero sun
    assert_eq!(count_for(&clean, "GHI", "zero"), 33 + 6);

    let missing = read_csv(&output.join("benin_missing.csv"));
    assert_eq!(count_for(&missing, "Comments", "missing"), 72);

    let dtypes = read_csv(&output.join("benin_dtypes.csv"));
    assert_eq!(dtypes.height(), 14);

    let impact = read_csv(&output.join("benin_cleaning_impact.csv"));
    assert_eq!(impact.height(), 2);
    let counts = impact.column("Count").unwrap().cast(&DataType::Int64).unwrap();
    let total: i64 = counts.i64().unwrap().into_iter().flatten().sum();
    assert_eq!(total, 72);
}

#[tokio::test]
async fn test_empty_cleaning_flags_skip_impact_table() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("data");
    fs::create_dir_all(&input).unwrap();
    write_station_csv(&input, "benin.csv", 2, 1.0);
    let togo = write_station_csv(&input, "togo.csv", 2, 0.9);

    // blank out the Cleaning field of every data row
    let text = fs::read_to_string(&togo).unwrap();
    let blanked: Vec<String> = text
        .lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                return line.to_string();
            }
            let mut fields: Vec<&str> = line.split(',').collect();
            fields[11] = "";
            fields.join(",")
        })
        .collect();
    fs::write(&togo, blanked.join("\n")).unwrap();

    let output = temp_dir.path().join("output");
    let mut runner = PipelineRunner::new(input, Some(output.clone()))
        .unwrap()
        .with_config(quiet_config());
    let stats = runner.run().await.unwrap();

    assert_eq!(stats.countries_processed, 2);
    assert_eq!(stats.countries_failed, 0);
    assert!(output.join("benin_cleaning_impact.csv").exists());
    assert!(!output.join("togo_cleaning_impact.csv").exists());
    assert!(output.join("togo_describe.csv").exists());

    let cleaned = load_csv(&output.join("togo_clean.csv"), "togo").unwrap();
    assert!(!cleaned.has_column("Cleaning"));
}

#[tokio::test]
async fn test_ranking_written_in_mean_order() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_country_exports(temp_dir.path());
    let output = temp_dir.path().join("output");

    let mut runner = PipelineRunner::new(input, Some(output.clone()))
        .unwrap()
        .with_config(quiet_config());
    runner.run().await.unwrap();

    let ranking = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(output.join("comparison_GHI_ranking.csv")))
        .unwrap()
        .finish()
        .unwrap();
    let countries: Vec<Option<&str>> = ranking
        .column("country")
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(
        countries,
        vec![Some("benin"), Some("togo"), Some("sierraleone")]
    );
}

#[tokio::test]
async fn test_parquet_output_without_profiles() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_country_exports(temp_dir.path());
    let output = temp_dir.path().join("output");

    let config = quiet_config()
        .with_output_format(OutputFormat::Parquet)
        .with_metrics(vec!["GHI".to_string()])
        .without_profiles();
    let mut runner = PipelineRunner::new(input, Some(output.clone()))
        .unwrap()
        .with_config(config);
    let stats = runner.run().await.unwrap();

    assert_eq!(stats.comparisons_written, 1);
    assert!(output.join("togo_clean.parquet").exists());
    assert!(!output.join("togo_diurnal.parquet").exists());
    assert!(output.join("comparison_GHI_tests.parquet").exists());

    let file = fs::File::open(output.join("togo_clean.parquet")).unwrap();
    let frame = ParquetReader::new(file).finish().unwrap();
    assert_eq!(frame.height(), 72);
}

#[tokio::test]
async fn test_default_output_inside_input() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_country_exports(temp_dir.path());

    let runner = PipelineRunner::new(input.clone(), None).unwrap();
    assert_eq!(runner.output_path(), &input.join("processed"));
}
