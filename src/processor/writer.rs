//! Table writing for pipeline outputs
//!
//! Cleaned datasets, profile tables and comparison tables are all flat
//! frames written either as CSV or as compressed Parquet.

use crate::config::{CompressionAlgorithm, OutputFormat};
use crate::error::{Result, SolarError};
use polars::prelude::{CsvWriter, DataFrame, ParquetWriter, SerWriter};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes frames into one output directory
#[derive(Debug, Clone)]
pub struct TableWriter {
    output_path: PathBuf,
    format: OutputFormat,
    compression: CompressionAlgorithm,
}

impl TableWriter {
    pub fn new(output_path: PathBuf, format: OutputFormat, compression: CompressionAlgorithm) -> Self {
        Self {
            output_path,
            format,
            compression,
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Path a table named `stem` is written to
    pub fn path_for(&self, stem: &str) -> PathBuf {
        self.output_path
            .join(format!("{}.{}", stem, self.format.extension()))
    }

    /// Write `frame` as `<stem>.<ext>`, returning the path written
    pub fn write(&self, frame: &DataFrame, stem: &str) -> Result<PathBuf> {
        let path = self.path_for(stem);
        let mut frame = frame.clone();
        let file = File::create(&path)?;

        let written = match self.format {
            OutputFormat::Csv => CsvWriter::new(file)
                .include_header(true)
                .finish(&mut frame),
            OutputFormat::Parquet => ParquetWriter::new(file)
                .with_compression(self.compression.to_polars_compression())
                .finish(&mut frame)
                .map(|_| ()),
        };
        written.map_err(|e| SolarError::InvalidFormat {
            path: path.clone(),
            reason: format!("failed to write table: {}", e),
        })?;

        debug!(
            "Wrote {} rows x {} columns to {}",
            frame.height(),
            frame.width(),
            path.display()
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;
    use tempfile::TempDir;

    fn sample() -> DataFrame {
        df!(
            "country" => ["benin", "togo"],
            "mean" => [Some(240.5), None],
        )
        .unwrap()
    }

    #[test]
    fn test_write_csv() {
        let temp_dir = TempDir::new().unwrap();
        let writer = TableWriter::new(
            temp_dir.path().to_path_buf(),
            OutputFormat::Csv,
            CompressionAlgorithm::default(),
        );

        let path = writer.write(&sample(), "comparison_GHI_summary").unwrap();
        assert!(path.ends_with("comparison_GHI_summary.csv"));

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("country,mean"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_write_parquet_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let writer = TableWriter::new(
            temp_dir.path().to_path_buf(),
            OutputFormat::Parquet,
            CompressionAlgorithm::Zstd,
        );

        let path = writer.write(&sample(), "benin_clean").unwrap();
        assert!(path.ends_with("benin_clean.parquet"));

        let file = File::open(&path).unwrap();
        let read = ParquetReader::new(file).finish().unwrap();
        assert!(read.equals_missing(&sample()));
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let writer = TableWriter::new(
            temp_dir.path().join("nope"),
            OutputFormat::Csv,
            CompressionAlgorithm::default(),
        );
        assert!(matches!(
            writer.write(&sample(), "x"),
            Err(SolarError::Io(_))
        ));
    }
}
