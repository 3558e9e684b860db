//! File discovery for per-country solar exports
//!
//! Finds the raw CSV files in an input directory and derives the country of
//! each from its file name. Cleaned outputs written back into the same
//! directory are skipped.

use crate::constants::CLEAN_FILE_SUFFIX;
use crate::error::{Result, SolarError};
use glob::glob;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tokio::fs;
use tracing::{debug, warn};

/// Leading run of the file stem before the first `-` or `_`
static COUNTRY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^-_]+)").expect("country pattern is valid"));

/// A raw export and the country it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryFile {
    pub country: String,
    pub path: PathBuf,
}

/// File discovery component for country datasets
#[derive(Debug)]
pub struct FileDiscovery {
    input_path: PathBuf,
    skipped: Vec<PathBuf>,
}

impl FileDiscovery {
    pub fn new(input_path: PathBuf) -> Self {
        Self {
            input_path,
            skipped: Vec::new(),
        }
    }

    /// Files passed over during the last discovery
    pub fn skipped(&self) -> &[PathBuf] {
        &self.skipped
    }

    /// Discover one raw CSV file per country, ordered by country name.
    ///
    /// When several files map to the same country the first path in sort
    /// order wins and the rest are skipped with a warning.
    pub async fn discover_country_files(&mut self) -> Result<Vec<CountryFile>> {
        let is_dir = fs::metadata(&self.input_path)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false);
        if !is_dir {
            return Err(SolarError::DatasetNotFound {
                path: self.input_path.clone(),
            });
        }

        let pattern = self.input_path.join("*.csv");
        let pattern = pattern.to_string_lossy();
        debug!("Searching for CSV files matching: {}", pattern);

        let mut paths: Vec<PathBuf> = glob(&pattern)
            .map_err(|e| SolarError::configuration(format!("invalid input pattern: {}", e)))?
            .filter_map(|entry| entry.ok())
            .filter(|path| path.is_file())
            .collect();
        paths.sort();

        self.skipped.clear();
        let mut by_country: BTreeMap<String, PathBuf> = BTreeMap::new();
        for path in paths {
            if is_clean_output(&path) {
                debug!("Skipping cleaned output: {}", path.display());
                self.skipped.push(path);
                continue;
            }
            let Some(country) = country_from_path(&path) else {
                warn!("Cannot derive a country from {}", path.display());
                self.skipped.push(path);
                continue;
            };
            if let Some(existing) = by_country.get(&country) {
                warn!(
                    "Skipping {}: {} already provides data for {}",
                    path.display(),
                    existing.display(),
                    country
                );
                self.skipped.push(path);
                continue;
            }
            by_country.insert(country, path);
        }

        debug!(
            "Found {} country files, skipped {}",
            by_country.len(),
            self.skipped.len()
        );
        Ok(by_country
            .into_iter()
            .map(|(country, path)| CountryFile { country, path })
            .collect())
    }
}

/// Lower-cased file stem up to the first `-` or `_`
pub fn country_from_path(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    COUNTRY_PATTERN
        .captures(stem)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_lowercase())
}

fn is_clean_output(path: &Path) -> bool {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| stem.ends_with(CLEAN_FILE_SUFFIX))
}
