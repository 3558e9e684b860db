//! Command-line interface components.

use crate::config::{
    CleaningConfig, ComparisonConfig, CompressionAlgorithm, NightWindow, OutputFormat,
    PipelineConfig,
};
use crate::constants::{
    DEFAULT_NIGHT_END_HOUR, DEFAULT_NIGHT_START_HOUR, DEFAULT_OUTLIER_PASSES,
    DEFAULT_SIGNIFICANCE_LEVEL, DEFAULT_Z_THRESHOLD,
};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "solar_potential")]
#[command(about = "Clean, profile and compare solar irradiance datasets across countries")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Directory holding one raw CSV export per country
    #[arg(value_name = "INPUT_DIR", default_value = "data")]
    pub input_path: PathBuf,

    /// Output directory (defaults to INPUT_DIR/processed)
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// Metrics to compare across countries
    #[arg(long, value_delimiter = ',', default_value = "GHI,DNI,DHI")]
    pub metrics: Vec<String>,

    /// Absolute z-score above which a row is an outlier
    #[arg(long, default_value_t = DEFAULT_Z_THRESHOLD)]
    pub z_threshold: f64,

    /// Maximum outlier passes; each extra pass rescores the kept rows
    #[arg(long, default_value_t = DEFAULT_OUTLIER_PASSES)]
    pub outlier_passes: usize,

    /// First night hour (inclusive)
    #[arg(long, default_value_t = DEFAULT_NIGHT_START_HOUR)]
    pub night_start: u32,

    /// Last night hour (inclusive)
    #[arg(long, default_value_t = DEFAULT_NIGHT_END_HOUR)]
    pub night_end: u32,

    /// Significance level for the ANOVA and Kruskal-Wallis verdicts
    #[arg(long, default_value_t = DEFAULT_SIGNIFICANCE_LEVEL)]
    pub alpha: f64,

    /// Output table format
    #[arg(long, value_enum, default_value = "csv")]
    pub format: FormatArg,

    /// Parquet compression algorithm (snappy, zstd, lz4, none)
    #[arg(long, default_value = "snappy")]
    pub compression: String,

    /// Countries processed concurrently (defaults to the CPU count)
    #[arg(long)]
    pub max_concurrent: Option<usize>,

    /// Skip writing per-country diurnal and monthly tables
    #[arg(long)]
    pub skip_profiles: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Csv,
    Parquet,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Parquet => OutputFormat::Parquet,
        }
    }
}

impl Args {
    /// Layer the flags over the default pipeline configuration
    pub fn to_config(&self) -> Result<PipelineConfig> {
        let cleaning = CleaningConfig::default()
            .with_z_threshold(self.z_threshold)
            .with_outlier_passes(self.outlier_passes)
            .with_night_hours(NightWindow::new(self.night_start, self.night_end));
        let comparison = ComparisonConfig::default().with_significance_level(self.alpha);

        let mut config = PipelineConfig::default()
            .with_cleaning(cleaning)
            .with_comparison(comparison)
            .with_metrics(self.metrics.clone())
            .with_output_format(self.format.into());
        config.compression = CompressionAlgorithm::parse(&self.compression)?;
        if let Some(max) = self.max_concurrent {
            config = config.with_max_concurrent_countries(max);
        }
        if self.skip_profiles {
            config = config.without_profiles();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

/// Set up structured logging to stderr.
///
/// `RUST_LOG` overrides the level chosen by the flags.
pub fn setup_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("solar_potential={}", level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .init();
}
