//! Column names and default values shared across the crate.

// =============================================================================
// Input Schema
// =============================================================================

pub const TIMESTAMP: &str = "Timestamp";
pub const GHI: &str = "GHI";
pub const DNI: &str = "DNI";
pub const DHI: &str = "DHI";
pub const MOD_A: &str = "ModA";
pub const MOD_B: &str = "ModB";
pub const WS: &str = "WS";
pub const WS_GUST: &str = "WSgust";
pub const RH: &str = "RH";
pub const TAMB: &str = "Tamb";
pub const BP: &str = "BP";
pub const CLEANING: &str = "Cleaning";
pub const PRECIPITATION: &str = "Precipitation";
pub const COMMENTS: &str = "Comments";

/// Numeric sensor columns of the fixed input schema
pub const NUMERIC_COLUMNS: &[&str] = &[
    GHI,
    DNI,
    DHI,
    MOD_A,
    MOD_B,
    WS,
    WS_GUST,
    RH,
    TAMB,
    BP,
    PRECIPITATION,
];

/// Numeric columns present in station exports but not required by the schema
pub const OPTIONAL_NUMERIC_COLUMNS: &[&str] = &["WD", "WDstdev", "TModA", "TModB"];

// =============================================================================
// Derived Features
// =============================================================================

pub const HOUR: &str = "Hour";
pub const MONTH: &str = "Month";
pub const HAS_RAIN: &str = "HasRain";

// =============================================================================
// Cleaning Defaults
// =============================================================================

pub const DEFAULT_Z_THRESHOLD: f64 = 3.0;

/// Outlier passes per clean; one pass scores every row against the same
/// statistics
pub const DEFAULT_OUTLIER_PASSES: usize = 1;

/// Columns screened for outliers
pub const DEFAULT_OUTLIER_COLUMNS: &[&str] = &[GHI, DNI, DHI, MOD_A, MOD_B, WS, WS_GUST];

/// Columns median-imputed after outlier removal
pub const DEFAULT_IMPUTATION_COLUMNS: &[&str] =
    &[GHI, DNI, DHI, MOD_A, MOD_B, WS, WS_GUST, TAMB, RH];

pub const IRRADIANCE_COLUMNS: &[&str] = &[GHI, DNI, DHI];

/// Night window start hour (inclusive)
pub const DEFAULT_NIGHT_START_HOUR: u32 = 19;

/// Night window end hour (inclusive), the window wraps past midnight
pub const DEFAULT_NIGHT_END_HOUR: u32 = 5;

/// Null fraction at or above which a column is dropped
pub const DEFAULT_MISSING_COLUMN_THRESHOLD: f64 = 1.0;

// =============================================================================
// Profiling and Comparison Defaults
// =============================================================================

/// Missing fraction above which the profiler flags a column
pub const DEFAULT_MISSING_FLAG_THRESHOLD: f64 = 0.05;

/// Columns whose sign breakdown is profiled before and after cleaning
pub const DEFAULT_DISTRIBUTION_COLUMNS: &[&str] = &[GHI, DNI, DHI, MOD_A, MOD_B];

pub const DEFAULT_CORRELATION_COLUMNS: &[&str] = &[GHI, DNI, DHI, "TModA", "TModB"];

pub const DEFAULT_COMPARISON_METRICS: &[&str] = &[GHI, DNI, DHI];

pub const MIN_COMPARISON_COUNTRIES: usize = 2;

pub const DEFAULT_SIGNIFICANCE_LEVEL: f64 = 0.05;

// =============================================================================
// File Naming
// =============================================================================

pub const CLEAN_FILE_SUFFIX: &str = "_clean";

/// Accepted timestamp layouts at the loader boundary
pub const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];
