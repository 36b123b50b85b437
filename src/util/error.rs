// NestMap - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation.
// All errors preserve the causal chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all NestMap operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum NestMapError {
    /// Fixture loading or validation failed.
    Fixture(FixtureError),

    /// A criteria update was rejected.
    Criteria(CriteriaError),

    /// Export operation failed.
    Export(ExportError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for NestMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixture(e) => write!(f, "Fixture error: {e}"),
            Self::Criteria(e) => write!(f, "Criteria error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for NestMapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Fixture(e) => Some(e),
            Self::Criteria(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Fixture errors
// ---------------------------------------------------------------------------

/// Errors related to listing fixture loading and validation.
#[derive(Debug)]
pub enum FixtureError {
    /// JSON file could not be parsed.
    JsonParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Fixture file exceeds the maximum allowed size.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// Two listings in the same fixture file share an ID.
    DuplicateId { id: String, path: PathBuf },

    /// A listing carries a coordinate outside WGS84 bounds, or a
    /// non-finite one.
    InvalidCoordinate {
        id: String,
        longitude: f64,
        latitude: f64,
    },

    /// A numeric listing field is negative or non-finite.
    InvalidValue {
        id: String,
        field: &'static str,
        value: f64,
    },

    /// Maximum number of listings exceeded.
    TooManyListings { count: usize, max: usize },

    /// No listings could be loaded from any source.
    Empty,

    /// I/O error reading a fixture file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for FixtureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JsonParse { path, source } => {
                write!(f, "Failed to parse JSON '{}': {source}", path.display())
            }
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "Fixture '{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::DuplicateId { id, path } => {
                write!(
                    f,
                    "Duplicate listing ID '{id}' in fixture '{}'",
                    path.display()
                )
            }
            Self::InvalidCoordinate {
                id,
                longitude,
                latitude,
            } => write!(
                f,
                "Listing '{id}': coordinate ({longitude}, {latitude}) is outside WGS84 bounds"
            ),
            Self::InvalidValue { id, field, value } => {
                write!(f, "Listing '{id}': '{field}' = {value} is not a valid value")
            }
            Self::TooManyListings { count, max } => {
                write!(f, "Too many listings loaded ({count}), maximum is {max}")
            }
            Self::Empty => write!(f, "No listings loaded from any fixture source"),
            Self::Io { path, source } => {
                write!(
                    f,
                    "I/O error reading fixture '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for FixtureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::JsonParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<FixtureError> for NestMapError {
    fn from(e: FixtureError) -> Self {
        Self::Fixture(e)
    }
}

// ---------------------------------------------------------------------------
// Criteria errors
// ---------------------------------------------------------------------------

/// Errors related to criteria updates.
#[derive(Debug)]
pub enum CriteriaError {
    /// The requested district does not belong to the selected city.
    DistrictNotInCity { city: String, district: String },
}

impl fmt::Display for CriteriaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DistrictNotInCity { city, district } => {
                write!(f, "District '{district}' is not a district of '{city}'")
            }
        }
    }
}

impl std::error::Error for CriteriaError {}

impl From<CriteriaError> for NestMapError {
    fn from(e: CriteriaError) -> Self {
        Self::Criteria(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export target.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// GeoJSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Export would exceed maximum listing count.
    TooManyListings { count: usize, max: usize },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "GeoJSON export error '{}': {source}", path.display())
            }
            Self::TooManyListings { count, max } => write!(
                f,
                "Export of {count} listings exceeds maximum of {max}. \
                 Narrow the filter to reduce the result set."
            ),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ExportError> for NestMapError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for NestMapError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for NestMap results.
pub type Result<T> = std::result::Result<T, NestMapError>;
