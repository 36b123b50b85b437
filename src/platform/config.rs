// NestMap - platform/config.rs
//
// Platform-specific configuration, data directory resolution, and
// config.toml loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for NestMap data and configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/nestmap/ or %APPDATA%\NestMap\)
    pub config_dir: PathBuf,

    /// User fixture directory (e.g. ~/.config/nestmap/fixtures/)
    pub user_fixtures_dir: PathBuf,

    /// Data directory for caches, exports, etc.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let user_fixtures_dir = config_dir.join(constants::FIXTURES_DIR_NAME);
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                fixtures = %user_fixtures_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                user_fixtures_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                user_fixtures_dir: fallback.join(constants::FIXTURES_DIR_NAME),
                data_dir: fallback,
            }
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility -- a newer
/// config file can be used with an older binary without crashing.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[defaults]` section: initial filter criteria.
    pub defaults: DefaultsSection,
    /// `[fixtures]` section.
    pub fixtures: FixturesSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[defaults]` config section: the criteria applied on first render.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DefaultsSection {
    /// "rent" or "sale".
    pub purpose: Option<String>,
    /// Default city.
    pub city: Option<String>,
    /// Recency window in hours.
    pub duration_hours: Option<i64>,
    /// Radical-only filter.
    pub radical: Option<bool>,
    /// Area window [min, max] in m².
    pub area_range: Option<[f64; 2]>,
    /// Price window [min, max].
    pub price_range: Option<[f64; 2]>,
}

/// `[fixtures]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct FixturesSection {
    /// Additional fixture directory.
    pub user_fixture_directory: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// All values are validated against named constants at load time.
/// Invalid values produce actionable warnings and fall back to defaults.
/// The purpose is kept as its validated wire label; the platform layer
/// does not depend on core types.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// "rent" or "sale".
    pub purpose: String,
    /// Default city.
    pub city: String,
    /// Recency window in hours.
    pub duration_hours: i64,
    /// Radical-only filter.
    pub radical: bool,
    /// Area window [min, max] in m².
    pub area_range: [f64; 2],
    /// Price window [min, max].
    pub price_range: [f64; 2],
    /// Additional fixture directory (overrides the platform default).
    pub user_fixture_dir: Option<PathBuf>,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            purpose: "rent".to_string(),
            city: constants::DEFAULT_CITY.to_string(),
            duration_hours: constants::DEFAULT_DURATION_HOURS,
            radical: false,
            area_range: constants::DEFAULT_AREA_RANGE,
            price_range: constants::DEFAULT_PRICE_RANGE,
            user_fixture_dir: None,
            log_level: None,
        }
    }
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal
/// warnings. If the file does not exist, returns defaults with no warnings
/// (first-run). If the file is unparseable, returns defaults with an error
/// warning -- the application still starts but the user is informed.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);

    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) => {
            let msg = format!(
                "Could not read config file '{}': {e}. Using defaults.",
                config_path.display()
            );
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            let msg = format!(
                "Failed to parse config file '{}': {e}. Using defaults. \
                 See config.example.toml for the expected format.",
                config_path.display()
            );
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    // Validate each field against named constants, accumulating all errors.
    let mut config = AppConfig::default();

    // -- Defaults: purpose --
    if let Some(ref purpose) = raw.defaults.purpose {
        match purpose.to_lowercase().as_str() {
            "rent" | "sale" => config.purpose = purpose.to_lowercase(),
            other => {
                warnings.push(format!(
                    "[defaults] purpose = \"{other}\" is not recognised. \
                     Expected \"rent\" or \"sale\". Using default (rent)."
                ));
            }
        }
    }

    // -- Defaults: city --
    if let Some(ref city) = raw.defaults.city {
        if city.trim().is_empty() {
            warnings.push(format!(
                "[defaults] city is empty. Using default ({}).",
                constants::DEFAULT_CITY
            ));
        } else {
            config.city = city.clone();
        }
    }

    // -- Defaults: duration_hours --
    if let Some(hours) = raw.defaults.duration_hours {
        if (constants::MIN_DURATION_HOURS..=constants::MAX_DURATION_HOURS).contains(&hours) {
            config.duration_hours = hours;
        } else {
            warnings.push(format!(
                "[defaults] duration_hours = {hours} is out of range ({}-{}). Using default ({}).",
                constants::MIN_DURATION_HOURS,
                constants::MAX_DURATION_HOURS,
                constants::DEFAULT_DURATION_HOURS,
            ));
        }
    }

    // -- Defaults: radical --
    if let Some(radical) = raw.defaults.radical {
        config.radical = radical;
    }

    // -- Defaults: area_range / price_range --
    if let Some(range) = raw.defaults.area_range {
        match validated_range(range) {
            Some(range) => config.area_range = range,
            None => warnings.push(format!(
                "[defaults] area_range = {range:?} is not an ordered pair of \
                 non-negative numbers. Using default ({:?}).",
                constants::DEFAULT_AREA_RANGE
            )),
        }
    }
    if let Some(range) = raw.defaults.price_range {
        match validated_range(range) {
            Some(range) => config.price_range = range,
            None => warnings.push(format!(
                "[defaults] price_range = {range:?} is not an ordered pair of \
                 non-negative numbers. Using default ({:?}).",
                constants::DEFAULT_PRICE_RANGE
            )),
        }
    }

    // -- Fixtures: user_fixture_directory --
    if let Some(ref dir) = raw.fixtures.user_fixture_directory {
        if !dir.is_empty() {
            config.user_fixture_dir = Some(PathBuf::from(dir));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info)."
            ));
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "Config validation produced warnings");
    }

    (config, warnings)
}

fn validated_range(range: [f64; 2]) -> Option<[f64; 2]> {
    let [lo, hi] = range;
    if lo.is_finite() && hi.is_finite() && lo >= 0.0 && lo <= hi {
        Some(range)
    } else {
        None
    }
}

// =============================================================================
// Tests
// =============================================================================
