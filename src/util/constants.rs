// NestMap - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "NestMap";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "NestMap";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Criteria defaults
// =============================================================================

/// Default city selected on first render.
pub const DEFAULT_CITY: &str = "الرياض";

/// Default recency window in hours (three months).
pub const DEFAULT_DURATION_HOURS: i64 = 2700;

/// The recency windows offered by the duration selector, in hours:
/// last 24 hours, last 3 days, last month, last 3 months.
pub const DURATION_WINDOW_HOURS: &[i64] = &[24, 72, 790, 2700];

/// Hard upper bound on the duration criterion (one year).
pub const MAX_DURATION_HOURS: i64 = 8_760;

/// Minimum sensible duration criterion.
pub const MIN_DURATION_HOURS: i64 = 1;

/// Default area range in m², wide enough to include every listing.
pub const DEFAULT_AREA_RANGE: [f64; 2] = [0.0, 25_000.0];

/// Default price range, wide enough to include every listing.
pub const DEFAULT_PRICE_RANGE: [f64; 2] = [0.0, 10_000_000.0];

// =============================================================================
// Fixture limits
// =============================================================================

/// Maximum number of listings held in memory (embedded + user fixtures).
///
/// The derived view is recomputed by a full linear scan on every criteria
/// change, so the listing set must stay small enough for that scan to be
/// imperceptible at interactive rates.
pub const MAX_LISTINGS: usize = 10_000;

/// Maximum size of a user fixture JSON file in bytes.
pub const MAX_FIXTURE_FILE_SIZE: u64 = 8 * 1024 * 1024; // 8 MB

// =============================================================================
// Empty-result notice
// =============================================================================

/// How long the transient empty-result notice stays active before it
/// auto-dismisses, in milliseconds.
pub const NOTICE_DISMISS_MS: u64 = 4_000;

// =============================================================================
// Export
// =============================================================================

/// Maximum number of listings that can be exported in a single operation.
pub const MAX_EXPORT_LISTINGS: usize = 100_000;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// User fixtures subdirectory name.
pub const FIXTURES_DIR_NAME: &str = "fixtures";
