// NestMap - main.rs
//
// CLI entry point. Stands in for the UI event source the web front-end
// would provide: loads fixtures and configuration, builds the filter
// store, translates CLI flags into criteria updates, then prints and/or
// exports the derived view.

use chrono::{DateTime, NaiveDate, Utc};
use clap::Parser;
use nestmap::app::fixture;
use nestmap::app::store::ListingStore;
use nestmap::core::export;
use nestmap::core::filter::{normalize_bound, CriteriaUpdate, DateRange, FilterCriteria};
use nestmap::core::model::Purpose;
use nestmap::platform::config::{self, AppConfig, PlatformPaths};
use nestmap::util;
use std::path::PathBuf;

/// NestMap - real-estate listing map engine.
///
/// Loads the listing fixture set, applies filter criteria, and emits the
/// filtered view as a listing summary, GeoJSON renderer feed, or CSV.
#[derive(Parser, Debug)]
#[command(name = "NestMap", version, about)]
struct Cli {
    /// Extra listing fixture file(s) to load (JSON arrays of listings).
    #[arg(value_name = "FIXTURE")]
    fixtures: Vec<PathBuf>,

    /// Additional directory containing user fixture files.
    #[arg(short = 'F', long = "fixtures-dir")]
    fixtures_dir: Option<PathBuf>,

    /// Configuration directory (defaults to the platform config dir).
    #[arg(short = 'c', long = "config-dir")]
    config_dir: Option<PathBuf>,

    /// Listing purpose: rent or sale.
    #[arg(short = 'p', long)]
    purpose: Option<String>,

    /// City to filter to.
    #[arg(long)]
    city: Option<String>,

    /// District within the selected city.
    #[arg(long)]
    district: Option<String>,

    /// Maximum listing recency in hours.
    #[arg(long = "max-hours")]
    max_hours: Option<i64>,

    /// Show radical deals only.
    #[arg(long)]
    radical: bool,

    /// Minimum area in m².
    #[arg(long = "min-area")]
    min_area: Option<f64>,

    /// Maximum area in m².
    #[arg(long = "max-area")]
    max_area: Option<f64>,

    /// Minimum price.
    #[arg(long = "min-price")]
    min_price: Option<f64>,

    /// Maximum price.
    #[arg(long = "max-price")]
    max_price: Option<f64>,

    /// Listing-date lower bound, inclusive (YYYY-MM-DD).
    #[arg(long)]
    from: Option<String>,

    /// Listing-date upper bound, inclusive (YYYY-MM-DD).
    #[arg(long)]
    to: Option<String>,

    /// Write the filtered view to this path ("-" for stdout).
    #[arg(short = 'o', long)]
    export: Option<PathBuf>,

    /// Export format.
    #[arg(long, value_enum, default_value = "geojson")]
    format: ExportFormat,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ExportFormat {
    Geojson,
    Csv,
}

fn main() {
    let cli = Cli::parse();

    // Resolve platform paths
    let platform_paths = PlatformPaths::resolve();

    // Determine config directory: CLI override > platform default
    let config_dir = cli
        .config_dir
        .as_deref()
        .unwrap_or(&platform_paths.config_dir);

    // Config is loaded before logging is initialised so its [logging]
    // level can participate in the filter priority chain.
    let (app_config, config_warnings) = config::load_config(config_dir);

    util::logging::init(cli.debug, app_config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "NestMap starting"
    );

    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Configuration warning");
    }

    // Determine fixture directory: CLI override > config > platform default
    let fixtures_dir = cli
        .fixtures_dir
        .clone()
        .or_else(|| app_config.user_fixture_dir.clone())
        .unwrap_or_else(|| platform_paths.user_fixtures_dir.clone());

    // Load the listing set
    let (listings, fixture_errors) = fixture::load_all_listings(Some(&fixtures_dir), &cli.fixtures);
    for err in &fixture_errors {
        tracing::warn!(error = %err, "Fixture loading warning");
    }
    if listings.is_empty() {
        let e = nestmap::util::error::NestMapError::from(
            nestmap::util::error::FixtureError::Empty,
        );
        tracing::error!(error = %e, "Startup failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    tracing::info!(listings = listings.len(), "Listing set ready");

    // Build the store with configured defaults, then feed CLI flags
    // through the same update path the UI would use.
    let mut store = ListingStore::new(listings, default_criteria(&app_config));

    if let Err(e) = apply_cli_updates(&mut store, &cli) {
        tracing::error!(error = %e, "Invalid filter arguments");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    print_view(&store);

    if let Some(ref path) = cli.export {
        if let Err(e) = run_export(&store, path, cli.format) {
            tracing::error!(error = %e, "Export failed");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Build the initial criteria from the validated configuration.
fn default_criteria(config: &AppConfig) -> FilterCriteria {
    FilterCriteria {
        // The config loader has already validated the label.
        purpose: Purpose::parse(&config.purpose).unwrap_or_default(),
        city: config.city.clone(),
        district: None,
        max_duration_hours: config.duration_hours,
        radical_only: config.radical,
        area_range: config.area_range,
        price_range: config.price_range,
        date_range: DateRange::default(),
    }
}

/// Translate CLI flags into criteria updates, applied in order through
/// the store. Only flags the user actually passed produce updates, so a
/// bare invocation keeps the default (non-interacted) view.
fn apply_cli_updates(store: &mut ListingStore, cli: &Cli) -> nestmap::util::error::Result<()> {
    if let Some(ref raw) = cli.purpose {
        match Purpose::parse(raw) {
            Some(purpose) => {
                store.apply(CriteriaUpdate::SetPurpose(purpose))?;
            }
            None => {
                tracing::warn!(purpose = %raw, "Unrecognised purpose ignored (expected rent|sale)");
            }
        }
    }

    if let Some(ref city) = cli.city {
        store.apply(CriteriaUpdate::SetCity(city.clone()))?;
    }

    if let Some(ref district) = cli.district {
        store.apply(CriteriaUpdate::SetDistrict(Some(district.clone())))?;
    }

    if let Some(hours) = cli.max_hours {
        store.apply(CriteriaUpdate::SetDuration(hours.max(0)))?;
    }

    if cli.radical {
        store.apply(CriteriaUpdate::SetRadical(true))?;
    }

    if cli.min_area.is_some() || cli.max_area.is_some() {
        let current = store.criteria().area_range;
        let range = [
            cli.min_area.map(normalize_bound).unwrap_or(current[0]),
            cli.max_area.map(normalize_bound).unwrap_or(current[1]),
        ];
        store.apply(CriteriaUpdate::SetAreaRange(range))?;
    }

    if cli.min_price.is_some() || cli.max_price.is_some() {
        let current = store.criteria().price_range;
        let range = [
            cli.min_price.map(normalize_bound).unwrap_or(current[0]),
            cli.max_price.map(normalize_bound).unwrap_or(current[1]),
        ];
        store.apply(CriteriaUpdate::SetPriceRange(range))?;
    }

    if cli.from.is_some() || cli.to.is_some() {
        let from = cli.from.as_deref().map(parse_day_start).transpose()?;
        let to = cli.to.as_deref().map(parse_day_end).transpose()?;
        store.apply(CriteriaUpdate::SetDateRange { from, to })?;
    }

    Ok(())
}

/// Parse a YYYY-MM-DD argument as the first instant of that day, UTC.
fn parse_day_start(raw: &str) -> nestmap::util::error::Result<DateTime<Utc>> {
    parse_day(raw).map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc())
}

/// Parse a YYYY-MM-DD argument as the last second of that day, UTC, so
/// the bound stays inclusive for listings published later that day.
fn parse_day_end(raw: &str) -> nestmap::util::error::Result<DateTime<Utc>> {
    parse_day(raw).map(|d| d.and_hms_opt(23, 59, 59).unwrap_or_default().and_utc())
}

fn parse_day(raw: &str) -> nestmap::util::error::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        nestmap::util::error::NestMapError::Config(
            nestmap::util::error::ConfigError::ValueOutOfRange {
                field: "date".to_string(),
                value: raw.to_string(),
                expected: "YYYY-MM-DD".to_string(),
            },
        )
    })
}

/// Print a human-readable summary of the derived view.
fn print_view(store: &ListingStore) {
    let view = store.view();
    let criteria = view.criteria();

    println!(
        "{} {} listing(s) in {}{}",
        view.len(),
        criteria.purpose,
        criteria.city,
        criteria
            .district
            .as_deref()
            .map(|d| format!(" / {d}"))
            .unwrap_or_default(),
    );

    for (i, listing) in view.listings().enumerate() {
        println!(
            "{}. {} ({}, {}) {} / {} m²{}",
            i + 1,
            listing.title,
            listing.district,
            listing.city,
            listing.price,
            listing.area,
            if listing.is_radical { " ★" } else { "" },
        );
    }

    if let Some(notice) = store.active_notice(std::time::Instant::now()) {
        println!("{}", notice.message());
    }
}

/// Write the derived view to `path` ("-" = stdout) in the chosen format.
fn run_export(
    store: &ListingStore,
    path: &PathBuf,
    format: ExportFormat,
) -> nestmap::util::error::Result<()> {
    let view = store.view();
    let matches = view.matches();

    let count = if path.as_os_str() == "-" {
        let stdout = std::io::stdout();
        match format {
            ExportFormat::Geojson => export::export_geojson(&matches, stdout.lock(), path)?,
            ExportFormat::Csv => export::export_csv(&matches, stdout.lock(), path)?,
        }
    } else {
        let file = std::fs::File::create(path).map_err(|e| {
            nestmap::util::error::NestMapError::Io {
                path: path.clone(),
                operation: "create export file",
                source: e,
            }
        })?;
        match format {
            ExportFormat::Geojson => export::export_geojson(&matches, file, path)?,
            ExportFormat::Csv => export::export_csv(&matches, file, path)?,
        }
    };

    tracing::info!(count, path = %path.display(), format = ?format, "Export complete");
    Ok(())
}
