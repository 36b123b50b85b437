// NestMap - app/fixture.rs
//
// Listing fixture loading. The listing set is assembled once at startup:
// the embedded fixture (compiled into the binary) first, then any user
// fixture files. User listings with an ID matching an embedded listing
// override it; others append. Invalid files and records are logged and
// skipped (non-fatal).

use crate::core::model::Listing;
use crate::util::constants;
use crate::util::error::FixtureError;
use std::path::{Path, PathBuf};

/// Embedded listing fixture.
///
/// Using `include_str!` ensures the data is baked into the binary so the
/// application always has a listing set regardless of the working
/// directory at runtime.
static BUILTIN_LISTINGS_JSON: &str = include_str!("../../data/listings.json");

/// Parse the embedded fixture.
///
/// A failure here is a packaging bug, but we still degrade gracefully to
/// an empty set rather than refusing to start.
pub fn load_builtin_listings() -> Vec<Listing> {
    match serde_json::from_str::<Vec<Listing>>(BUILTIN_LISTINGS_JSON) {
        Ok(listings) => {
            tracing::debug!(count = listings.len(), "Loaded embedded listing fixture");
            listings
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to parse embedded listing fixture");
            Vec::new()
        }
    }
}

/// Load one user fixture file: a JSON array of listings.
///
/// The whole file is rejected on a read/parse failure; individual invalid
/// records (bad coordinates, negative values, duplicate IDs) are skipped
/// and reported while the rest of the file still loads.
pub fn load_user_fixture(path: &Path) -> Result<(Vec<Listing>, Vec<FixtureError>), FixtureError> {
    let metadata = std::fs::metadata(path).map_err(|e| FixtureError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    if metadata.len() > constants::MAX_FIXTURE_FILE_SIZE {
        return Err(FixtureError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size: constants::MAX_FIXTURE_FILE_SIZE,
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| FixtureError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let raw: Vec<Listing> =
        serde_json::from_str(&content).map_err(|e| FixtureError::JsonParse {
            path: path.to_path_buf(),
            source: e,
        })?;

    let mut listings: Vec<Listing> = Vec::with_capacity(raw.len());
    let mut errors = Vec::new();

    for listing in raw {
        if listings.iter().any(|l| l.id == listing.id) {
            errors.push(FixtureError::DuplicateId {
                id: listing.id.clone(),
                path: path.to_path_buf(),
            });
            continue;
        }
        match validate_listing(&listing) {
            Ok(()) => listings.push(listing),
            Err(e) => errors.push(e),
        }
    }

    Ok((listings, errors))
}

/// Assemble the full listing set: embedded fixture, then `*.json` files
/// from the user fixtures directory (lexicographic order), then explicit
/// extra files. Later sources override earlier ones by listing ID.
///
/// Returns the merged set and any non-fatal errors encountered.
pub fn load_all_listings(
    user_fixture_dir: Option<&Path>,
    extra_files: &[PathBuf],
) -> (Vec<Listing>, Vec<FixtureError>) {
    let mut listings = load_builtin_listings();
    let mut errors = Vec::new();

    if let Some(dir) = user_fixture_dir {
        if dir.is_dir() {
            for path in fixture_files_in(dir, &mut errors) {
                merge_file(&path, &mut listings, &mut errors);
            }
        } else {
            tracing::debug!(
                dir = %dir.display(),
                "User fixture directory does not exist (skipping)"
            );
        }
    }

    for path in extra_files {
        merge_file(path, &mut listings, &mut errors);
    }

    // Enforce the listing cap
    if listings.len() > constants::MAX_LISTINGS {
        tracing::warn!(
            count = listings.len(),
            max = constants::MAX_LISTINGS,
            "Too many listings loaded, truncating"
        );
        errors.push(FixtureError::TooManyListings {
            count: listings.len(),
            max: constants::MAX_LISTINGS,
        });
        listings.truncate(constants::MAX_LISTINGS);
    }

    tracing::info!(total = listings.len(), "Listing fixture loading complete");

    (listings, errors)
}

/// Collect `*.json` paths from the fixtures directory, sorted so load
/// order (and therefore override order) is deterministic.
fn fixture_files_in(dir: &Path, errors: &mut Vec<FixtureError>) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            errors.push(FixtureError::Io {
                path: dir.to_path_buf(),
                source: e,
            });
            return Vec::new();
        }
    };

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry_result in entries {
        match entry_result {
            Ok(entry) => {
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) == Some("json") {
                    paths.push(path);
                }
            }
            Err(e) => errors.push(FixtureError::Io {
                path: dir.to_path_buf(),
                source: e,
            }),
        }
    }
    paths.sort();
    paths
}

fn merge_file(path: &Path, listings: &mut Vec<Listing>, errors: &mut Vec<FixtureError>) {
    match load_user_fixture(path) {
        Ok((loaded, mut file_errors)) => {
            tracing::info!(
                path = %path.display(),
                count = loaded.len(),
                "Loaded user fixture"
            );
            errors.append(&mut file_errors);
            for listing in loaded {
                if let Some(pos) = listings.iter().position(|l| l.id == listing.id) {
                    tracing::debug!(id = %listing.id, "User listing overrides embedded listing");
                    listings[pos] = listing;
                } else {
                    listings.push(listing);
                }
            }
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Skipping fixture file");
            errors.push(e);
        }
    }
}

fn validate_listing(listing: &Listing) -> Result<(), FixtureError> {
    if !listing.location.is_valid() {
        return Err(FixtureError::InvalidCoordinate {
            id: listing.id.clone(),
            longitude: listing.location.longitude(),
            latitude: listing.location.latitude(),
        });
    }
    if !listing.price.is_finite() || listing.price < 0.0 {
        return Err(FixtureError::InvalidValue {
            id: listing.id.clone(),
            field: "price",
            value: listing.price,
        });
    }
    if !listing.area.is_finite() || listing.area < 0.0 {
        return Err(FixtureError::InvalidValue {
            id: listing.id.clone(),
            field: "area",
            value: listing.area,
        });
    }
    if listing.duration < 0 {
        return Err(FixtureError::InvalidValue {
            id: listing.id.clone(),
            field: "duration",
            value: listing.duration as f64,
        });
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn user_listing_json(id: &str, city: &str, lng: f64) -> String {
        format!(
            r#"{{
                "id": "{id}",
                "purpose": "rent",
                "city": "{city}",
                "district": "العليا",
                "address": "شارع الاختبار",
                "title": "عرض {id}",
                "description": "",
                "location": {{ "coordinates": [{lng}, 24.7] }},
                "area": 100.0,
                "price": 40000.0,
                "bedrooms": 2,
                "bathrooms": 1,
                "propertyType": "apartment",
                "listedAt": "2025-07-01T12:00:00Z",
                "duration": 24,
                "isRadical": false
            }}"#
        )
    }

    #[test]
    fn test_builtin_fixture_loads_and_is_valid() {
        let listings = load_builtin_listings();
        assert!(!listings.is_empty(), "embedded fixture must not be empty");

        for listing in &listings {
            assert!(validate_listing(listing).is_ok(), "listing {}", listing.id);
        }

        // IDs must be unique across the embedded set.
        for (i, a) in listings.iter().enumerate() {
            assert!(
                !listings[i + 1..].iter().any(|b| b.id == a.id),
                "duplicate embedded id {}",
                a.id
            );
        }
    }

    #[test]
    fn test_user_fixture_appends_and_overrides_by_id() {
        let builtin = load_builtin_listings();
        let known_id = builtin[0].id.clone();

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("extra.json");
        fs::write(
            &path,
            format!(
                "[{}, {}]",
                user_listing_json(&known_id, "مدينة الاختبار", 46.7),
                user_listing_json("user-1", "مدينة الاختبار", 46.8),
            ),
        )
        .unwrap();

        let (listings, errors) = load_all_listings(Some(dir.path()), &[]);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        assert_eq!(listings.len(), builtin.len() + 1);

        let overridden = listings.iter().find(|l| l.id == known_id).unwrap();
        assert_eq!(overridden.city, "مدينة الاختبار");
        assert!(listings.iter().any(|l| l.id == "user-1"));
    }

    #[test]
    fn test_malformed_fixture_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad.json"), b"not valid json {{{{").unwrap();

        let (listings, errors) = load_all_listings(Some(dir.path()), &[]);
        assert_eq!(listings.len(), load_builtin_listings().len());
        assert!(matches!(errors[0], FixtureError::JsonParse { .. }));
    }

    #[test]
    fn test_invalid_coordinate_record_is_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("coords.json");
        fs::write(
            &path,
            format!(
                "[{}, {}]",
                user_listing_json("ok-1", "الرياض", 46.7),
                user_listing_json("bad-1", "الرياض", 191.0),
            ),
        )
        .unwrap();

        let (listings, errors) = load_user_fixture(&path).unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].id, "ok-1");
        assert!(matches!(errors[0], FixtureError::InvalidCoordinate { .. }));
    }

    #[test]
    fn test_duplicate_id_within_file_keeps_first() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dupes.json");
        fs::write(
            &path,
            format!(
                "[{}, {}]",
                user_listing_json("dup-1", "الرياض", 46.7),
                user_listing_json("dup-1", "جدة", 39.2),
            ),
        )
        .unwrap();

        let (listings, errors) = load_user_fixture(&path).unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].city, "الرياض");
        assert!(matches!(errors[0], FixtureError::DuplicateId { .. }));
    }

    #[test]
    fn test_missing_fixture_dir_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nonexistent");
        let (listings, errors) = load_all_listings(Some(&missing), &[]);
        assert_eq!(listings.len(), load_builtin_listings().len());
        assert!(errors.is_empty());
    }
}
