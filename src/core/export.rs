// NestMap - core/export.rs
//
// CSV and GeoJSON export of the filtered listing set.
// Core layer: writes to any Write trait object.

use crate::core::geojson;
use crate::core::model::Listing;
use crate::util::constants;
use crate::util::error::ExportError;
use std::io::Write;
use std::path::Path;

/// Export filtered listings to CSV format.
///
/// Writes: id, title, purpose, city, district, property_type, area, price,
/// bedrooms, bathrooms, listed_at, radical
pub fn export_csv<W: Write>(
    listings: &[&Listing],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    check_count(listings.len())?;

    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record([
            "id",
            "title",
            "purpose",
            "city",
            "district",
            "property_type",
            "area",
            "price",
            "bedrooms",
            "bathrooms",
            "listed_at",
            "radical",
        ])
        .map_err(|e| ExportError::Csv {
            path: export_path.to_path_buf(),
            source: e,
        })?;

    let mut count = 0;
    for listing in listings {
        csv_writer
            .write_record([
                listing.id.as_str(),
                listing.title.as_str(),
                listing.purpose.label(),
                listing.city.as_str(),
                listing.district.as_str(),
                listing.property_type.label(),
                &listing.area.to_string(),
                &listing.price.to_string(),
                &listing.bedrooms.to_string(),
                &listing.bathrooms.to_string(),
                &listing.listed_at.to_rfc3339(),
                if listing.is_radical { "true" } else { "false" },
            ])
            .map_err(|e| ExportError::Csv {
                path: export_path.to_path_buf(),
                source: e,
            })?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}

/// Export filtered listings as the GeoJSON renderer feed.
pub fn export_geojson<W: Write>(
    listings: &[&Listing],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    check_count(listings.len())?;

    let collection = geojson::feature_collection(listings.iter().copied());
    serde_json::to_writer_pretty(writer, &collection).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(listings.len())
}

fn check_count(count: usize) -> Result<(), ExportError> {
    if count > constants::MAX_EXPORT_LISTINGS {
        return Err(ExportError::TooManyListings {
            count,
            max: constants::MAX_EXPORT_LISTINGS,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{GeoPoint, PropertyType, Purpose};
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;

    fn make_listing(id: &str, title: &str) -> Listing {
        Listing {
            id: id.to_string(),
            purpose: Purpose::Rent,
            city: "الرياض".to_string(),
            district: "العليا".to_string(),
            address: String::new(),
            title: title.to_string(),
            description: String::new(),
            location: GeoPoint::new(46.7, 24.7),
            area: 120.0,
            price: 45_000.0,
            bedrooms: 2,
            bathrooms: 1,
            property_type: PropertyType::Apartment,
            listed_at: Utc.with_ymd_and_hms(2025, 7, 28, 9, 30, 0).unwrap(),
            duration: 24,
            is_radical: false,
        }
    }

    #[test]
    fn test_csv_export() {
        let a = make_listing("r-1", "شقة غرفتين");
        let b = make_listing("r-2", "فيلا دورين");
        let listings = vec![&a, &b];

        let mut buf = Vec::new();
        let count = export_csv(&listings, &mut buf, &PathBuf::from("out.csv")).unwrap();
        assert_eq!(count, 2);

        let output = String::from_utf8(buf).unwrap();
        assert!(output.contains("id,title,purpose"));
        assert!(output.contains("شقة غرفتين"));
        assert!(output.contains("فيلا دورين"));
    }

    #[test]
    fn test_geojson_export() {
        let a = make_listing("r-1", "شقة غرفتين");
        let listings = vec![&a];

        let mut buf = Vec::new();
        let count = export_geojson(&listings, &mut buf, &PathBuf::from("out.geojson")).unwrap();
        assert_eq!(count, 1);

        let output = String::from_utf8(buf).unwrap();
        assert!(output.contains("FeatureCollection"));
        assert!(output.contains("r-1"));
    }
}
