// NestMap - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies (core depends on std, serde, chrono only).
//
// These types are the shared vocabulary across all layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Listing (one real-estate record)
// =============================================================================

/// A single real-estate listing, immutable for the lifetime of a session.
///
/// This is the core data unit that flows through filtering, the GeoJSON
/// output feed, and export. Loaded once from fixture data at startup;
/// never mutated or individually added/removed at runtime.
///
/// Wire format is camelCase JSON, matching the fixture files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// Unique listing identifier.
    pub id: String,

    /// Whether the listing is offered for rent or for sale.
    pub purpose: Purpose,

    /// City the listing is located in.
    pub city: String,

    /// District within the city.
    pub district: String,

    /// Street address.
    pub address: String,

    /// Short display title.
    pub title: String,

    /// Free-text description.
    pub description: String,

    /// Geographic point, GeoJSON axis order (longitude, latitude).
    pub location: GeoPoint,

    /// Floor area in m².
    pub area: f64,

    /// Asking price (rent: per year; sale: total).
    pub price: f64,

    /// Number of bedrooms.
    pub bedrooms: u8,

    /// Number of bathrooms.
    pub bathrooms: u8,

    /// Property category.
    pub property_type: PropertyType,

    /// When the listing was published, UTC.
    pub listed_at: DateTime<Utc>,

    /// Recency of the listing in hours (how long it has been live).
    pub duration: i64,

    /// Marks an outlier deal or premium property. Used both as a filter
    /// and as the map-marker style selector.
    pub is_radical: bool,
}

// =============================================================================
// Purpose
// =============================================================================

/// Listing purpose: offered for rent or for sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    #[default]
    Rent,
    Sale,
}

impl Purpose {
    /// Both variants in display order.
    pub fn all() -> &'static [Purpose] {
        &[Purpose::Rent, Purpose::Sale]
    }

    /// Wire/display label.
    pub fn label(&self) -> &'static str {
        match self {
            Purpose::Rent => "rent",
            Purpose::Sale => "sale",
        }
    }

    /// Parse a wire label. Matching is case-insensitive.
    pub fn parse(raw: &str) -> Option<Purpose> {
        match raw.to_lowercase().as_str() {
            "rent" => Some(Purpose::Rent),
            "sale" => Some(Purpose::Sale),
            _ => None,
        }
    }
}

impl std::fmt::Display for Purpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Property type
// =============================================================================

/// Property category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    #[default]
    Apartment,
    Villa,
    Office,
}

impl PropertyType {
    /// Wire/display label.
    pub fn label(&self) -> &'static str {
        match self {
            PropertyType::Apartment => "apartment",
            PropertyType::Villa => "villa",
            PropertyType::Office => "office",
        }
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Geographic point
// =============================================================================

/// A WGS84 point in GeoJSON axis order: `[longitude, latitude]`.
///
/// The fixture format carries the point as a GeoJSON-style object so the
/// same record can be handed to the map renderer without re-projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// `[longitude, latitude]`.
    pub coordinates: [f64; 2],
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            coordinates: [longitude, latitude],
        }
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }

    /// True when both axes are finite and inside WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        let [lng, lat] = self.coordinates;
        lng.is_finite() && lat.is_finite() && (-180.0..=180.0).contains(&lng) && (-90.0..=90.0).contains(&lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purpose_parse_case_insensitive() {
        assert_eq!(Purpose::parse("rent"), Some(Purpose::Rent));
        assert_eq!(Purpose::parse("SALE"), Some(Purpose::Sale));
        assert_eq!(Purpose::parse("lease"), None);
    }

    #[test]
    fn test_purpose_serde_labels() {
        let json = serde_json::to_string(&Purpose::Sale).unwrap();
        assert_eq!(json, "\"sale\"");
        let back: Purpose = serde_json::from_str("\"rent\"").unwrap();
        assert_eq!(back, Purpose::Rent);
    }

    #[test]
    fn test_geo_point_bounds() {
        assert!(GeoPoint::new(46.6753, 24.7136).is_valid());
        assert!(!GeoPoint::new(181.0, 24.0).is_valid());
        assert!(!GeoPoint::new(46.0, -91.0).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 24.0).is_valid());
    }

    #[test]
    fn test_listing_round_trips_camel_case() {
        let json = r#"{
            "id": "r-1",
            "purpose": "rent",
            "city": "الرياض",
            "district": "العليا",
            "address": "شارع العليا العام",
            "title": "شقة غرفتين",
            "description": "قريبة من محطة المترو",
            "location": { "coordinates": [46.6753, 24.7136] },
            "area": 120.0,
            "price": 45000.0,
            "bedrooms": 2,
            "bathrooms": 1,
            "propertyType": "apartment",
            "listedAt": "2025-07-28T09:30:00Z",
            "duration": 24,
            "isRadical": false
        }"#;
        let listing: Listing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.property_type, PropertyType::Apartment);
        assert!(!listing.is_radical);
        assert_eq!(listing.location.longitude(), 46.6753);

        // Field names must stay camelCase on the way back out.
        let out = serde_json::to_string(&listing).unwrap();
        assert!(out.contains("\"listedAt\""));
        assert!(out.contains("\"isRadical\""));
        assert!(out.contains("\"propertyType\""));
    }
}
