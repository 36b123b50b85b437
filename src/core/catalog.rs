// NestMap - core/catalog.rs
//
// Derived option sets over the session-immutable listing set: the cities
// and districts offered by the location selectors, and the full value
// spans used to parameterise the range sliders.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::model::Listing;

/// All distinct cities, in first-seen fixture order.
pub fn unique_cities(listings: &[Listing]) -> Vec<String> {
    let mut cities: Vec<String> = Vec::new();
    for listing in listings {
        if !cities.iter().any(|c| c == &listing.city) {
            cities.push(listing.city.clone());
        }
    }
    cities
}

/// All distinct districts of one city, in first-seen fixture order.
///
/// An unknown city yields an empty set; the district selector for it
/// offers only the "all districts" wildcard.
pub fn districts_for(listings: &[Listing], city: &str) -> Vec<String> {
    let mut districts: Vec<String> = Vec::new();
    for listing in listings.iter().filter(|l| l.city == city) {
        if !districts.iter().any(|d| d == &listing.district) {
            districts.push(listing.district.clone());
        }
    }
    districts
}

/// (min, max) price over all listings. (0, 0) for an empty set.
pub fn price_span(listings: &[Listing]) -> (f64, f64) {
    span(listings, |l| l.price)
}

/// (min, max) area over all listings. (0, 0) for an empty set.
pub fn area_span(listings: &[Listing]) -> (f64, f64) {
    span(listings, |l| l.area)
}

fn span(listings: &[Listing], value: impl Fn(&Listing) -> f64) -> (f64, f64) {
    let mut iter = listings.iter().map(value);
    let Some(first) = iter.next() else {
        return (0.0, 0.0);
    };
    iter.fold((first, first), |(min, max), v| (min.min(v), max.max(v)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{GeoPoint, Purpose, PropertyType};
    use chrono::{TimeZone, Utc};

    fn listing(id: &str, city: &str, district: &str, area: f64, price: f64) -> Listing {
        Listing {
            id: id.to_string(),
            purpose: Purpose::Rent,
            city: city.to_string(),
            district: district.to_string(),
            address: String::new(),
            title: String::new(),
            description: String::new(),
            location: GeoPoint::new(46.7, 24.7),
            area,
            price,
            bedrooms: 2,
            bathrooms: 1,
            property_type: PropertyType::Apartment,
            listed_at: Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap(),
            duration: 24,
            is_radical: false,
        }
    }

    #[test]
    fn test_unique_cities_first_seen_order() {
        let listings = vec![
            listing("a", "الرياض", "العليا", 100.0, 40_000.0),
            listing("b", "جدة", "الحمراء", 120.0, 50_000.0),
            listing("c", "الرياض", "النرجس", 90.0, 35_000.0),
        ];
        assert_eq!(unique_cities(&listings), vec!["الرياض", "جدة"]);
    }

    #[test]
    fn test_districts_scoped_to_city() {
        let listings = vec![
            listing("a", "الرياض", "العليا", 100.0, 40_000.0),
            listing("b", "جدة", "الحمراء", 120.0, 50_000.0),
            listing("c", "الرياض", "العليا", 90.0, 35_000.0),
            listing("d", "الرياض", "النرجس", 90.0, 35_000.0),
        ];
        assert_eq!(districts_for(&listings, "الرياض"), vec!["العليا", "النرجس"]);
        assert_eq!(districts_for(&listings, "جدة"), vec!["الحمراء"]);
        assert!(districts_for(&listings, "مكة").is_empty());
    }

    #[test]
    fn test_spans() {
        let listings = vec![
            listing("a", "الرياض", "العليا", 100.0, 40_000.0),
            listing("b", "الرياض", "النرجس", 420.0, 160_000.0),
        ];
        assert_eq!(area_span(&listings), (100.0, 420.0));
        assert_eq!(price_span(&listings), (40_000.0, 160_000.0));
    }

    #[test]
    fn test_spans_of_empty_set_are_zero() {
        assert_eq!(area_span(&[]), (0.0, 0.0));
        assert_eq!(price_span(&[]), (0.0, 0.0));
    }
}
