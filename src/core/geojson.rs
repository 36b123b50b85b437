// NestMap - core/geojson.rs
//
// The output feed toward the map renderer: a GeoJSON FeatureCollection
// derived from the current filtered set. Each feature carries the fields
// the renderer needs for marker styling (two-colour by luxury flag) and
// popup content. Consumers replace their source data wholesale on every
// publish; nothing here is diffed.

use crate::core::model::Listing;
use serde::Serialize;

/// A GeoJSON FeatureCollection over point features.
#[derive(Debug, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub features: Vec<Feature>,
}

/// One GeoJSON point feature for a listing.
#[derive(Debug, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub geometry: Geometry,
    pub properties: FeatureProperties,
}

#[derive(Debug, Serialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// `[longitude, latitude]`.
    pub coordinates: [f64; 2],
}

/// Marker/popup payload. Field names are part of the renderer contract.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureProperties {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub area: f64,
    pub purpose: String,
    pub district: String,
    pub is_luxury: bool,
}

/// Build the renderer feed from the current filtered listings.
pub fn feature_collection<'a, I>(listings: I) -> FeatureCollection
where
    I: IntoIterator<Item = &'a Listing>,
{
    FeatureCollection {
        kind: "FeatureCollection",
        features: listings.into_iter().map(feature).collect(),
    }
}

fn feature(listing: &Listing) -> Feature {
    Feature {
        kind: "Feature",
        geometry: Geometry {
            kind: "Point",
            coordinates: listing.location.coordinates,
        },
        properties: FeatureProperties {
            id: listing.id.clone(),
            title: listing.title.clone(),
            price: listing.price,
            area: listing.area,
            purpose: listing.purpose.label().to_string(),
            district: listing.district.clone(),
            is_luxury: listing.is_radical,
        },
    }
}
