// NestMap - core/filter.rs
//
// Criteria model and predicate engine for listings.
// All clauses are AND-combined when applied.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::model::{Listing, Purpose};
use crate::util::constants;
use chrono::{DateTime, Utc};

// =============================================================================
// Date range
// =============================================================================

/// Optional listing-date window. Either bound may be `None`, meaning
/// unbounded on that side. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    /// True when neither bound is set (the clause is a no-op).
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// True when `ts` falls inside the window (inclusive at both ends).
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        if let Some(from) = self.from {
            if ts < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if ts > to {
                return false;
            }
        }
        true
    }
}

// =============================================================================
// Filter criteria
// =============================================================================

/// Complete filter criteria. All fields are AND-combined when applied.
///
/// A criteria value is immutable once built; updates go through
/// [`FilterCriteria::reduce`], which returns a new value with the
/// store-level invariants enforced (city change clears district, range
/// bounds never invert).
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    /// Rent or sale.
    pub purpose: Purpose,

    /// Selected city. Always set; listings in other cities never match.
    pub city: String,

    /// Selected district within the city. `None` = all districts.
    pub district: Option<String>,

    /// Maximum listing recency in hours (inclusive upper bound).
    pub max_duration_hours: i64,

    /// When true, only listings flagged radical match.
    pub radical_only: bool,

    /// Inclusive area window in m², `[min, max]`.
    pub area_range: [f64; 2],

    /// Inclusive price window, `[min, max]`.
    pub price_range: [f64; 2],

    /// Optional listing-date window.
    pub date_range: DateRange,
}

impl Default for FilterCriteria {
    /// The fixed first-render criteria: rent listings in the default city,
    /// three-month recency window, full area/price spans, no date bound.
    fn default() -> Self {
        Self {
            purpose: Purpose::Rent,
            city: constants::DEFAULT_CITY.to_string(),
            district: None,
            max_duration_hours: constants::DEFAULT_DURATION_HOURS,
            radical_only: false,
            area_range: constants::DEFAULT_AREA_RANGE,
            price_range: constants::DEFAULT_PRICE_RANGE,
            date_range: DateRange::default(),
        }
    }
}

// =============================================================================
// Criteria updates (reducer)
// =============================================================================

/// One named criteria mutation. Closed sum type so the reducer match is
/// exhaustive; there is no stringly-typed field access anywhere.
#[derive(Debug, Clone, PartialEq)]
pub enum CriteriaUpdate {
    SetPurpose(Purpose),
    /// Selecting a city resets the district to "all districts".
    SetCity(String),
    SetDistrict(Option<String>),
    SetDuration(i64),
    SetRadical(bool),
    SetAreaRange([f64; 2]),
    SetPriceRange([f64; 2]),
    SetDateRange {
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    },
}

impl FilterCriteria {
    /// Apply one update, returning the resulting criteria.
    ///
    /// Invariants enforced here rather than at call sites:
    /// - `SetCity` clears the district selection.
    /// - Range updates never store an inverted pair; see [`clamp_range`].
    pub fn reduce(&self, update: CriteriaUpdate) -> FilterCriteria {
        let mut next = self.clone();
        match update {
            CriteriaUpdate::SetPurpose(purpose) => next.purpose = purpose,
            CriteriaUpdate::SetCity(city) => {
                next.city = city;
                next.district = None;
            }
            CriteriaUpdate::SetDistrict(district) => next.district = district,
            CriteriaUpdate::SetDuration(hours) => next.max_duration_hours = hours,
            CriteriaUpdate::SetRadical(radical) => next.radical_only = radical,
            CriteriaUpdate::SetAreaRange(range) => {
                next.area_range = clamp_range(self.area_range, sanitize_range(range));
            }
            CriteriaUpdate::SetPriceRange(range) => {
                next.price_range = clamp_range(self.price_range, sanitize_range(range));
            }
            CriteriaUpdate::SetDateRange { from, to } => {
                next.date_range = DateRange { from, to };
            }
        }
        next
    }
}

/// Normalise one numeric bound coming from a free-text input.
///
/// Non-finite and negative values become 0: malformed input is recovered
/// locally, never propagated as an error.
pub fn normalize_bound(raw: f64) -> f64 {
    if raw.is_finite() && raw > 0.0 {
        raw
    } else {
        0.0
    }
}

fn sanitize_range(range: [f64; 2]) -> [f64; 2] {
    [normalize_bound(range[0]), normalize_bound(range[1])]
}

/// Clamp a requested range against the currently stored one so that
/// `min <= max` always holds.
///
/// When the requested pair is inverted, the bound that moved is pinned to
/// the one that stayed where it was: dragging the lower bound above the
/// upper collapses the range at the upper bound, and vice versa. If both
/// bounds moved and still invert, the pair collapses at the requested
/// upper bound.
pub fn clamp_range(current: [f64; 2], requested: [f64; 2]) -> [f64; 2] {
    let [lo, hi] = requested;
    if lo <= hi {
        return requested;
    }
    if hi == current[1] {
        // Upper bound is stationary: the lower bound moved past it.
        [hi, hi]
    } else if lo == current[0] {
        // Lower bound is stationary: the upper bound moved below it.
        [lo, lo]
    } else {
        [hi, hi]
    }
}

// =============================================================================
// Predicate engine
// =============================================================================

/// Apply criteria to a slice of listings, returning indices of matches.
///
/// Returns a Vec of indices into the original listings slice, preserving
/// the original relative order. This avoids copying listings and keeps the
/// derived view a cheap projection over the session-immutable set.
pub fn apply_criteria(listings: &[Listing], criteria: &FilterCriteria) -> Vec<usize> {
    listings
        .iter()
        .enumerate()
        .filter(|(_, listing)| matches_all(listing, criteria))
        .map(|(idx, _)| idx)
        .collect()
}

/// Check if a single listing matches all criteria clauses.
///
/// Pure conjunction; clause order is chosen cheapest-first so equality
/// checks short-circuit before the date comparison.
pub fn matches_all(listing: &Listing, criteria: &FilterCriteria) -> bool {
    // Purpose
    if listing.purpose != criteria.purpose {
        return false;
    }

    // City
    if listing.city != criteria.city {
        return false;
    }

    // District: None is a wildcard over the whole city
    if let Some(ref district) = criteria.district {
        if listing.district != *district {
            return false;
        }
    }

    // Recency window (inclusive)
    if listing.duration > criteria.max_duration_hours {
        return false;
    }

    // Radical flag: the criterion only ever narrows
    if criteria.radical_only && !listing.is_radical {
        return false;
    }

    // Area window (inclusive at both ends)
    if listing.area < criteria.area_range[0] || listing.area > criteria.area_range[1] {
        return false;
    }

    // Price window (inclusive at both ends)
    if listing.price < criteria.price_range[0] || listing.price > criteria.price_range[1] {
        return false;
    }

    // Listing-date window
    if !criteria.date_range.is_unbounded() && !criteria.date_range.contains(listing.listed_at) {
        return false;
    }

    true
}

// =============================================================================
// Tests
// =============================================================================
