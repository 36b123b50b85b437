// NestMap - app/store.rs
//
// The filter store: single source of truth for the listing set, the
// active criteria, and the derived filtered view. Every mutation goes
// through `apply`, which reduces the update, recomputes the derived view,
// and notifies subscribers before returning; no intermediate state is
// ever observable from outside.

use crate::core::catalog;
use crate::core::filter::{self, CriteriaUpdate, FilterCriteria};
use crate::core::geojson::{self, FeatureCollection};
use crate::core::model::Listing;
use crate::util::constants;
use crate::util::error::CriteriaError;
use std::time::{Duration, Instant};

/// Callback registered with [`ListingStore::subscribe`]. Receives the full
/// new derived view on every publish, never a diff.
pub type Subscriber = Box<dyn FnMut(&FilteredView)>;

// =============================================================================
// Derived view snapshot
// =============================================================================

/// A read-only snapshot of the derived state: the criteria that produced
/// it and the listings that matched, in original fixture order.
#[derive(Debug, Clone, Copy)]
pub struct FilteredView<'a> {
    criteria: &'a FilterCriteria,
    listings: &'a [Listing],
    indices: &'a [usize],
    has_interacted: bool,
}

impl<'a> FilteredView<'a> {
    /// The criteria this view was derived from.
    pub fn criteria(&self) -> &'a FilterCriteria {
        self.criteria
    }

    /// Number of matching listings.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Whether any user-driven update has been applied since startup.
    /// Consumers use this to distinguish the default initial render from
    /// a filtered-down state when deciding to show the empty affordance.
    pub fn has_interacted(&self) -> bool {
        self.has_interacted
    }

    /// Iterate the matching listings in original relative order.
    pub fn listings(&self) -> impl Iterator<Item = &'a Listing> + '_ {
        self.indices.iter().map(|&idx| &self.listings[idx])
    }

    /// Collect the matching listings (borrowed) for export.
    pub fn matches(&self) -> Vec<&'a Listing> {
        self.listings().collect()
    }

    /// Build the GeoJSON renderer feed for this view.
    pub fn to_feature_collection(&self) -> FeatureCollection {
        geojson::feature_collection(self.listings())
    }
}

// =============================================================================
// Empty-result notice
// =============================================================================

/// Transient signal raised when a user-driven update produced an empty
/// view. Purely presentational: it auto-dismisses after a fixed timeout,
/// checked lazily against a caller-supplied clock instant.
#[derive(Debug, Clone)]
pub struct Notice {
    message: String,
    raised_at: Instant,
}

impl Notice {
    pub fn message(&self) -> &str {
        &self.message
    }

    /// True until the fixed dismissal timeout has elapsed at `now`.
    pub fn is_active(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.raised_at)
            < Duration::from_millis(constants::NOTICE_DISMISS_MS)
    }
}

// =============================================================================
// Listing store
// =============================================================================

/// Single source of truth for listings, criteria, and derived results.
///
/// The store is the sole writer of criteria and derived state. All
/// execution is synchronous and single-threaded: `apply` runs reduce →
/// rescan → publish to completion before returning.
pub struct ListingStore {
    /// The session-immutable listing set.
    listings: Vec<Listing>,

    /// Current criteria. Replaced wholesale by the reducer on each apply.
    criteria: FilterCriteria,

    /// Indices of listings matching the current criteria (into `listings`).
    filtered: Vec<usize>,

    /// False until the first user-driven update.
    has_interacted: bool,

    /// Pending empty-result notice, if any.
    notice: Option<Notice>,

    /// Registered view observers.
    subscribers: Vec<Subscriber>,
}

impl ListingStore {
    /// Create a store over `listings` with initial criteria.
    ///
    /// The derived view is computed here, so the store is consistent from
    /// the first observable moment. The initial render is not "interacted":
    /// an empty default view raises no notice.
    pub fn new(listings: Vec<Listing>, criteria: FilterCriteria) -> Self {
        let filtered = filter::apply_criteria(&listings, &criteria);
        tracing::debug!(
            total = listings.len(),
            matched = filtered.len(),
            "Listing store initialised"
        );
        Self {
            listings,
            criteria,
            filtered,
            has_interacted: false,
            notice: None,
            subscribers: Vec::new(),
        }
    }

    /// Apply one criteria update.
    ///
    /// Reduces the update into new criteria, recomputes the derived view
    /// with a single linear scan, publishes the new view to subscribers,
    /// and returns it. A rejected update leaves every piece of state
    /// untouched.
    pub fn apply(&mut self, update: CriteriaUpdate) -> Result<FilteredView<'_>, CriteriaError> {
        // District membership is validated against the city the criteria
        // currently select; the reducer itself stays a pure function.
        if let CriteriaUpdate::SetDistrict(Some(ref district)) = update {
            let districts = catalog::districts_for(&self.listings, &self.criteria.city);
            if !districts.iter().any(|d| d == district) {
                return Err(CriteriaError::DistrictNotInCity {
                    city: self.criteria.city.clone(),
                    district: district.clone(),
                });
            }
        }

        self.criteria = self.criteria.reduce(update);
        self.has_interacted = true;
        self.recompute();
        self.publish();
        Ok(self.view())
    }

    /// Register a view observer. Called with the full derived collection
    /// on every subsequent publish. For the current state at registration
    /// time, read [`ListingStore::view`] directly.
    pub fn subscribe(&mut self, subscriber: Subscriber) {
        self.subscribers.push(subscriber);
    }

    /// Current derived view snapshot.
    pub fn view(&self) -> FilteredView<'_> {
        FilteredView {
            criteria: &self.criteria,
            listings: &self.listings,
            indices: &self.filtered,
            has_interacted: self.has_interacted,
        }
    }

    /// Current criteria.
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// The full (unfiltered) listing set.
    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    /// Cities available in the listing set, first-seen order.
    pub fn cities(&self) -> Vec<String> {
        catalog::unique_cities(&self.listings)
    }

    /// Districts of the currently selected city, first-seen order.
    pub fn districts(&self) -> Vec<String> {
        catalog::districts_for(&self.listings, &self.criteria.city)
    }

    /// The pending empty-result notice, if it is still active at `now`.
    pub fn active_notice(&self, now: Instant) -> Option<&Notice> {
        self.notice.as_ref().filter(|n| n.is_active(now))
    }

    fn recompute(&mut self) {
        self.filtered = filter::apply_criteria(&self.listings, &self.criteria);

        if self.filtered.is_empty() && self.has_interacted {
            tracing::debug!("Filter produced an empty view; raising notice");
            self.notice = Some(Notice {
                message: "No listings match the current filters.".to_string(),
                raised_at: Instant::now(),
            });
        } else if !self.filtered.is_empty() {
            self.notice = None;
        }
    }

    fn publish(&mut self) {
        let view = FilteredView {
            criteria: &self.criteria,
            listings: &self.listings,
            indices: &self.filtered,
            has_interacted: self.has_interacted,
        };
        for subscriber in self.subscribers.iter_mut() {
            subscriber(&view);
        }
    }
}

impl std::fmt::Debug for ListingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingStore")
            .field("listings", &self.listings.len())
            .field("filtered", &self.filtered.len())
            .field("criteria", &self.criteria)
            .field("has_interacted", &self.has_interacted)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::apply_criteria;
    use crate::core::model::{GeoPoint, PropertyType, Purpose};
    use chrono::{TimeZone, Utc};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn listing(id: &str, purpose: Purpose, city: &str, district: &str, radical: bool) -> Listing {
        Listing {
            id: id.to_string(),
            purpose,
            city: city.to_string(),
            district: district.to_string(),
            address: String::new(),
            title: format!("عرض {id}"),
            description: String::new(),
            location: GeoPoint::new(46.7, 24.7),
            area: 120.0,
            price: 50_000.0,
            bedrooms: 2,
            bathrooms: 1,
            property_type: PropertyType::Apartment,
            listed_at: Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap(),
            duration: 24,
            is_radical: radical,
        }
    }

    fn sample_store() -> ListingStore {
        ListingStore::new(
            vec![
                listing("a", Purpose::Rent, "الرياض", "العليا", false),
                listing("b", Purpose::Rent, "الرياض", "النرجس", true),
                listing("c", Purpose::Sale, "الرياض", "العليا", false),
                listing("d", Purpose::Rent, "جدة", "الحمراء", false),
            ],
            FilterCriteria::default(),
        )
    }

    #[test]
    fn test_initial_view_is_computed_and_not_interacted() {
        let store = sample_store();
        let view = store.view();
        assert_eq!(view.len(), 2); // a + b: rent in الرياض
        assert!(!view.has_interacted());
        assert!(store.active_notice(Instant::now()).is_none());
    }

    #[test]
    fn test_apply_recomputes_before_returning() {
        let mut store = sample_store();
        let len = store
            .apply(CriteriaUpdate::SetPurpose(Purpose::Sale))
            .unwrap()
            .len();
        assert_eq!(len, 1); // only c
        assert!(store.view().has_interacted());
    }

    #[test]
    fn test_derived_view_never_stale() {
        let mut store = sample_store();
        store
            .apply(CriteriaUpdate::SetCity("جدة".to_string()))
            .unwrap();
        // The stored indices must be exactly what the pure engine derives
        // from the last-applied criteria.
        let expected = apply_criteria(store.listings(), store.criteria());
        let actual: Vec<String> = store.view().listings().map(|l| l.id.clone()).collect();
        let expected_ids: Vec<String> = expected
            .iter()
            .map(|&i| store.listings()[i].id.clone())
            .collect();
        assert_eq!(actual, expected_ids);
        assert_eq!(actual, vec!["d".to_string()]);
    }

    #[test]
    fn test_set_city_resets_district() {
        let mut store = sample_store();
        store
            .apply(CriteriaUpdate::SetDistrict(Some("العليا".to_string())))
            .unwrap();
        assert_eq!(store.criteria().district.as_deref(), Some("العليا"));

        store
            .apply(CriteriaUpdate::SetCity("جدة".to_string()))
            .unwrap();
        assert_eq!(store.criteria().city, "جدة");
        assert_eq!(store.criteria().district, None);
    }

    #[test]
    fn test_district_outside_city_is_rejected_without_side_effects() {
        let mut store = sample_store();
        let before = store.criteria().clone();

        let result = store.apply(CriteriaUpdate::SetDistrict(Some("الحمراء".to_string())));
        assert!(matches!(
            result,
            Err(CriteriaError::DistrictNotInCity { .. })
        ));
        assert_eq!(store.criteria(), &before);
        assert!(!store.view().has_interacted());
    }

    #[test]
    fn test_subscribers_receive_full_collection_every_publish() {
        let mut store = sample_store();
        let seen: Rc<RefCell<Vec<Vec<String>>>> = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        store.subscribe(Box::new(move |view| {
            sink.borrow_mut()
                .push(view.listings().map(|l| l.id.clone()).collect());
        }));

        store
            .apply(CriteriaUpdate::SetRadical(true))
            .unwrap();
        store
            .apply(CriteriaUpdate::SetRadical(false))
            .unwrap();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], vec!["b".to_string()]); // only the radical one
        assert_eq!(seen[1], vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_empty_result_raises_notice_that_expires() {
        let mut store = sample_store();
        // Radical-only with no radical listings in scope.
        store
            .apply(CriteriaUpdate::SetCity("جدة".to_string()))
            .unwrap();
        let len = store.apply(CriteriaUpdate::SetRadical(true)).unwrap().len();
        assert_eq!(len, 0);

        let now = Instant::now();
        let notice = store.active_notice(now).expect("notice should be active");
        assert!(!notice.message().is_empty());

        // After the fixed timeout the notice reports inactive: lazy
        // expiry, nothing to cancel.
        let later = now + Duration::from_millis(constants::NOTICE_DISMISS_MS + 1);
        assert!(store.active_notice(later).is_none());
    }

    #[test]
    fn test_notice_cleared_when_results_return() {
        let mut store = sample_store();
        store
            .apply(CriteriaUpdate::SetCity("مكة".to_string()))
            .unwrap();
        assert!(store.active_notice(Instant::now()).is_some());

        store
            .apply(CriteriaUpdate::SetCity("الرياض".to_string()))
            .unwrap();
        assert!(store.active_notice(Instant::now()).is_none());
    }

    #[test]
    fn test_unknown_city_yields_empty_view_not_error() {
        let mut store = sample_store();
        let len = store
            .apply(CriteriaUpdate::SetCity("مكة".to_string()))
            .unwrap()
            .len();
        assert_eq!(len, 0);
    }

    #[test]
    fn test_catalog_accessors_follow_selection() {
        let mut store = sample_store();
        assert_eq!(store.cities(), vec!["الرياض", "جدة"]);
        assert_eq!(store.districts(), vec!["العليا", "النرجس"]);

        store
            .apply(CriteriaUpdate::SetCity("جدة".to_string()))
            .unwrap();
        assert_eq!(store.districts(), vec!["الحمراء"]);
    }

    #[test]
    fn test_view_feature_collection_matches_filtered_set() {
        let store = sample_store();
        let fc = store.view().to_feature_collection();
        assert_eq!(fc.features.len(), store.view().len());
        assert!(fc.features.iter().any(|f| f.properties.is_luxury));
    }
}
