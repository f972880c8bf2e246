//! Port for the estates collection.
//!
//! Besides per-document CRUD this port exposes the store's pipeline
//! capability for listings: a conjunctive filter matched, sorted
//! newest-first, windowed with skip/limit, and counted before pagination.

use async_trait::async_trait;
use pagination::Window;

use crate::domain::estate::{Estate, EstateCategory};
use crate::domain::id::{EstateId, UserId};

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by estate repository adapters.
    pub enum EstateRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "estate repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "estate repository query failed: {message}",
    }
}

/// Conjunctive estate match criteria lowered into the store pipeline.
///
/// Every field is optional and absent fields match everything; an empty
/// `categories` list applies no category filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EstateSearchFilter {
    /// Case-insensitive substring match on the title.
    pub title_substring: Option<String>,
    /// Inclusive lower price bound.
    pub price_min: Option<f64>,
    /// Inclusive upper price bound.
    pub price_max: Option<f64>,
    /// Category set membership; empty means no filter.
    pub categories: Vec<EstateCategory>,
    /// Restrict to estates owned by this user.
    pub owner_id: Option<UserId>,
    /// Restrict to estates with one of these ids.
    pub ids: Option<Vec<EstateId>>,
}

impl EstateSearchFilter {
    /// Whether an estate satisfies every present criterion.
    #[must_use]
    pub fn matches(&self, estate: &Estate) -> bool {
        if let Some(needle) = &self.title_substring {
            if !estate
                .title
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        if let Some(min) = self.price_min {
            if estate.price < min {
                return false;
            }
        }
        if let Some(max) = self.price_max {
            if estate.price > max {
                return false;
            }
        }
        if !self.categories.is_empty() && !self.categories.contains(&estate.category) {
            return false;
        }
        if let Some(owner_id) = &self.owner_id {
            if &estate.user_id != owner_id {
                return false;
            }
        }
        if let Some(ids) = &self.ids {
            if !ids.contains(&estate.id) {
                return false;
            }
        }
        true
    }
}

/// Port for estate document storage, retrieval, and search.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EstateRepository: Send + Sync {
    /// Fetch an estate by id. Returns `None` when the id names no document.
    async fn find_by_id(&self, id: &EstateId) -> Result<Option<Estate>, EstateRepositoryError>;

    /// Fetch every estate whose id appears in `ids`, preserving input
    /// order and skipping ids that resolve to nothing.
    async fn find_many_by_ids(
        &self,
        ids: &[EstateId],
    ) -> Result<Vec<Estate>, EstateRepositoryError>;

    /// Insert a new estate document.
    async fn insert(&self, estate: &Estate) -> Result<(), EstateRepositoryError>;

    /// Replace an existing estate document wholesale.
    async fn save(&self, estate: &Estate) -> Result<(), EstateRepositoryError>;

    /// Delete an estate document. Returns whether a document was removed.
    async fn delete(&self, id: &EstateId) -> Result<bool, EstateRepositoryError>;

    /// Run the search pipeline: match the filter, sort newest-first, apply
    /// the window, and return the slice together with the pre-pagination
    /// match count.
    async fn search(
        &self,
        filter: &EstateSearchFilter,
        window: Window,
    ) -> Result<(Vec<Estate>, u64), EstateRepositoryError>;
}

/// Fixture implementation for tests that do not exercise estate storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEstateRepository;

#[async_trait]
impl EstateRepository for FixtureEstateRepository {
    async fn find_by_id(&self, _id: &EstateId) -> Result<Option<Estate>, EstateRepositoryError> {
        Ok(None)
    }

    async fn find_many_by_ids(
        &self,
        _ids: &[EstateId],
    ) -> Result<Vec<Estate>, EstateRepositoryError> {
        Ok(Vec::new())
    }

    async fn insert(&self, _estate: &Estate) -> Result<(), EstateRepositoryError> {
        Ok(())
    }

    async fn save(&self, _estate: &Estate) -> Result<(), EstateRepositoryError> {
        Ok(())
    }

    async fn delete(&self, _id: &EstateId) -> Result<bool, EstateRepositoryError> {
        Ok(false)
    }

    async fn search(
        &self,
        _filter: &EstateSearchFilter,
        _window: Window,
    ) -> Result<(Vec<Estate>, u64), EstateRepositoryError> {
        Ok((Vec::new(), 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::estate::NewEstate;
    use chrono::Utc;
    use rstest::rstest;

    fn estate(title: &str, price: f64, category: EstateCategory) -> Estate {
        Estate::from_new(
            EstateId::random(),
            NewEstate {
                user_id: UserId::random(),
                title: title.to_owned(),
                description: String::new(),
                price,
                square_meters: 50.0,
                total_rooms: 2,
                category,
                floor_number: Some(1),
                images: vec![],
                longitude: 0.0,
                latitude: 0.0,
            },
            Utc::now(),
        )
    }

    #[rstest]
    fn default_filter_matches_everything() {
        let filter = EstateSearchFilter::default();
        assert!(filter.matches(&estate("Loft", 100.0, EstateCategory::Apartment)));
    }

    #[rstest]
    #[case("loft", true)]
    #[case("LOFT", true)]
    #[case("oft dow", true)]
    #[case("penthouse", false)]
    fn title_filter_is_case_insensitive_substring(#[case] needle: &str, #[case] expected: bool) {
        let filter = EstateSearchFilter {
            title_substring: Some(needle.to_owned()),
            ..EstateSearchFilter::default()
        };
        assert_eq!(
            filter.matches(&estate("Loft downtown", 100.0, EstateCategory::Apartment)),
            expected
        );
    }

    #[rstest]
    #[case(Some(100.0), None, true)]
    #[case(Some(100.1), None, false)]
    #[case(None, Some(100.0), true)]
    #[case(None, Some(99.9), false)]
    #[case(Some(50.0), Some(150.0), true)]
    fn price_bounds_are_inclusive(
        #[case] min: Option<f64>,
        #[case] max: Option<f64>,
        #[case] expected: bool,
    ) {
        let filter = EstateSearchFilter {
            price_min: min,
            price_max: max,
            ..EstateSearchFilter::default()
        };
        assert_eq!(
            filter.matches(&estate("Loft", 100.0, EstateCategory::Apartment)),
            expected
        );
    }

    #[rstest]
    fn category_filter_is_set_membership() {
        let filter = EstateSearchFilter {
            categories: vec![EstateCategory::House, EstateCategory::Villa],
            ..EstateSearchFilter::default()
        };
        assert!(filter.matches(&estate("Cottage", 100.0, EstateCategory::House)));
        assert!(!filter.matches(&estate("Loft", 100.0, EstateCategory::Apartment)));
    }

    #[tokio::test]
    async fn fixture_repository_search_returns_empty_page() {
        let repo = FixtureEstateRepository;
        let window = Window::new(0, 10).expect("valid window");
        let (items, total) = repo
            .search(&EstateSearchFilter::default(), window)
            .await
            .expect("fixture search succeeds");
        assert!(items.is_empty());
        assert_eq!(total, 0);
    }
}
