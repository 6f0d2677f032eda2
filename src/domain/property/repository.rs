//! Property repository interface

use async_trait::async_trait;

use super::model::{Property, RatingStats};
use crate::domain::review::Review;
use crate::domain::DomainResult;

#[async_trait]
pub trait PropertyRepository: Send + Sync {
    async fn insert(&self, property: Property) -> DomainResult<()>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Property>>;

    async fn list_by_manager(&self, manager_id: &str) -> DomainResult<Vec<Property>>;

    /// Replace a property document. The derived fields (`rating_stats`,
    /// `latest_reviews`) and the version stamp are owned by the store:
    /// whatever the caller passes for them is ignored in favour of the
    /// stored values, and the version is bumped. Derived state changes only
    /// through [`update_derived`](Self::update_derived).
    async fn update(&self, property: Property) -> DomainResult<()>;

    async fn delete(&self, id: &str) -> DomainResult<()>;

    /// Compare-and-swap write of the derived rating summary and latest-
    /// reviews cache. Fails with a concurrency conflict if the stored
    /// version no longer equals `expected_version`; the caller re-reads and
    /// retries.
    async fn update_derived(
        &self,
        id: &str,
        expected_version: u64,
        stats: RatingStats,
        latest_reviews: Vec<Review>,
    ) -> DomainResult<()>;
}
