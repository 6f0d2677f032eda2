//! Review repository interface

use async_trait::async_trait;

use super::model::Review;
use crate::domain::DomainResult;

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Insert a new review. Fails with a conflict if a review already
    /// exists for the same `reservation_id` (unique index on that field).
    async fn insert(&self, review: Review) -> DomainResult<()>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Review>>;
    async fn find_by_reservation(&self, reservation_id: &str) -> DomainResult<Option<Review>>;

    /// All reviews whose `reservation_id` is in `reservation_ids`. This is
    /// the scan the rating recomputation runs over.
    async fn find_by_reservation_ids(&self, reservation_ids: &[String])
        -> DomainResult<Vec<Review>>;

    /// Replace an existing review. `reservation_id` is immutable.
    async fn update(&self, review: Review) -> DomainResult<()>;

    async fn delete(&self, id: &str) -> DomainResult<()>;
}
