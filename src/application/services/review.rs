//! Review service — ingestion, manager replies, and rating aggregation
//!
//! Reviews are the source of truth; a property's `rating_stats` and
//! `latest_reviews` are recomputed from a full scan and written back with
//! a compare-and-swap on the property version. Two racing recomputations
//! therefore converge on a state covering every review present when the
//! later one completes; the loser re-reads and retries.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::application::ports::{Actor, ReservationDirectory};
use crate::config::AggregationConfig;
use crate::domain::{
    DomainError, DomainResult, PropertyRepository, RatingStats, Review, ReviewRepository,
};
use crate::shared::{retry_transient, RetryConfig};
use rust_decimal::Decimal;

/// Incoming review payload, tied to a completed reservation.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReview {
    pub reservation_id: String,
    /// Defaults to today; date-only.
    pub creation_date: Option<NaiveDate>,
    pub text: String,
    pub rating: u8,
    pub cleanliness: Decimal,
    pub communication: Decimal,
    pub location: Decimal,
    pub value: Decimal,
}

pub struct ReviewService {
    reviews: Arc<dyn ReviewRepository>,
    properties: Arc<dyn PropertyRepository>,
    reservations: Arc<dyn ReservationDirectory>,
    aggregation: AggregationConfig,
    retry: RetryConfig,
}

impl ReviewService {
    pub fn new(
        reviews: Arc<dyn ReviewRepository>,
        properties: Arc<dyn PropertyRepository>,
        reservations: Arc<dyn ReservationDirectory>,
        aggregation: AggregationConfig,
        retry: RetryConfig,
    ) -> Self {
        Self {
            reviews,
            properties,
            reservations,
            aggregation,
            retry,
        }
    }

    /// Route the reservation to its property; a reservation the directory
    /// does not know is a dangling reference.
    async fn property_for(&self, reservation_id: &str) -> DomainResult<String> {
        self.reservations
            .property_for_reservation(reservation_id)
            .await?
            .ok_or_else(|| DomainError::Reference {
                entity: "Review",
                field: "reservation_id",
                value: reservation_id.to_string(),
            })
    }

    // ── Ingestion ───────────────────────────────────────────────

    /// Create a review for a completed reservation. At most one review per
    /// reservation; all five scores are bounds-checked before any write.
    pub async fn submit_review(&self, new_review: NewReview) -> DomainResult<Review> {
        let property_id = self.property_for(&new_review.reservation_id).await?;

        let review = Review::new(
            new_review.reservation_id,
            new_review
                .creation_date
                .unwrap_or_else(|| Utc::now().date_naive()),
            new_review.text,
            new_review.rating,
            new_review.cleanliness,
            new_review.communication,
            new_review.location,
            new_review.value,
        )?;

        self.reviews.insert(review.clone()).await?;
        self.recompute_rating_stats(&property_id).await?;

        info!(review_id = %review.id, property_id = %property_id, rating = review.rating, "review submitted");
        Ok(review)
    }

    /// Set the one mutable field on a review. Only the manager of the
    /// property the underlying reservation belongs to may reply.
    pub async fn reply_to_review(
        &self,
        review_id: &str,
        actor: &Actor,
        reply: impl Into<String>,
    ) -> DomainResult<Review> {
        let mut review =
            self.reviews
                .find_by_id(review_id)
                .await?
                .ok_or_else(|| DomainError::NotFound {
                    entity: "Review",
                    field: "id",
                    value: review_id.to_string(),
                })?;

        let property_id = self.property_for(&review.reservation_id).await?;
        let property = self
            .properties
            .find_by_id(&property_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "Property",
                field: "id",
                value: property_id.clone(),
            })?;

        if property.manager_id != actor.id {
            return Err(DomainError::Forbidden(format!(
                "user {} does not manage property {}",
                actor.id, property_id
            )));
        }

        review.manager_reply = Some(reply.into());
        self.reviews.update(review.clone()).await?;
        // the reply is visible through the latest-reviews cache too
        self.recompute_rating_stats(&property_id).await?;

        Ok(review)
    }

    /// Remove a review and refresh the owning property's derived state.
    pub async fn remove_review(&self, review_id: &str) -> DomainResult<()> {
        let review =
            self.reviews
                .find_by_id(review_id)
                .await?
                .ok_or_else(|| DomainError::NotFound {
                    entity: "Review",
                    field: "id",
                    value: review_id.to_string(),
                })?;

        let property_id = self
            .reservations
            .property_for_reservation(&review.reservation_id)
            .await?;

        self.reviews.delete(review_id).await?;

        let live_property = match property_id {
            Some(property_id) => self
                .properties
                .find_by_id(&property_id)
                .await?
                .map(|_| property_id),
            None => None,
        };
        match live_property {
            Some(property_id) => self.recompute_rating_stats(&property_id).await?,
            None => {
                // review outlived its property; nothing left to refresh
                warn!(review_id = %review_id, "removed review with no live property, skipping stats refresh");
            }
        }
        Ok(())
    }

    // ── Aggregation ─────────────────────────────────────────────

    /// Recompute `rating_stats` and `latest_reviews` for a property from
    /// the authoritative review records. Idempotent: with no intervening
    /// review change the written state is identical. Lost version races
    /// are retried with backoff, then surfaced.
    pub async fn recompute_rating_stats(&self, property_id: &str) -> DomainResult<()> {
        retry_transient(&self.retry, "recompute_rating_stats", || {
            self.recompute_once(property_id)
        })
        .await
    }

    async fn recompute_once(&self, property_id: &str) -> DomainResult<()> {
        let property = self
            .properties
            .find_by_id(property_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "Property",
                field: "id",
                value: property_id.to_string(),
            })?;
        let expected_version = property.version;

        let reservation_ids = self
            .reservations
            .reservations_for_property(property_id)
            .await?;
        let mut reviews = self.reviews.find_by_reservation_ids(&reservation_ids).await?;

        // most-recent-first; equal dates fall back to the id so the order
        // is deterministic
        reviews.sort_by(|a, b| {
            b.creation_date
                .cmp(&a.creation_date)
                .then_with(|| b.id.cmp(&a.id))
        });

        let stats = RatingStats::from_reviews(&reviews, self.aggregation.rating_precision);
        reviews.truncate(self.aggregation.latest_reviews_cache_size);

        debug!(
            property_id = %property_id,
            total_reviews = stats.total_reviews,
            cached = reviews.len(),
            "writing recomputed rating stats"
        );

        self.properties
            .update_derived(property_id, expected_version, stats, reviews)
            .await
    }
}

// ── Tests ──────────────────────────────────────────────────────
