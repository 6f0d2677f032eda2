//! Review domain entity
//!
//! Reviews are the authoritative source of truth for ratings. A property's
//! `rating_stats` and `latest_reviews` are derived from them and never the
//! other way around.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult};

/// Inclusive bounds shared by the overall rating and every sub-score axis.
pub const RATING_MIN: u8 = 1;
pub const RATING_MAX: u8 = 5;

/// Guest review for a completed reservation. Immutable once created, except
/// for `manager_reply` which only the property's manager may set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    /// Links the review to a stay. At most one review per reservation.
    pub reservation_id: String,
    /// Date-only, no time component.
    pub creation_date: NaiveDate,
    pub text: String,
    /// Overall rating, integer 1-5.
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_reply: Option<String>,
    pub cleanliness: Decimal,
    pub communication: Decimal,
    pub location: Decimal,
    pub value: Decimal,
}

impl Review {
    /// Build a new review, rejecting any out-of-range score before it can
    /// reach the store. Out-of-range input is an error, never clamped.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        reservation_id: impl Into<String>,
        creation_date: NaiveDate,
        text: impl Into<String>,
        rating: u8,
        cleanliness: Decimal,
        communication: Decimal,
        location: Decimal,
        value: Decimal,
    ) -> DomainResult<Self> {
        let review = Self {
            id: Uuid::new_v4().to_string(),
            reservation_id: reservation_id.into(),
            creation_date,
            text: text.into(),
            rating,
            manager_reply: None,
            cleanliness,
            communication,
            location,
            value,
        };
        review.validate()?;
        Ok(review)
    }

    pub fn validate(&self) -> DomainResult<()> {
        if !(RATING_MIN..=RATING_MAX).contains(&self.rating) {
            return Err(DomainError::Validation(format!(
                "rating {} outside {}-{}",
                self.rating, RATING_MIN, RATING_MAX
            )));
        }
        check_axis("cleanliness", self.cleanliness)?;
        check_axis("communication", self.communication)?;
        check_axis("location", self.location)?;
        check_axis("value", self.value)?;
        Ok(())
    }
}

fn check_axis(axis: &'static str, score: Decimal) -> DomainResult<()> {
    let min = Decimal::from(RATING_MIN);
    let max = Decimal::from(RATING_MAX);
    if score < min || score > max {
        return Err(DomainError::Validation(format!(
            "{} score {} outside {}-{}",
            axis, score, min, max
        )));
    }
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::from_str(s).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample_review(rating: u8) -> DomainResult<Review> {
        Review::new(
            "res-1",
            date("2026-07-12"),
            "Quiet room, great breakfast.",
            rating,
            dec("4.5"),
            dec("5"),
            dec("4"),
            dec("3.5"),
        )
    }

    #[test]
    fn accepts_every_valid_overall_rating() {
        for rating in RATING_MIN..=RATING_MAX {
            assert!(sample_review(rating).is_ok(), "rating {} rejected", rating);
        }
    }

    #[test]
    fn rejects_out_of_range_overall_rating() {
        for rating in [0u8, 6, 200] {
            match sample_review(rating) {
                Err(DomainError::Validation(_)) => {}
                other => panic!("expected validation error, got {:?}", other),
            }
        }
    }

    #[test]
    fn rejects_out_of_range_axis_without_clamping() {
        let err = Review::new(
            "res-2",
            date("2026-07-12"),
            "ok",
            4,
            dec("0.9"),
            dec("5"),
            dec("4"),
            dec("3"),
        );
        assert!(matches!(err, Err(DomainError::Validation(_))));

        let err = Review::new(
            "res-2",
            date("2026-07-12"),
            "ok",
            4,
            dec("4"),
            dec("5.1"),
            dec("4"),
            dec("3"),
        );
        assert!(matches!(err, Err(DomainError::Validation(_))));
    }

    #[test]
    fn creation_date_serializes_date_only() {
        let review = sample_review(5).unwrap();
        let json = serde_json::to_value(&review).unwrap();
        assert_eq!(json["creation_date"], "2026-07-12");
    }

    #[test]
    fn round_trips_including_manager_reply() {
        let mut review = sample_review(4).unwrap();
        review.manager_reply = Some("Thank you, see you next summer!".into());
        let json = serde_json::to_string(&review).unwrap();
        let back: Review = serde_json::from_str(&json).unwrap();
        assert_eq!(back, review);
    }
}
