//! Property domain entity
//!
//! The aggregate root for a listing: embedded rooms, a denormalized rating
//! summary, and a bounded cache of the latest reviews. `rating_stats` and
//! `latest_reviews` are derived state, reproducible at any time by
//! re-scanning the review records; they are never hand-edited.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;

use crate::domain::review::Review;
use crate::domain::room::Room;
use crate::domain::{DomainError, DomainResult};

/// Geographic position serialized as exactly `[longitude, latitude]`.
/// The order is load-bearing for mapping consumers and must never swap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    longitude: f64,
    latitude: f64,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> DomainResult<Self> {
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::Validation(format!(
                "longitude {} outside -180..180",
                longitude
            )));
        }
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(DomainError::Validation(format!(
                "latitude {} outside -90..90",
                latitude
            )));
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }
}

impl Serialize for GeoPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.longitude, self.latitude].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GeoPoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pair = <[f64; 2]>::deserialize(deserializer)?;
        Self::new(pair[0], pair[1]).map_err(D::Error::custom)
    }
}

/// Denormalized rating summary. All axes are `None` until the first review
/// lands; the empty state is well-defined, never a division by zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<Decimal>,
    pub total_reviews: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleanliness: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub communication: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Decimal>,
}

impl RatingStats {
    /// Arithmetic mean per axis over `reviews`, rounded half-up to
    /// `precision` decimals. Pure and deterministic: the same review set
    /// always yields identical stats.
    pub fn from_reviews(reviews: &[Review], precision: u32) -> Self {
        if reviews.is_empty() {
            return Self::default();
        }

        let count = Decimal::from(reviews.len());
        let mut overall = Decimal::ZERO;
        let mut cleanliness = Decimal::ZERO;
        let mut communication = Decimal::ZERO;
        let mut location = Decimal::ZERO;
        let mut value = Decimal::ZERO;

        for review in reviews {
            overall += Decimal::from(review.rating);
            cleanliness += review.cleanliness;
            communication += review.communication;
            location += review.location;
            value += review.value;
        }

        let mean = |sum: Decimal| {
            Some((sum / count).round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero))
        };

        Self {
            average_rating: mean(overall),
            total_reviews: reviews.len() as u64,
            cleanliness: mean(cleanliness),
            communication: mean(communication),
            location: mean(location),
            value: mean(value),
        }
    }
}

/// Property entity, root aggregate for a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    pub name: String,
    pub address: String,
    pub description: String,
    pub amenities: BTreeSet<String>,
    pub photos: Vec<String>,
    pub email: String,
    pub country: String,
    pub region: String,
    pub city: String,
    /// Reference to the managing user, who must hold the MANAGER role.
    pub manager_id: String,
    pub coordinates: GeoPoint,
    /// Embedded copies of the property's rooms; the rooms collection is the
    /// other read path over the same set.
    pub rooms: Vec<Room>,
    /// Bounded cache of the most recent reviews, most-recent-first.
    pub latest_reviews: Vec<Review>,
    pub rating_stats: RatingStats,
    /// Optimistic-concurrency stamp; bumped on every write by the store.
    #[serde(default)]
    pub version: u64,
}

impl Property {
    /// Insert or replace the embedded copy of `room`.
    pub fn attach_room(&mut self, room: Room) {
        match self.rooms.iter_mut().find(|r| r.id == room.id) {
            Some(slot) => *slot = room,
            None => self.rooms.push(room),
        }
    }

    /// Remove the embedded copy of a room. Returns whether it was present.
    pub fn detach_room(&mut self, room_id: &str) -> bool {
        let before = self.rooms.len();
        self.rooms.retain(|r| r.id != room_id);
        self.rooms.len() != before
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn review_with(rating: u8, cleanliness: &str) -> Review {
        Review::new(
            format!("res-{}-{}", rating, cleanliness),
            NaiveDate::from_str("2026-06-01").unwrap(),
            "fine",
            rating,
            dec(cleanliness),
            dec("4"),
            dec("4"),
            dec("4"),
        )
        .unwrap()
    }

    #[test]
    fn geo_point_serializes_longitude_first() {
        let point = GeoPoint::new(12.4922, 41.8902).unwrap();
        let json = serde_json::to_value(point).unwrap();
        assert_eq!(json, serde_json::json!([12.4922, 41.8902]));

        let back: GeoPoint = serde_json::from_value(json).unwrap();
        assert_eq!(back.longitude(), 12.4922);
        assert_eq!(back.latitude(), 41.8902);
    }

    #[test]
    fn geo_point_rejects_wrong_arity_and_range() {
        assert!(serde_json::from_value::<GeoPoint>(serde_json::json!([12.5])).is_err());
        assert!(
            serde_json::from_value::<GeoPoint>(serde_json::json!([12.5, 41.9, 0.0])).is_err()
        );
        // latitude out of range: the pair is rejected, not clamped
        assert!(serde_json::from_value::<GeoPoint>(serde_json::json!([12.5, 95.0])).is_err());
        assert!(GeoPoint::new(181.0, 0.0).is_err());
    }

    #[test]
    fn empty_review_set_yields_no_rating_state() {
        let stats = RatingStats::from_reviews(&[], 2);
        assert_eq!(stats.total_reviews, 0);
        assert_eq!(stats.average_rating, None);
        assert_eq!(stats.cleanliness, None);
    }

    #[test]
    fn mean_is_rounded_to_two_decimals() {
        let reviews = vec![
            review_with(5, "5"),
            review_with(4, "4"),
            review_with(3, "3"),
        ];
        let stats = RatingStats::from_reviews(&reviews, 2);
        assert_eq!(stats.total_reviews, 3);
        assert_eq!(stats.cleanliness, Some(dec("4.00")));
        assert_eq!(stats.average_rating, Some(dec("4.00")));
    }

    #[test]
    fn repeating_mean_rounds_half_up() {
        // (5 + 5 + 4) / 3 = 4.666… → 4.67
        let reviews = vec![
            review_with(5, "5"),
            review_with(5, "5"),
            review_with(4, "4"),
        ];
        let stats = RatingStats::from_reviews(&reviews, 2);
        assert_eq!(stats.average_rating, Some(dec("4.67")));
    }

    #[test]
    fn exact_midpoint_rounds_up_not_to_even() {
        // a single review with cleanliness 4.005: half-up → 4.01
        let reviews = vec![review_with(4, "4.005")];
        let stats = RatingStats::from_reviews(&reviews, 2);
        assert_eq!(stats.cleanliness, Some(dec("4.01")));
    }

    #[test]
    fn from_reviews_is_idempotent() {
        let reviews = vec![review_with(5, "4.5"), review_with(2, "1.5")];
        let first = RatingStats::from_reviews(&reviews, 2);
        let second = RatingStats::from_reviews(&reviews, 2);
        assert_eq!(first, second);
    }

    #[test]
    fn attach_room_replaces_same_id() {
        let mut property = sample_property();
        let mut room = sample_room("room-1");
        property.attach_room(room.clone());
        assert_eq!(property.rooms.len(), 1);

        room.name = "Renamed".into();
        property.attach_room(room);
        assert_eq!(property.rooms.len(), 1);
        assert_eq!(property.rooms[0].name, "Renamed");

        assert!(property.detach_room("room-1"));
        assert!(!property.detach_room("room-1"));
    }

    #[test]
    fn property_round_trip_preserves_coordinate_order() {
        let property = sample_property();
        let json = serde_json::to_string(&property).unwrap();
        assert!(json.contains("\"coordinates\":[2.2945,48.8584]"));
        let back: Property = serde_json::from_str(&json).unwrap();
        assert_eq!(back, property);
    }

    fn sample_room(id: &str) -> Room {
        use crate::domain::room::{BedType, RoomStatus};
        Room {
            id: id.into(),
            property_id: "prop-1".into(),
            room_type: "double".into(),
            name: "Garden Room".into(),
            bed: BedType::Double,
            amenities: BTreeSet::new(),
            photos: vec![],
            status: RoomStatus::Available,
            capacity_adults: 2,
            capacity_children: 0,
            price_per_night_adults: dec("75"),
            price_per_night_children: dec("0"),
        }
    }

    fn sample_property() -> Property {
        Property {
            id: "prop-1".into(),
            name: "Maison Lumière".into(),
            address: "12 Rue Cler".into(),
            description: "Small B&B near the tower.".into(),
            amenities: ["WiFi".to_string()].into_iter().collect(),
            photos: vec!["https://img.example.com/front.jpg".into()],
            email: "stay@maison-lumiere.fr".into(),
            country: "France".into(),
            region: "Île-de-France".into(),
            city: "Paris".into(),
            manager_id: "u-100".into(),
            coordinates: GeoPoint::new(2.2945, 48.8584).unwrap(),
            rooms: vec![],
            latest_reviews: vec![],
            rating_stats: RatingStats::default(),
            version: 0,
        }
    }
}
