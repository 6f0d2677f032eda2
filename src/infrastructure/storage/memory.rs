//! In-memory document store
//!
//! Models the persistence contract the domain is designed against:
//! document CRUD per collection, string-key secondary indexes, and no
//! cross-document transactions. Each single-document operation is atomic
//! (shard lock); anything spanning documents is the services' problem.
//! Used for development and as the test double.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::application::ports::ReservationDirectory;
use crate::domain::{
    DomainError, DomainResult, Message, MessageRepository, Property, PropertyRepository,
    RatingStats, RegisteredUser, Review, ReviewRepository, Room, RoomRepository, UserRepository,
};

pub struct InMemoryStore {
    users: DashMap<String, RegisteredUser>,
    // one combined uniqueness domain per field, spanning both roles
    users_by_username: DashMap<String, String>,
    users_by_email: DashMap<String, String>,
    properties: DashMap<String, Property>,
    rooms: DashMap<String, Room>,
    reviews: DashMap<String, Review>,
    // unique index: at most one review per reservation
    reviews_by_reservation: DashMap<String, String>,
    messages: DashMap<String, Message>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            users_by_username: DashMap::new(),
            users_by_email: DashMap::new(),
            properties: DashMap::new(),
            rooms: DashMap::new(),
            reviews: DashMap::new(),
            reviews_by_reservation: DashMap::new(),
            messages: DashMap::new(),
        }
    }

    // Seeding conveniences for tests and demo datasets; same write paths
    // as the repository traits.

    pub async fn seed_user(&self, user: RegisteredUser) -> DomainResult<()> {
        UserRepository::insert(self, user).await
    }

    pub async fn seed_property(&self, property: Property) -> DomainResult<()> {
        PropertyRepository::insert(self, property).await
    }

    pub async fn seed_message(&self, message: Message) -> DomainResult<()> {
        MessageRepository::insert(self, message).await
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

// ── Users ──────────────────────────────────────────────────────

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: RegisteredUser) -> DomainResult<()> {
        match self.users_by_username.entry(user.username.clone()) {
            Entry::Occupied(_) => {
                return Err(DomainError::Conflict(format!(
                    "username already taken: {}",
                    user.username
                )));
            }
            Entry::Vacant(slot) => {
                slot.insert(user.id.clone());
            }
        }
        match self.users_by_email.entry(user.email.clone()) {
            Entry::Occupied(_) => {
                // compensate the username claim taken above
                self.users_by_username.remove(&user.username);
                return Err(DomainError::Conflict(format!(
                    "email already registered: {}",
                    user.email
                )));
            }
            Entry::Vacant(slot) => {
                slot.insert(user.id.clone());
            }
        }
        self.users.insert(user.id.clone(), user);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<RegisteredUser>> {
        Ok(self.users.get(id).map(|u| u.clone()))
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<RegisteredUser>> {
        let Some(id) = self.users_by_username.get(username).map(|id| id.clone()) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<RegisteredUser>> {
        let Some(id) = self.users_by_email.get(email).map(|id| id.clone()) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn update(&self, user: RegisteredUser) -> DomainResult<()> {
        let Some(stored) = self.users.get(&user.id).map(|u| u.clone()) else {
            return Err(DomainError::NotFound {
                entity: "RegisteredUser",
                field: "id",
                value: user.id,
            });
        };

        if stored.username != user.username {
            match self.users_by_username.entry(user.username.clone()) {
                Entry::Occupied(_) => {
                    return Err(DomainError::Conflict(format!(
                        "username already taken: {}",
                        user.username
                    )));
                }
                Entry::Vacant(slot) => {
                    slot.insert(user.id.clone());
                }
            }
            self.users_by_username.remove(&stored.username);
        }
        if stored.email != user.email {
            match self.users_by_email.entry(user.email.clone()) {
                Entry::Occupied(_) => {
                    return Err(DomainError::Conflict(format!(
                        "email already registered: {}",
                        user.email
                    )));
                }
                Entry::Vacant(slot) => {
                    slot.insert(user.id.clone());
                }
            }
            self.users_by_email.remove(&stored.email);
        }

        self.users.insert(user.id.clone(), user);
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let Some((_, user)) = self.users.remove(id) else {
            return Err(DomainError::NotFound {
                entity: "RegisteredUser",
                field: "id",
                value: id.to_string(),
            });
        };
        self.users_by_username.remove(&user.username);
        self.users_by_email.remove(&user.email);
        Ok(())
    }
}

// ── Properties ─────────────────────────────────────────────────

#[async_trait]
impl PropertyRepository for InMemoryStore {
    async fn insert(&self, property: Property) -> DomainResult<()> {
        if self.properties.contains_key(&property.id) {
            return Err(DomainError::Conflict(format!(
                "property already exists: {}",
                property.id
            )));
        }
        self.properties.insert(property.id.clone(), property);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Property>> {
        Ok(self.properties.get(id).map(|p| p.clone()))
    }

    async fn list_by_manager(&self, manager_id: &str) -> DomainResult<Vec<Property>> {
        Ok(self
            .properties
            .iter()
            .filter(|p| p.manager_id == manager_id)
            .map(|p| p.clone())
            .collect())
    }

    async fn update(&self, property: Property) -> DomainResult<()> {
        let Some(mut stored) = self.properties.get_mut(&property.id) else {
            return Err(DomainError::NotFound {
                entity: "Property",
                field: "id",
                value: property.id,
            });
        };
        // derived fields and the version stamp stay store-owned
        let mut doc = property;
        doc.rating_stats = stored.rating_stats.clone();
        doc.latest_reviews = stored.latest_reviews.clone();
        doc.version = stored.version + 1;
        *stored = doc;
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        self.properties
            .remove(id)
            .ok_or_else(|| DomainError::NotFound {
                entity: "Property",
                field: "id",
                value: id.to_string(),
            })?;
        Ok(())
    }

    async fn update_derived(
        &self,
        id: &str,
        expected_version: u64,
        stats: RatingStats,
        latest_reviews: Vec<Review>,
    ) -> DomainResult<()> {
        let Some(mut stored) = self.properties.get_mut(id) else {
            return Err(DomainError::NotFound {
                entity: "Property",
                field: "id",
                value: id.to_string(),
            });
        };
        if stored.version != expected_version {
            return Err(DomainError::ConcurrencyConflict(format!(
                "property {} moved from version {} to {}",
                id, expected_version, stored.version
            )));
        }
        stored.rating_stats = stats;
        stored.latest_reviews = latest_reviews;
        stored.version += 1;
        Ok(())
    }
}

// ── Rooms ──────────────────────────────────────────────────────

#[async_trait]
impl RoomRepository for InMemoryStore {
    async fn insert(&self, room: Room) -> DomainResult<()> {
        if self.rooms.contains_key(&room.id) {
            return Err(DomainError::Conflict(format!(
                "room already exists: {}",
                room.id
            )));
        }
        self.rooms.insert(room.id.clone(), room);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Room>> {
        Ok(self.rooms.get(id).map(|r| r.clone()))
    }

    async fn list_by_property(&self, property_id: &str) -> DomainResult<Vec<Room>> {
        Ok(self
            .rooms
            .iter()
            .filter(|r| r.property_id == property_id)
            .map(|r| r.clone())
            .collect())
    }

    async fn update(&self, room: Room) -> DomainResult<()> {
        if !self.rooms.contains_key(&room.id) {
            return Err(DomainError::NotFound {
                entity: "Room",
                field: "id",
                value: room.id,
            });
        }
        self.rooms.insert(room.id.clone(), room);
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        self.rooms.remove(id).ok_or_else(|| DomainError::NotFound {
            entity: "Room",
            field: "id",
            value: id.to_string(),
        })?;
        Ok(())
    }
}

// ── Reviews ────────────────────────────────────────────────────

#[async_trait]
impl ReviewRepository for InMemoryStore {
    async fn insert(&self, review: Review) -> DomainResult<()> {
        match self.reviews_by_reservation.entry(review.reservation_id.clone()) {
            Entry::Occupied(_) => {
                return Err(DomainError::Conflict(format!(
                    "review already exists for reservation {}",
                    review.reservation_id
                )));
            }
            Entry::Vacant(slot) => {
                slot.insert(review.id.clone());
            }
        }
        self.reviews.insert(review.id.clone(), review);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Review>> {
        Ok(self.reviews.get(id).map(|r| r.clone()))
    }

    async fn find_by_reservation(&self, reservation_id: &str) -> DomainResult<Option<Review>> {
        let Some(id) = self
            .reviews_by_reservation
            .get(reservation_id)
            .map(|id| id.clone())
        else {
            return Ok(None);
        };
        Ok(self.reviews.get(&id).map(|r| r.clone()))
    }

    async fn find_by_reservation_ids(
        &self,
        reservation_ids: &[String],
    ) -> DomainResult<Vec<Review>> {
        let mut found = Vec::new();
        for reservation_id in reservation_ids {
            if let Some(id) = self
                .reviews_by_reservation
                .get(reservation_id)
                .map(|id| id.clone())
            {
                if let Some(review) = self.reviews.get(&id) {
                    found.push(review.clone());
                }
            }
        }
        Ok(found)
    }

    async fn update(&self, review: Review) -> DomainResult<()> {
        let Some(stored) = self.reviews.get(&review.id).map(|r| r.clone()) else {
            return Err(DomainError::NotFound {
                entity: "Review",
                field: "id",
                value: review.id,
            });
        };
        if stored.reservation_id != review.reservation_id {
            return Err(DomainError::Validation(
                "reservation_id is immutable".into(),
            ));
        }
        self.reviews.insert(review.id.clone(), review);
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let Some((_, review)) = self.reviews.remove(id) else {
            return Err(DomainError::NotFound {
                entity: "Review",
                field: "id",
                value: id.to_string(),
            });
        };
        self.reviews_by_reservation.remove(&review.reservation_id);
        Ok(())
    }
}

// ── Messages ───────────────────────────────────────────────────

#[async_trait]
impl MessageRepository for InMemoryStore {
    async fn insert(&self, message: Message) -> DomainResult<()> {
        if self.messages.contains_key(&message.id) {
            return Err(DomainError::Conflict(format!(
                "message already exists: {}",
                message.id
            )));
        }
        self.messages.insert(message.id.clone(), message);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Message>> {
        Ok(self.messages.get(id).map(|m| m.clone()))
    }

    async fn update(&self, message: Message) -> DomainResult<()> {
        if !self.messages.contains_key(&message.id) {
            return Err(DomainError::NotFound {
                entity: "Message",
                field: "id",
                value: message.id,
            });
        }
        self.messages.insert(message.id.clone(), message);
        Ok(())
    }

    async fn list_between(&self, user_a: &str, user_b: &str) -> DomainResult<Vec<Message>> {
        Ok(self
            .messages
            .iter()
            .filter(|m| {
                (m.sender_id == user_a && m.recipient_id == user_b)
                    || (m.sender_id == user_b && m.recipient_id == user_a)
            })
            .map(|m| m.clone())
            .collect())
    }

    async fn count_unread_for(&self, user_id: &str) -> DomainResult<u64> {
        Ok(self
            .messages
            .iter()
            .filter(|m| m.recipient_id == user_id && !m.is_read)
            .count() as u64)
    }
}

// ── Reservation directory ──────────────────────────────────────

/// In-memory stand-in for the external reservation service: just the
/// reservation→property mapping the core consumes.
pub struct InMemoryReservationDirectory {
    property_by_reservation: DashMap<String, String>,
}

impl InMemoryReservationDirectory {
    pub fn new() -> Self {
        Self {
            property_by_reservation: DashMap::new(),
        }
    }

    pub fn register(&self, reservation_id: &str, property_id: &str) {
        self.property_by_reservation
            .insert(reservation_id.to_string(), property_id.to_string());
    }
}

impl Default for InMemoryReservationDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReservationDirectory for InMemoryReservationDirectory {
    async fn property_for_reservation(
        &self,
        reservation_id: &str,
    ) -> DomainResult<Option<String>> {
        Ok(self
            .property_by_reservation
            .get(reservation_id)
            .map(|p| p.clone()))
    }

    async fn reservations_for_property(&self, property_id: &str) -> DomainResult<Vec<String>> {
        Ok(self
            .property_by_reservation
            .iter()
            .filter(|entry| entry.value() == property_id)
            .map(|entry| entry.key().clone())
            .collect())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GeoPoint, OptionPreference, RoleProfile};
    use std::collections::BTreeSet;

    fn user(id: &str, username: &str, email: &str) -> RegisteredUser {
        RegisteredUser {
            id: id.into(),
            username: username.into(),
            email: email.into(),
            password_hash: "$2b$12$hash".into(),
            name: "Test".into(),
            surname: "User".into(),
            phone: "+1 555 0100".into(),
            preference: OptionPreference::default(),
            profile: RoleProfile::Manager { iban: None },
        }
    }

    fn property(id: &str) -> Property {
        Property {
            id: id.into(),
            name: "Casa".into(),
            address: "Via Roma 1".into(),
            description: String::new(),
            amenities: BTreeSet::new(),
            photos: vec![],
            email: "info@example.com".into(),
            country: "Italy".into(),
            region: "Tuscany".into(),
            city: "Florence".into(),
            manager_id: "mgr-1".into(),
            coordinates: GeoPoint::new(11.2558, 43.7696).unwrap(),
            rooms: vec![],
            latest_reviews: vec![],
            rating_stats: RatingStats::default(),
            version: 0,
        }
    }

    #[tokio::test]
    async fn username_and_email_indexes_reject_duplicates() {
        let store = InMemoryStore::new();
        store.seed_user(user("u-1", "alice", "alice@example.com")).await.unwrap();

        let err = store.seed_user(user("u-2", "alice", "other@example.com")).await;
        assert!(matches!(err, Err(DomainError::Conflict(_))));

        let err = store.seed_user(user("u-3", "bob", "alice@example.com")).await;
        assert!(matches!(err, Err(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn failed_insert_releases_the_username_claim() {
        let store = InMemoryStore::new();
        store.seed_user(user("u-1", "alice", "alice@example.com")).await.unwrap();

        // fails on the email index after claiming the username
        let err = store.seed_user(user("u-2", "carol", "alice@example.com")).await;
        assert!(matches!(err, Err(DomainError::Conflict(_))));

        // the username claim was compensated away, so it is free again
        store.seed_user(user("u-3", "carol", "carol@example.com")).await.unwrap();
    }

    #[tokio::test]
    async fn update_reindexes_changed_username() {
        let store = InMemoryStore::new();
        store.seed_user(user("u-1", "alice", "alice@example.com")).await.unwrap();

        let renamed = user("u-1", "alicia", "alice@example.com");
        UserRepository::update(&store, renamed).await.unwrap();

        assert!(UserRepository::find_by_username(&store, "alice")
            .await
            .unwrap()
            .is_none());
        assert!(UserRepository::find_by_username(&store, "alicia")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn derived_write_is_compare_and_swap() {
        let store = InMemoryStore::new();
        store.seed_property(property("prop-1")).await.unwrap();

        let read = PropertyRepository::find_by_id(&store, "prop-1")
            .await
            .unwrap()
            .unwrap();

        store
            .update_derived("prop-1", read.version, RatingStats::default(), vec![])
            .await
            .unwrap();

        // the stamp moved, so a writer still holding the old version loses
        let err = store
            .update_derived("prop-1", read.version, RatingStats::default(), vec![])
            .await;
        assert!(matches!(err, Err(DomainError::ConcurrencyConflict(_))));
    }

    #[tokio::test]
    async fn plain_update_cannot_touch_derived_state() {
        let store = InMemoryStore::new();
        store.seed_property(property("prop-1")).await.unwrap();

        let stats = RatingStats {
            total_reviews: 3,
            ..RatingStats::default()
        };
        let read = PropertyRepository::find_by_id(&store, "prop-1")
            .await
            .unwrap()
            .unwrap();
        store
            .update_derived("prop-1", read.version, stats.clone(), vec![])
            .await
            .unwrap();

        // a full-document write carrying stale derived fields
        let mut stale = read.clone();
        stale.name = "Renamed".into();
        PropertyRepository::update(&store, stale).await.unwrap();

        let after = PropertyRepository::find_by_id(&store, "prop-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after.name, "Renamed");
        assert_eq!(after.rating_stats, stats);
    }

    #[tokio::test]
    async fn review_unique_index_is_per_reservation() {
        use chrono::NaiveDate;
        use rust_decimal::Decimal;

        let store = InMemoryStore::new();
        let review = Review::new(
            "res-1",
            NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            "ok",
            4,
            Decimal::from(4),
            Decimal::from(4),
            Decimal::from(4),
            Decimal::from(4),
        )
        .unwrap();
        ReviewRepository::insert(&store, review.clone()).await.unwrap();

        let second = Review::new(
            "res-1",
            NaiveDate::from_ymd_opt(2026, 5, 2).unwrap(),
            "again",
            2,
            Decimal::from(2),
            Decimal::from(2),
            Decimal::from(2),
            Decimal::from(2),
        )
        .unwrap();
        let err = ReviewRepository::insert(&store, second).await;
        assert!(matches!(err, Err(DomainError::Conflict(_))));

        // deleting frees the reservation slot
        ReviewRepository::delete(&store, &review.id).await.unwrap();
        assert!(ReviewRepository::find_by_reservation(&store, "res-1")
            .await
            .unwrap()
            .is_none());
    }
}
