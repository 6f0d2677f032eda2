//! Property service — listing and room management
//!
//! The store has no foreign keys and no multi-document transactions, so
//! this service owns the two application-level consistency rules:
//! reference checks at write time, and two-step room writes with a
//! compensating rollback so both read paths (embedded `Property.rooms` and
//! the rooms collection) stay in agreement.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use super::validation_error;
use crate::domain::{
    DomainError, DomainResult, GeoPoint, Property, PropertyRepository, RatingStats, Room,
    RoomRepository, RoomSpec, RoomStatus, UserRepository,
};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePropertyRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amenities: BTreeSet<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[validate(email(message = "invalid contact email"))]
    pub email: String,
    pub country: String,
    pub region: String,
    pub city: String,
    pub manager_id: String,
    /// `[longitude, latitude]`; arity and range are checked on decode.
    pub coordinates: GeoPoint,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePropertyRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub amenities: Option<BTreeSet<String>>,
    pub photos: Option<Vec<String>>,
    pub email: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub manager_id: Option<String>,
    pub coordinates: Option<GeoPoint>,
}

pub struct PropertyService {
    properties: Arc<dyn PropertyRepository>,
    rooms: Arc<dyn RoomRepository>,
    users: Arc<dyn UserRepository>,
}

impl PropertyService {
    pub fn new(
        properties: Arc<dyn PropertyRepository>,
        rooms: Arc<dyn RoomRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            properties,
            rooms,
            users,
        }
    }

    /// `manager_id` must resolve to an existing user holding the MANAGER
    /// role; anything else is a dangling or wrong-role reference.
    async fn ensure_manager(&self, manager_id: &str) -> DomainResult<()> {
        match self.users.find_by_id(manager_id).await? {
            Some(user) if user.is_manager() => Ok(()),
            _ => Err(DomainError::Reference {
                entity: "Property",
                field: "manager_id",
                value: manager_id.to_string(),
            }),
        }
    }

    // ── Properties ──────────────────────────────────────────────

    pub async fn create_property(
        &self,
        request: CreatePropertyRequest,
    ) -> DomainResult<Property> {
        request.validate().map_err(|e| validation_error(&e))?;
        self.ensure_manager(&request.manager_id).await?;

        let property = Property {
            id: Uuid::new_v4().to_string(),
            name: request.name,
            address: request.address,
            description: request.description,
            amenities: request.amenities,
            photos: request.photos,
            email: request.email,
            country: request.country,
            region: request.region,
            city: request.city,
            manager_id: request.manager_id,
            coordinates: request.coordinates,
            rooms: Vec::new(),
            latest_reviews: Vec::new(),
            rating_stats: RatingStats::default(),
            version: 0,
        };

        self.properties.insert(property.clone()).await?;
        info!(property_id = %property.id, city = %property.city, "property created");
        Ok(property)
    }

    pub async fn update_property(
        &self,
        id: &str,
        request: UpdatePropertyRequest,
    ) -> DomainResult<Property> {
        let mut property =
            self.properties
                .find_by_id(id)
                .await?
                .ok_or_else(|| DomainError::NotFound {
                    entity: "Property",
                    field: "id",
                    value: id.to_string(),
                })?;

        if let Some(manager_id) = &request.manager_id {
            if *manager_id != property.manager_id {
                self.ensure_manager(manager_id).await?;
            }
        }

        if let Some(name) = request.name {
            property.name = name;
        }
        if let Some(address) = request.address {
            property.address = address;
        }
        if let Some(description) = request.description {
            property.description = description;
        }
        if let Some(amenities) = request.amenities {
            property.amenities = amenities;
        }
        if let Some(photos) = request.photos {
            property.photos = photos;
        }
        if let Some(email) = request.email {
            property.email = email;
        }
        if let Some(country) = request.country {
            property.country = country;
        }
        if let Some(region) = request.region {
            property.region = region;
        }
        if let Some(city) = request.city {
            property.city = city;
        }
        if let Some(manager_id) = request.manager_id {
            property.manager_id = manager_id;
        }
        if let Some(coordinates) = request.coordinates {
            property.coordinates = coordinates;
        }

        self.properties.update(property.clone()).await?;
        Ok(property)
    }

    /// Delete a property and cascade to its rooms. Reviews are untouched:
    /// they link via reservation, not property.
    pub async fn delete_property(&self, id: &str) -> DomainResult<()> {
        let property =
            self.properties
                .find_by_id(id)
                .await?
                .ok_or_else(|| DomainError::NotFound {
                    entity: "Property",
                    field: "id",
                    value: id.to_string(),
                })?;

        let rooms = self.rooms.list_by_property(&property.id).await?;
        for room in &rooms {
            self.rooms.delete(&room.id).await?;
        }
        self.properties.delete(id).await?;

        info!(property_id = %id, cascaded_rooms = rooms.len(), "property deleted");
        Ok(())
    }

    pub async fn get_property(&self, id: &str) -> DomainResult<Option<Property>> {
        self.properties.find_by_id(id).await
    }

    pub async fn list_properties_for_manager(
        &self,
        manager_id: &str,
    ) -> DomainResult<Vec<Property>> {
        self.properties.list_by_manager(manager_id).await
    }

    // ── Rooms ───────────────────────────────────────────────────

    /// Two-step write: the room document first, then the embedded copy on
    /// the property. If the second step fails the room document is removed
    /// again so neither read path sees a half-written room.
    pub async fn add_room(&self, property_id: &str, spec: RoomSpec) -> DomainResult<Room> {
        let mut property = self.properties.find_by_id(property_id).await?.ok_or_else(|| {
            DomainError::Reference {
                entity: "Room",
                field: "property_id",
                value: property_id.to_string(),
            }
        })?;

        let room = Room::from_spec(property_id, spec)?;
        self.rooms.insert(room.clone()).await?;

        property.attach_room(room.clone());
        if let Err(err) = self.properties.update(property).await {
            warn!(room_id = %room.id, error = %err, "property write failed, removing room again");
            self.rooms.delete(&room.id).await?;
            return Err(err);
        }

        info!(property_id = %property_id, room_id = %room.id, "room added");
        Ok(room)
    }

    /// Same two-step pattern: room document, then the embedded copy. On
    /// failure the room document is rolled back to its prior status.
    pub async fn update_room_status(
        &self,
        room_id: &str,
        status: RoomStatus,
    ) -> DomainResult<Room> {
        let mut room =
            self.rooms
                .find_by_id(room_id)
                .await?
                .ok_or_else(|| DomainError::NotFound {
                    entity: "Room",
                    field: "id",
                    value: room_id.to_string(),
                })?;

        let previous = room.clone();
        room.status = status;
        self.rooms.update(room.clone()).await?;

        let result = match self.properties.find_by_id(&room.property_id).await? {
            Some(mut property) => {
                property.attach_room(room.clone());
                self.properties.update(property).await
            }
            None => Err(DomainError::Reference {
                entity: "Room",
                field: "property_id",
                value: room.property_id.clone(),
            }),
        };

        if let Err(err) = result {
            warn!(room_id = %room_id, error = %err, "property write failed, restoring room status");
            self.rooms.update(previous).await?;
            return Err(err);
        }

        info!(room_id = %room_id, status = %room.status, "room status updated");
        Ok(room)
    }

    /// The collection-side read path; must agree with `Property.rooms`.
    pub async fn list_rooms_for_property(&self, property_id: &str) -> DomainResult<Vec<Room>> {
        if self.properties.find_by_id(property_id).await?.is_none() {
            return Err(DomainError::NotFound {
                entity: "Property",
                field: "id",
                value: property_id.to_string(),
            });
        }
        self.rooms.list_by_property(property_id).await
    }
}

// ── Tests ──────────────────────────────────────────────────────
