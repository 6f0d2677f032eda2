//! Room domain entity
//!
//! Rooms live in their own collection, keyed back to their property via
//! `property_id`, and are additionally embedded in `Property.rooms`. The
//! duplication is intentional: both read paths must stay consistent.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BedType {
    Single,
    Double,
    Queen,
    King,
    Bunk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStatus {
    Available,
    Occupied,
    Maintenance,
}

impl Default for RoomStatus {
    fn default() -> Self {
        Self::Available
    }
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Occupied => "OCCUPIED",
            Self::Maintenance => "MAINTENANCE",
        }
    }
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Caller-supplied room shape, without identity or property linkage.
#[derive(Debug, Clone, Deserialize)]
pub struct RoomSpec {
    /// e.g. "single", "double", "suite"
    pub room_type: String,
    /// e.g. "Blue Room with Sea View"
    pub name: String,
    pub bed: BedType,
    #[serde(default)]
    pub amenities: BTreeSet<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub status: RoomStatus,
    pub capacity_adults: u32,
    pub capacity_children: u32,
    pub price_per_night_adults: Decimal,
    pub price_per_night_children: Decimal,
}

impl RoomSpec {
    pub fn validate(&self) -> DomainResult<()> {
        if self.price_per_night_adults.is_sign_negative() {
            return Err(DomainError::Validation(format!(
                "negative adult price: {}",
                self.price_per_night_adults
            )));
        }
        if self.price_per_night_children.is_sign_negative() {
            return Err(DomainError::Validation(format!(
                "negative child price: {}",
                self.price_per_night_children
            )));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::Validation("room name must not be empty".into()));
        }
        Ok(())
    }
}

/// Room entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    /// Back-reference to the owning property.
    pub property_id: String,
    pub room_type: String,
    pub name: String,
    pub bed: BedType,
    pub amenities: BTreeSet<String>,
    pub photos: Vec<String>,
    pub status: RoomStatus,
    pub capacity_adults: u32,
    pub capacity_children: u32,
    pub price_per_night_adults: Decimal,
    pub price_per_night_children: Decimal,
}

impl Room {
    /// Materialize a room from a validated spec, minted with a fresh id.
    pub fn from_spec(property_id: impl Into<String>, spec: RoomSpec) -> DomainResult<Self> {
        spec.validate()?;
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            property_id: property_id.into(),
            room_type: spec.room_type,
            name: spec.name,
            bed: spec.bed,
            amenities: spec.amenities,
            photos: spec.photos,
            status: spec.status,
            capacity_adults: spec.capacity_adults,
            capacity_children: spec.capacity_children,
            price_per_night_adults: spec.price_per_night_adults,
            price_per_night_children: spec.price_per_night_children,
        })
    }
}

// ── Tests ──────────────────────────────────────────────────────
