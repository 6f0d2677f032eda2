//! Interfaces to collaborators the core consumes but does not own.

use async_trait::async_trait;

use crate::domain::{DomainResult, UserRole};

/// The acting user, as supplied by the (out-of-scope) session layer.
/// Manager-only operations check authorization against it.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: String,
    pub role: UserRole,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }
}

/// Reservation lookup owned by the external reservation service. It is the
/// join point that ties a review to a property: reviews reference a
/// reservation, reservations belong to a property.
#[async_trait]
pub trait ReservationDirectory: Send + Sync {
    /// The property a reservation was booked at, if the reservation exists.
    async fn property_for_reservation(
        &self,
        reservation_id: &str,
    ) -> DomainResult<Option<String>>;

    /// All reservation ids booked at a property. Drives the rating
    /// recompute scan.
    async fn reservations_for_property(&self, property_id: &str) -> DomainResult<Vec<String>>;
}
