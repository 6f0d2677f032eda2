//! Room repository interface

use async_trait::async_trait;

use super::model::Room;
use crate::domain::DomainResult;

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn insert(&self, room: Room) -> DomainResult<()>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Room>>;

    /// Secondary-index lookup over the rooms collection. Must agree with
    /// the embedded copies on the owning property document.
    async fn list_by_property(&self, property_id: &str) -> DomainResult<Vec<Room>>;

    async fn update(&self, room: Room) -> DomainResult<()>;

    async fn delete(&self, id: &str) -> DomainResult<()>;
}
