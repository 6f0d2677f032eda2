//! Room aggregate
//!
//! Contains the Room entity, related enums, and repository interface.

pub mod model;
pub mod repository;

pub use model::{BedType, Room, RoomSpec, RoomStatus};
pub use repository::RoomRepository;
