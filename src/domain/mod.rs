//! Domain layer: entities, value objects, and repository interfaces.

pub mod error;
pub mod message;
pub mod property;
pub mod review;
pub mod room;
pub mod user;

pub use error::{DomainError, DomainResult};
pub use message::{Message, MessageRepository};
pub use property::{GeoPoint, Property, PropertyRepository, RatingStats};
pub use review::{Review, ReviewRepository, RATING_MAX, RATING_MIN};
pub use room::{BedType, Room, RoomRepository, RoomSpec, RoomStatus};
pub use user::{
    MethodPayment, OptionPreference, RegisteredUser, RoleProfile, UserRepository, UserRole,
};
