//! Property aggregate
//!
//! Contains the Property root entity, its value objects, and the
//! repository interface.

pub mod model;
pub mod repository;

pub use model::{GeoPoint, Property, RatingStats};
pub use repository::PropertyRepository;
