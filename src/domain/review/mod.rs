//! Review aggregate
//!
//! Contains the Review entity and repository interface.

pub mod model;
pub mod repository;

pub use model::{Review, RATING_MAX, RATING_MIN};
pub use repository::ReviewRepository;
