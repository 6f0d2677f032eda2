//! User aggregate
//!
//! Contains the polymorphic user entity, embedded value objects, and the
//! repository interface.

pub mod model;
pub mod repository;

pub use model::{MethodPayment, OptionPreference, RegisteredUser, RoleProfile, UserRole};
pub use repository::UserRepository;
