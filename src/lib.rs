//! # B&B booking domain core
//!
//! Persistent domain model for a bed-and-breakfast booking platform:
//! registered users (customers and managers under one identity space),
//! properties with rooms and denormalized rating summaries, reviews as the
//! authoritative rating records, and direct messages between users.
//!
//! ## Architecture
//!
//! - **domain**: entities, value objects, and repository interfaces
//! - **application**: use-case services and collaborator ports
//! - **infrastructure**: storage (in-memory document store) and crypto
//! - **shared**: retry and other cross-cutting helpers
//!
//! The underlying store is assumed to offer document CRUD, string-key
//! secondary indexes, and no cross-document transactions; every
//! cross-entity consistency rule lives in the application services.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use application::{
    Actor, IdentityService, MessagingService, NewReview, PropertyService, ReservationDirectory,
    ReviewService, SignupRequest,
};
pub use config::{default_config_path, init_tracing, AppConfig};
pub use domain::{DomainError, DomainResult};
pub use infrastructure::{InMemoryReservationDirectory, InMemoryStore};
