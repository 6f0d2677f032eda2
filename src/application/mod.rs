//! Application layer: use-case services and collaborator ports.

pub mod ports;
pub mod services;

pub use ports::{Actor, ReservationDirectory};
pub use services::{
    IdentityService, MessagingService, NewReview, PropertyService, ReviewService, SignupRequest,
};
