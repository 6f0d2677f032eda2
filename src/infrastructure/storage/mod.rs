//! Storage implementations.

pub mod memory;

pub use memory::{InMemoryReservationDirectory, InMemoryStore};
