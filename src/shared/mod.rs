//! Cross-cutting helpers shared by all layers.

pub mod retry;

pub use retry::{retry_transient, RetryConfig};
