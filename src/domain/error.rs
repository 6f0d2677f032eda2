//! Domain errors

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    /// A stored reference points at a missing or wrong-role document.
    /// The underlying store has no foreign keys, so this is checked at
    /// write time by the services.
    #[error("Dangling reference: {entity} with {field}={value}")]
    Reference {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// Lost an optimistic version check on a property's derived state.
    #[error("Concurrent update conflict: {0}")]
    ConcurrencyConflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    /// Whether the operation may succeed if retried. Validation and
    /// reference errors never qualify.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::ConcurrencyConflict(_))
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_errors_are_retryable() {
        assert!(DomainError::ConcurrencyConflict("version moved".into()).is_transient());
        assert!(DomainError::Storage("timeout".into()).is_transient());
        assert!(!DomainError::Validation("rating out of range".into()).is_transient());
        assert!(!DomainError::Reference {
            entity: "Property",
            field: "manager_id",
            value: "u-1".into(),
        }
        .is_transient());
    }
}
