//! Password hashing utilities

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::domain::{DomainError, DomainResult};

/// Hash a clear-text password with bcrypt.
pub fn hash_password(password: &str) -> DomainResult<String> {
    hash(password, DEFAULT_COST)
        .map_err(|e| DomainError::Storage(format!("password hashing failed: {}", e)))
}

/// Verify a password against a stored bcrypt hash.
pub fn verify_password(password: &str, hashed: &str) -> DomainResult<bool> {
    verify(password, hashed)
        .map_err(|e| DomainError::Storage(format!("password verification failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hashed = hash_password("secure_password_123").unwrap();
        assert!(verify_password("secure_password_123", &hashed).unwrap());
        assert!(!verify_password("wrong_password", &hashed).unwrap());
    }
}
