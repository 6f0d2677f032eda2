//! User repository interface

use async_trait::async_trait;

use super::model::RegisteredUser;
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Username and email are unique across the whole
    /// collection, customers and managers alike; a duplicate of either
    /// fails with a conflict.
    async fn insert(&self, user: RegisteredUser) -> DomainResult<()>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<RegisteredUser>>;
    async fn find_by_username(&self, username: &str) -> DomainResult<Option<RegisteredUser>>;
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<RegisteredUser>>;

    /// Replace an existing user document. Re-checks uniqueness when the
    /// username or email changed.
    async fn update(&self, user: RegisteredUser) -> DomainResult<()>;

    async fn delete(&self, id: &str) -> DomainResult<()>;
}
