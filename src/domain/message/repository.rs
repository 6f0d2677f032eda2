//! Message repository interface

use async_trait::async_trait;

use super::model::Message;
use crate::domain::DomainResult;

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn insert(&self, message: Message) -> DomainResult<()>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Message>>;

    async fn update(&self, message: Message) -> DomainResult<()>;

    /// All messages exchanged between two users, in either direction,
    /// unordered. Callers apply the deterministic conversation ordering.
    async fn list_between(&self, user_a: &str, user_b: &str) -> DomainResult<Vec<Message>>;

    /// Number of unread messages addressed to `user_id`.
    async fn count_unread_for(&self, user_id: &str) -> DomainResult<u64>;
}
