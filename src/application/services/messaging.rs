//! Messaging service — direct messages between registered users
//!
//! Append-only records; no aggregate relationship to the rest of the
//! model. Delivery transport is out of scope.

use std::sync::Arc;

use tracing::debug;

use crate::domain::{
    DomainError, DomainResult, Message, MessageRepository, UserRepository,
};

pub struct MessagingService {
    messages: Arc<dyn MessageRepository>,
    users: Arc<dyn UserRepository>,
}

impl MessagingService {
    pub fn new(messages: Arc<dyn MessageRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { messages, users }
    }

    async fn ensure_user(&self, field: &'static str, user_id: &str) -> DomainResult<()> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(DomainError::Reference {
                entity: "Message",
                field,
                value: user_id.to_string(),
            });
        }
        Ok(())
    }

    /// Append a message between two existing users, stamped at send time.
    pub async fn send_message(
        &self,
        sender_id: &str,
        recipient_id: &str,
        content: impl Into<String>,
    ) -> DomainResult<Message> {
        self.ensure_user("sender_id", sender_id).await?;
        self.ensure_user("recipient_id", recipient_id).await?;

        let message = Message::new(sender_id, recipient_id, content);
        self.messages.insert(message.clone()).await?;

        debug!(message_id = %message.id, sender_id, recipient_id, "message sent");
        Ok(message)
    }

    /// Idempotent: marking an already-read message again is a no-op, not
    /// an error.
    pub async fn mark_read(&self, message_id: &str) -> DomainResult<Message> {
        let mut message =
            self.messages
                .find_by_id(message_id)
                .await?
                .ok_or_else(|| DomainError::NotFound {
                    entity: "Message",
                    field: "id",
                    value: message_id.to_string(),
                })?;

        if !message.is_read {
            message.mark_read();
            self.messages.update(message.clone()).await?;
        }
        Ok(message)
    }

    /// Both directions of a two-user conversation, ordered by timestamp
    /// with the id as deterministic tie-break.
    pub async fn conversation(
        &self,
        user_a: &str,
        user_b: &str,
    ) -> DomainResult<Vec<Message>> {
        let mut messages = self.messages.list_between(user_a, user_b).await?;
        messages.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
        Ok(messages)
    }

    pub async fn unread_count(&self, user_id: &str) -> DomainResult<u64> {
        self.messages.count_unread_for(user_id).await
    }
}

// ── Tests ──────────────────────────────────────────────────────
