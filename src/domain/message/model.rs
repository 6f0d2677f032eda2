//! Message domain entity
//!
//! Append-only direct message between two registered users. No aggregate
//! relationship to the rest of the model; delivery transport is out of
//! scope, only the record shape lives here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub recipient_id: String,
    /// Full date-time, ISO-8601.
    pub timestamp: DateTime<Utc>,
    pub content: String,
    pub is_read: bool,
}

impl Message {
    pub fn new(
        sender_id: impl Into<String>,
        recipient_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender_id: sender_id.into(),
            recipient_id: recipient_id.into(),
            timestamp: Utc::now(),
            content: content.into(),
            is_read: false,
        }
    }

    /// Idempotent: marking an already-read message changes nothing.
    pub fn mark_read(&mut self) {
        self.is_read = true;
    }
}

// ── Tests ──────────────────────────────────────────────────────
