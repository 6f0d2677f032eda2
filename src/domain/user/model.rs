//! Registered user domain entity
//!
//! Customers and managers share one `users` collection and one uniqueness
//! domain for username and email. The stored `role` field is the
//! discriminator; it is carried by [`RoleProfile`] so a document can never
//! hold a `role` value that disagrees with its variant-specific payload.

use serde::{Deserialize, Serialize};

/// User role discriminator, as persisted in the `role` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Customer,
    Manager,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "CUSTOMER",
            Self::Manager => "MANAGER",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Embedded user preferences. No independent lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionPreference {
    pub theme: String,
    pub language: String,
}

/// Embedded payment method, carried only by customers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodPayment {
    /// e.g. "credit_card", "paypal"
    #[serde(rename = "type")]
    pub kind: String,
    /// e.g. "Mastercard", "Visa"
    pub provider: String,
}

/// Role-specific payload, tagged by the stored `role` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role")]
pub enum RoleProfile {
    #[serde(rename = "CUSTOMER")]
    Customer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        payment_method: Option<MethodPayment>,
    },
    #[serde(rename = "MANAGER")]
    Manager {
        /// Bank payout identifier. Optional: its absence is a validation
        /// concern, not a hard requirement.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        iban: Option<String>,
    },
}

impl RoleProfile {
    pub fn role(&self) -> UserRole {
        match self {
            Self::Customer { .. } => UserRole::Customer,
            Self::Manager { .. } => UserRole::Manager,
        }
    }
}

/// Registered user entity. One document shape for both roles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisteredUser {
    pub id: String,
    pub username: String,
    pub email: String,
    /// Bcrypt hash. The clear-text password never reaches the store.
    #[serde(rename = "password")]
    pub password_hash: String,
    pub name: String,
    pub surname: String,
    pub phone: String,
    pub preference: OptionPreference,
    #[serde(flatten)]
    pub profile: RoleProfile,
}

impl RegisteredUser {
    pub fn role(&self) -> UserRole {
        self.profile.role()
    }

    pub fn is_manager(&self) -> bool {
        self.role() == UserRole::Manager
    }
}

// ── Tests ──────────────────────────────────────────────────────
