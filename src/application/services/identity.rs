//! Identity service — signup, authentication, preference management
//!
//! Customers and managers share one identity space: username and email
//! uniqueness spans both roles, never one.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use super::validation_error;
use crate::domain::{
    DomainError, DomainResult, MethodPayment, OptionPreference, RegisteredUser, RoleProfile,
    UserRepository, UserRole,
};
use crate::infrastructure::crypto::password::{hash_password, verify_password};

/// Signup request. The role flag selects which variant is constructed.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 3, max = 50, message = "must be 3-50 characters"))]
    pub username: String,
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub surname: String,
    pub phone: String,
    pub role: UserRole,
    pub preference: Option<OptionPreference>,
    /// Customer-only.
    pub payment_method: Option<MethodPayment>,
    /// Manager-only payout identifier.
    pub iban: Option<String>,
}

/// Identity service — the construction path for both user variants.
pub struct IdentityService {
    users: Arc<dyn UserRepository>,
}

impl IdentityService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    // ── Registration ────────────────────────────────────────────

    /// Register a new user, shaped by the requested role. Fields belonging
    /// to the other role are rejected; a manager without an IBAN is only
    /// warned about.
    pub async fn signup(&self, request: SignupRequest) -> DomainResult<RegisteredUser> {
        request.validate().map_err(|e| validation_error(&e))?;

        let profile = match request.role {
            UserRole::Customer => {
                if request.iban.is_some() {
                    return Err(DomainError::Validation(
                        "iban is a manager-only field".into(),
                    ));
                }
                RoleProfile::Customer {
                    payment_method: request.payment_method,
                }
            }
            UserRole::Manager => {
                if request.payment_method.is_some() {
                    return Err(DomainError::Validation(
                        "payment_method is a customer-only field".into(),
                    ));
                }
                if request.iban.is_none() {
                    warn!(username = %request.username, "manager registered without payout IBAN");
                }
                RoleProfile::Manager {
                    iban: request.iban,
                }
            }
        };

        // One uniqueness domain for both roles.
        if self.users.find_by_username(&request.username).await?.is_some() {
            return Err(DomainError::Conflict(format!(
                "username already taken: {}",
                request.username
            )));
        }
        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(DomainError::Conflict(format!(
                "email already registered: {}",
                request.email
            )));
        }

        let user = RegisteredUser {
            id: Uuid::new_v4().to_string(),
            username: request.username,
            email: request.email,
            password_hash: hash_password(&request.password)?,
            name: request.name,
            surname: request.surname,
            phone: request.phone,
            preference: request.preference.unwrap_or_default(),
            profile,
        };

        self.users.insert(user.clone()).await?;

        info!(user_id = %user.id, username = %user.username, role = %user.role(), "user registered");
        Ok(user)
    }

    // ── Authentication ──────────────────────────────────────────

    /// Verify credentials by username or email. Session/token issuance is
    /// the caller's concern; this only proves who the user is.
    pub async fn authenticate(
        &self,
        username_or_email: &str,
        password: &str,
    ) -> DomainResult<RegisteredUser> {
        let user = match self.users.find_by_username(username_or_email).await? {
            Some(user) => Some(user),
            None => self.users.find_by_email(username_or_email).await?,
        };

        let Some(user) = user else {
            return Err(DomainError::Unauthorized("invalid credentials".into()));
        };

        let valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::Unauthorized("invalid credentials".into()));
        }

        Ok(user)
    }

    // ── Preferences ─────────────────────────────────────────────

    /// Replace the user's embedded preference object.
    pub async fn update_preference(
        &self,
        user_id: &str,
        preference: OptionPreference,
    ) -> DomainResult<RegisteredUser> {
        let mut user = self.users.find_by_id(user_id).await?.ok_or_else(|| {
            DomainError::NotFound {
                entity: "RegisteredUser",
                field: "id",
                value: user_id.to_string(),
            }
        })?;

        user.preference = preference;
        self.users.update(user.clone()).await?;
        Ok(user)
    }

    pub async fn get_user(&self, id: &str) -> DomainResult<Option<RegisteredUser>> {
        self.users.find_by_id(id).await
    }
}

// ── Tests ──────────────────────────────────────────────────────
