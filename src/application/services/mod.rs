//! Application services — one per use-case cluster.
//!
//! Services orchestrate repositories and collaborator ports; all business
//! rules that span more than one document live here. HTTP handlers (out of
//! scope) would be thin wrappers delegating to these.

pub mod identity;
pub mod messaging;
pub mod property;
pub mod review;

pub use identity::{IdentityService, SignupRequest};
pub use messaging::MessagingService;
pub use property::{CreatePropertyRequest, PropertyService, UpdatePropertyRequest};
pub use review::{NewReview, ReviewService};

use crate::domain::DomainError;

/// Flatten `validator` field errors into one `Validation` domain error.
pub(crate) fn validation_error(errors: &validator::ValidationErrors) -> DomainError {
    let details: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let msg = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{:?}", e.code));
                format!("{}: {}", field, msg)
            })
        })
        .collect();

    let message = if details.is_empty() {
        "validation failed".to_string()
    } else {
        details.join("; ")
    };

    DomainError::Validation(message)
}
