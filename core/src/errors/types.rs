//! Domain-specific error types for authentication, listings and moderation
//!
//! Messages here are for logs and problem `detail` fields. The machine
//! readable code each variant maps to lives in `mapping.rs`.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error("Invalid login or password")]
    InvalidCredentials,

    #[error("Account is locked until {until}")]
    LockedOut { until: DateTime<Utc> },

    #[error("Account has been deleted")]
    AccountDeleted,

    #[error("E-mail address has not been confirmed")]
    EmailNotConfirmed,

    #[error("E-mail address is already confirmed")]
    EmailAlreadyConfirmed,

    #[error("E-mail address is already registered")]
    EmailTaken,

    #[error("User name is already taken")]
    UserNameTaken,

    #[error("User not found")]
    UserNotFound,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Session not found")]
    SessionNotFound,

    #[error("Link is invalid or has expired")]
    InvalidUserToken,
}

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Token not yet valid")]
    TokenNotYetValid,

    #[error("Token revoked")]
    TokenRevoked,

    #[error("Refresh token reuse detected")]
    TokenReused,

    #[error("Refresh token expired")]
    RefreshTokenExpired,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Required field: {field}")]
    RequiredField { field: String },

    #[error("Invalid format: {field}")]
    InvalidFormat { field: String },

    #[error("Out of range: {field} (min: {min}, max: {max})")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
    },

    #[error("Invalid length: {field} (min: {min}, max: {max})")]
    InvalidLength {
        field: String,
        min: usize,
        max: usize,
    },

    #[error("Password does not meet the policy")]
    PasswordPolicy { violations: Vec<String> },

    #[error("One or more fields are invalid")]
    Fields {
        errors: BTreeMap<String, Vec<String>>,
    },

    #[error("Unsupported content type: {content_type}")]
    UnsupportedContentType { content_type: String },

    #[error("Payload exceeds {max_bytes} bytes")]
    PayloadTooLarge { max_bytes: usize },

    #[error("Business rule violation: {rule}")]
    BusinessRuleViolation { rule: String },
}

impl ValidationError {
    /// Field name to messages, as rendered in problem `errors`
    pub fn field_errors(&self) -> BTreeMap<String, Vec<String>> {
        let mut errors = BTreeMap::new();
        match self {
            ValidationError::Fields { errors: fields } => return fields.clone(),
            ValidationError::PasswordPolicy { violations } => {
                errors.insert("password".to_string(), violations.clone());
            }
            ValidationError::RequiredField { field }
            | ValidationError::InvalidFormat { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidLength { field, .. } => {
                errors.insert(field.clone(), vec![self.to_string()]);
            }
            _ => {}
        }
        errors
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let errors = errors
            .field_errors()
            .into_iter()
            .map(|(field, field_errors)| {
                let messages = field_errors
                    .iter()
                    .map(|error| match &error.message {
                        Some(message) => message.to_string(),
                        None => format!("{} is invalid ({})", field, error.code),
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();
        ValidationError::Fields { errors }
    }
}

/// Listing and photo errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ListingError {
    #[error("Listing not found")]
    NotFound,

    #[error("Cannot move listing from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Listing was rejected by content moderation: {reason}")]
    ModerationRejected { reason: String },

    #[error("Listing is not published")]
    NotPublished,

    #[error("Photo not found")]
    PhotoNotFound,

    #[error("A listing can hold at most {max} photos")]
    PhotoLimitReached { max: usize },
}

/// Report workflow errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReportError {
    #[error("Report not found")]
    NotFound,

    #[error("You cannot report your own listing")]
    OwnListing,

    #[error("Only published listings can be reported")]
    ListingNotReportable,

    #[error("You already have an open report for this listing")]
    DuplicateOpenReport,

    #[error("Cannot {action} a report that is {status}")]
    InvalidTransition { status: String, action: String },
}
