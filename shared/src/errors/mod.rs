//! Cross-service error value and its RFC 7807 rendering
//!
//! Services describe a failure with an [`Error`] (status, code, description).
//! The HTTP layer turns it into [`ProblemDetails`] and sends it as
//! `application/problem+json`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Media type of a serialized [`ProblemDetails`]
pub const PROBLEM_JSON: &str = "application/problem+json";

/// Coarse failure category, maps one-to-one onto an HTTP status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorStatus {
    BadRequest,
    Validation,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    PayloadTooLarge,
    UnsupportedMediaType,
    Locked,
    Internal,
    ServiceUnavailable,
}

impl ErrorStatus {
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorStatus::BadRequest => 400,
            ErrorStatus::Validation => 422,
            ErrorStatus::Unauthorized => 401,
            ErrorStatus::Forbidden => 403,
            ErrorStatus::NotFound => 404,
            ErrorStatus::Conflict => 409,
            ErrorStatus::PayloadTooLarge => 413,
            ErrorStatus::UnsupportedMediaType => 415,
            ErrorStatus::Locked => 423,
            ErrorStatus::Internal => 500,
            ErrorStatus::ServiceUnavailable => 503,
        }
    }

    /// Short human-readable summary used as the problem `title`
    pub fn title(&self) -> &'static str {
        match self {
            ErrorStatus::BadRequest => "Bad Request",
            ErrorStatus::Validation => "One or more validation errors occurred",
            ErrorStatus::Unauthorized => "Unauthorized",
            ErrorStatus::Forbidden => "Forbidden",
            ErrorStatus::NotFound => "Not Found",
            ErrorStatus::Conflict => "Conflict",
            ErrorStatus::PayloadTooLarge => "Payload Too Large",
            ErrorStatus::UnsupportedMediaType => "Unsupported Media Type",
            ErrorStatus::Locked => "Locked",
            ErrorStatus::Internal => "Internal Server Error",
            ErrorStatus::ServiceUnavailable => "Service Unavailable",
        }
    }

    /// Problem `type` URI, the RFC 9110 section for the status
    pub fn type_uri(&self) -> &'static str {
        match self {
            ErrorStatus::BadRequest | ErrorStatus::Validation => {
                "https://tools.ietf.org/html/rfc9110#section-15.5.1"
            }
            ErrorStatus::Unauthorized => "https://tools.ietf.org/html/rfc9110#section-15.5.2",
            ErrorStatus::Forbidden => "https://tools.ietf.org/html/rfc9110#section-15.5.4",
            ErrorStatus::NotFound => "https://tools.ietf.org/html/rfc9110#section-15.5.5",
            ErrorStatus::Conflict => "https://tools.ietf.org/html/rfc9110#section-15.5.10",
            ErrorStatus::PayloadTooLarge => "https://tools.ietf.org/html/rfc9110#section-15.5.14",
            ErrorStatus::UnsupportedMediaType => {
                "https://tools.ietf.org/html/rfc9110#section-15.5.16"
            }
            ErrorStatus::Locked => "https://tools.ietf.org/html/rfc4918#section-11.3",
            ErrorStatus::Internal => "https://tools.ietf.org/html/rfc9110#section-15.6.1",
            ErrorStatus::ServiceUnavailable => "https://tools.ietf.org/html/rfc9110#section-15.6.4",
        }
    }
}

/// Failure description passed between layers and services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{code}: {description}")]
pub struct Error {
    pub status: ErrorStatus,
    pub code: String,
    pub description: String,
    /// Field name to messages, for validation failures
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl Error {
    pub fn new(status: ErrorStatus, code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            description: description.into(),
            field_errors: BTreeMap::new(),
        }
    }

    pub fn bad_request(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ErrorStatus::BadRequest, code, description)
    }

    pub fn unauthorized(description: impl Into<String>) -> Self {
        Self::new(ErrorStatus::Unauthorized, error_codes::UNAUTHORIZED, description)
    }

    pub fn forbidden(description: impl Into<String>) -> Self {
        Self::new(ErrorStatus::Forbidden, error_codes::FORBIDDEN, description)
    }

    pub fn not_found(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ErrorStatus::NotFound, code, description)
    }

    pub fn conflict(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ErrorStatus::Conflict, code, description)
    }

    /// Internal failures never leak their cause to the client
    pub fn internal() -> Self {
        Self::new(
            ErrorStatus::Internal,
            error_codes::INTERNAL_ERROR,
            "An internal error occurred",
        )
    }

    pub fn validation(field_errors: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            status: ErrorStatus::Validation,
            code: error_codes::VALIDATION_ERROR.to_string(),
            description: "Request validation failed".to_string(),
            field_errors,
        }
    }

    pub fn with_field_error(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.field_errors
            .entry(field.into())
            .or_default()
            .push(message.into());
        self
    }

    pub fn http_status(&self) -> u16 {
        self.status.http_status()
    }

    pub fn to_problem_details(&self, instance: Option<&str>) -> ProblemDetails {
        ProblemDetails {
            type_uri: self.status.type_uri().to_string(),
            title: self.status.title().to_string(),
            status: self.http_status(),
            detail: self.description.clone(),
            instance: instance.map(str::to_string),
            code: self.code.clone(),
            errors: if self.field_errors.is_empty() {
                None
            } else {
                Some(self.field_errors.clone())
            },
        }
    }
}

/// RFC 7807 problem document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_uri: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// Machine readable error code
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

impl From<Error> for ProblemDetails {
    fn from(error: Error) -> Self {
        error.to_problem_details(None)
    }
}

/// Error codes shared by both services
pub mod error_codes {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const FORBIDDEN: &str = "FORBIDDEN";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const CONCURRENCY_CONFLICT: &str = "CONCURRENCY_CONFLICT";
    pub const SERVICE_UNAVAILABLE: &str = "SERVICE_UNAVAILABLE";

    pub const INVALID_CREDENTIALS: &str = "INVALID_CREDENTIALS";
    pub const ACCOUNT_LOCKED: &str = "ACCOUNT_LOCKED";
    pub const ACCOUNT_DELETED: &str = "ACCOUNT_DELETED";
    pub const EMAIL_NOT_CONFIRMED: &str = "EMAIL_NOT_CONFIRMED";
    pub const EMAIL_ALREADY_CONFIRMED: &str = "EMAIL_ALREADY_CONFIRMED";
    pub const EMAIL_TAKEN: &str = "EMAIL_TAKEN";
    pub const USER_NAME_TAKEN: &str = "USER_NAME_TAKEN";
    pub const USER_NOT_FOUND: &str = "USER_NOT_FOUND";
    pub const PASSWORD_POLICY: &str = "PASSWORD_POLICY";

    pub const TOKEN_EXPIRED: &str = "TOKEN_EXPIRED";
    pub const TOKEN_INVALID: &str = "TOKEN_INVALID";
    pub const TOKEN_REVOKED: &str = "TOKEN_REVOKED";
    pub const TOKEN_REUSED: &str = "TOKEN_REUSED";
    pub const SESSION_NOT_FOUND: &str = "SESSION_NOT_FOUND";

    pub const LISTING_NOT_FOUND: &str = "LISTING_NOT_FOUND";
    pub const INVALID_TRANSITION: &str = "INVALID_TRANSITION";
    pub const MODERATION_REJECTED: &str = "MODERATION_REJECTED";
    pub const PHOTO_NOT_FOUND: &str = "PHOTO_NOT_FOUND";
    pub const PHOTO_LIMIT: &str = "PHOTO_LIMIT";
    pub const PHOTO_TOO_LARGE: &str = "PHOTO_TOO_LARGE";
    pub const UNSUPPORTED_MEDIA_TYPE: &str = "UNSUPPORTED_MEDIA_TYPE";

    pub const REPORT_NOT_FOUND: &str = "REPORT_NOT_FOUND";
    pub const DUPLICATE_REPORT: &str = "DUPLICATE_REPORT";
    pub const OWN_LISTING: &str = "OWN_LISTING";
    pub const LISTING_NOT_REPORTABLE: &str = "LISTING_NOT_REPORTABLE";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_details_serialization() {
        let problem = Error::not_found(error_codes::LISTING_NOT_FOUND, "Listing was not found")
            .to_problem_details(Some("/graphql"));

        let json = serde_json::to_value(&problem).unwrap();
        assert_eq!(json["status"], 404);
        assert_eq!(json["type"], "https://tools.ietf.org/html/rfc9110#section-15.5.5");
        assert_eq!(json["code"], "LISTING_NOT_FOUND");
        assert_eq!(json["instance"], "/graphql");
        assert!(json.get("errors").is_none());
    }

    #[test]
    fn test_validation_error_carries_field_errors() {
        let error = Error::validation(BTreeMap::new())
            .with_field_error("password", "too short")
            .with_field_error("password", "needs a digit");

        let problem = ProblemDetails::from(error);
        assert_eq!(problem.status, 422);
        assert_eq!(problem.errors.unwrap()["password"].len(), 2);
    }

    #[test]
    fn test_internal_error_hides_details() {
        let error = Error::internal();
        assert_eq!(error.http_status(), 500);
        assert_eq!(error.to_string(), "INTERNAL_ERROR: An internal error occurred");
    }
}
