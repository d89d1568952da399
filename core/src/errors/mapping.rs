//! Conversion of domain errors into the cross-service `Error` value

use eh_shared::errors::{error_codes, Error, ErrorStatus};

use super::{AuthError, DomainError, ListingError, ReportError, TokenError, ValidationError};

impl DomainError {
    /// Map to the status/code/description triple sent to clients.
    ///
    /// Internal failures are logged by the caller and never exposed.
    pub fn to_error(&self) -> Error {
        match self {
            DomainError::NotFound { resource } => Error::not_found(
                error_codes::NOT_FOUND,
                format!("{} was not found", resource),
            ),
            DomainError::Unauthorized => Error::unauthorized("Authentication is required"),
            DomainError::ConcurrencyConflict { .. } => {
                Error::conflict(error_codes::CONCURRENCY_CONFLICT, self.to_string())
            }
            DomainError::ServiceUnavailable { .. } => Error::new(
                ErrorStatus::ServiceUnavailable,
                error_codes::SERVICE_UNAVAILABLE,
                self.to_string(),
            ),
            DomainError::Internal { .. } => Error::internal(),
            DomainError::Auth(error) => auth_error(error),
            DomainError::Token(error) => token_error(error),
            DomainError::Validation(error) => validation_error(error),
            DomainError::Listing(error) => listing_error(error),
            DomainError::Report(error) => report_error(error),
        }
    }
}

impl From<&DomainError> for Error {
    fn from(error: &DomainError) -> Self {
        error.to_error()
    }
}

fn auth_error(error: &AuthError) -> Error {
    let description = error.to_string();
    match error {
        AuthError::InvalidCredentials => Error::new(
            ErrorStatus::Unauthorized,
            error_codes::INVALID_CREDENTIALS,
            description,
        ),
        AuthError::LockedOut { .. } => {
            Error::new(ErrorStatus::Locked, error_codes::ACCOUNT_LOCKED, description)
        }
        AuthError::AccountDeleted => {
            Error::new(ErrorStatus::Forbidden, error_codes::ACCOUNT_DELETED, description)
        }
        AuthError::EmailNotConfirmed => Error::new(
            ErrorStatus::Forbidden,
            error_codes::EMAIL_NOT_CONFIRMED,
            description,
        ),
        AuthError::EmailAlreadyConfirmed => {
            Error::conflict(error_codes::EMAIL_ALREADY_CONFIRMED, description)
        }
        AuthError::EmailTaken => Error::conflict(error_codes::EMAIL_TAKEN, description),
        AuthError::UserNameTaken => Error::conflict(error_codes::USER_NAME_TAKEN, description),
        AuthError::UserNotFound => Error::not_found(error_codes::USER_NOT_FOUND, description),
        AuthError::InsufficientPermissions => Error::forbidden(description),
        AuthError::SessionNotFound => {
            Error::not_found(error_codes::SESSION_NOT_FOUND, description)
        }
        AuthError::InvalidUserToken => {
            Error::bad_request(error_codes::TOKEN_INVALID, description)
        }
    }
}

fn token_error(error: &TokenError) -> Error {
    let description = error.to_string();
    let code = match error {
        TokenError::TokenExpired | TokenError::RefreshTokenExpired => error_codes::TOKEN_EXPIRED,
        TokenError::TokenRevoked => error_codes::TOKEN_REVOKED,
        TokenError::TokenReused => error_codes::TOKEN_REUSED,
        TokenError::TokenGenerationFailed => return Error::internal(),
        TokenError::InvalidTokenFormat
        | TokenError::TokenNotYetValid
        | TokenError::InvalidRefreshToken => error_codes::TOKEN_INVALID,
    };
    Error::new(ErrorStatus::Unauthorized, code, description)
}

fn validation_error(error: &ValidationError) -> Error {
    match error {
        ValidationError::UnsupportedContentType { .. } => Error::new(
            ErrorStatus::UnsupportedMediaType,
            error_codes::UNSUPPORTED_MEDIA_TYPE,
            error.to_string(),
        ),
        ValidationError::PayloadTooLarge { .. } => Error::new(
            ErrorStatus::PayloadTooLarge,
            error_codes::PHOTO_TOO_LARGE,
            error.to_string(),
        ),
        ValidationError::BusinessRuleViolation { .. } => {
            Error::bad_request(error_codes::BAD_REQUEST, error.to_string())
        }
        ValidationError::PasswordPolicy { .. } => {
            let mut mapped = Error::validation(error.field_errors());
            mapped.code = error_codes::PASSWORD_POLICY.to_string();
            mapped.description = error.to_string();
            mapped
        }
        _ => {
            let mut mapped = Error::validation(error.field_errors());
            mapped.description = error.to_string();
            mapped
        }
    }
}

fn listing_error(error: &ListingError) -> Error {
    let description = error.to_string();
    match error {
        ListingError::NotFound => Error::not_found(error_codes::LISTING_NOT_FOUND, description),
        ListingError::PhotoNotFound => Error::not_found(error_codes::PHOTO_NOT_FOUND, description),
        ListingError::InvalidTransition { .. } | ListingError::NotPublished => {
            Error::conflict(error_codes::INVALID_TRANSITION, description)
        }
        ListingError::ModerationRejected { .. } => Error::new(
            ErrorStatus::Validation,
            error_codes::MODERATION_REJECTED,
            description,
        ),
        ListingError::PhotoLimitReached { .. } => {
            Error::conflict(error_codes::PHOTO_LIMIT, description)
        }
    }
}

fn report_error(error: &ReportError) -> Error {
    let description = error.to_string();
    match error {
        ReportError::NotFound => Error::not_found(error_codes::REPORT_NOT_FOUND, description),
        ReportError::OwnListing => Error::bad_request(error_codes::OWN_LISTING, description),
        ReportError::ListingNotReportable => {
            Error::bad_request(error_codes::LISTING_NOT_REPORTABLE, description)
        }
        ReportError::DuplicateOpenReport => {
            Error::conflict(error_codes::DUPLICATE_REPORT, description)
        }
        ReportError::InvalidTransition { .. } => {
            Error::conflict(error_codes::INVALID_TRANSITION, description)
        }
    }
}
