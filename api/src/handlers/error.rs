//! Rendering of failures as `application/problem+json`
//!
//! Handlers return [`ApiResult`]; any `DomainError` converts into an
//! [`ApiError`] with `?`, and actix renders it through [`ResponseError`].

use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError},
    http::StatusCode,
    web, HttpRequest, HttpResponse, ResponseError,
};
use validator::Validate;

use eh_core::DomainError;
use eh_shared::{error_codes, Error, ErrorStatus, PROBLEM_JSON};

pub type ApiResult<T> = Result<T, ApiError>;

/// Error returned by every handler
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ApiError(pub Error);

impl ApiError {
    pub fn bad_request(description: impl Into<String>) -> Self {
        Self(Error::bad_request(error_codes::BAD_REQUEST, description))
    }

    pub fn unauthorized(description: impl Into<String>) -> Self {
        Self(Error::unauthorized(description))
    }

    pub fn error(&self) -> &Error {
        &self.0
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        match &error {
            DomainError::Internal { message } => {
                tracing::error!(%message, "Request failed with an internal error")
            }
            DomainError::ServiceUnavailable { service } => {
                tracing::warn!(%service, "Request failed, dependency unavailable")
            }
            _ => tracing::debug!(error = %error, "Request rejected"),
        }
        Self(error.to_error())
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::from(errors).into()
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        problem_response(&self.0, None)
    }
}

/// Build the problem document response for `error`
pub fn problem_response(error: &Error, instance: Option<&str>) -> HttpResponse {
    let status =
        StatusCode::from_u16(error.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status)
        .content_type(PROBLEM_JSON)
        .json(error.to_problem_details(instance))
}

/// Run the `validator` rules of a request body
pub fn validate_body<T: Validate>(body: &T) -> ApiResult<()> {
    body.validate().map_err(ApiError::from)
}

/// JSON extractor settings; malformed bodies become problem documents
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| {
            let error = match &err {
                JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
                    Error::new(
                        ErrorStatus::PayloadTooLarge,
                        error_codes::BAD_REQUEST,
                        "Request body is too large",
                    )
                }
                JsonPayloadError::ContentType => Error::new(
                    ErrorStatus::UnsupportedMediaType,
                    error_codes::UNSUPPORTED_MEDIA_TYPE,
                    "Expected an application/json body",
                ),
                other => Error::bad_request(
                    error_codes::BAD_REQUEST,
                    format!("Malformed JSON body: {}", other),
                ),
            };
            ApiError(error).into()
        })
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: PathError, _req| {
        ApiError::bad_request(format!("Invalid path parameter: {}", err)).into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, _req| {
        ApiError::bad_request(format!("Invalid query string: {}", err)).into()
    })
}

/// Default service for unknown routes
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    let error = Error::not_found(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    );
    problem_response(&error, Some(req.path()))
}
