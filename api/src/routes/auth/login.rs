use actix_web::{web, HttpRequest, HttpResponse};

use eh_core::services::LoginInput;

use super::{client_ip, user_agent};
use crate::dto::LoginRequest;
use crate::handlers::{validate_body, ApiResult};
use crate::state::AuthState;

/// Handler for POST /api/v1/auth/login
///
/// # Request Body
///
/// ```json
/// {
///     "login": "ana@example.com",
///     "password": "Secret1!"
/// }
/// ```
///
/// `login` is the e-mail address or the user name.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "access_token": "eyJ...",
///     "refresh_token": "q2V0...",
///     "token_type": "Bearer",
///     "expires_in": 900,
///     "refresh_expires_in": 604800,
///     "session_id": "9b2c...",
///     "user": { "id": "...", "email": "ana@example.com", "roles": ["User"], ... }
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: `INVALID_CREDENTIALS`
/// - 403 Forbidden: `ACCOUNT_DELETED`, `EMAIL_NOT_CONFIRMED`
/// - 423 Locked: `ACCOUNT_LOCKED` after too many failed attempts
pub async fn login(
    req: HttpRequest,
    state: web::Data<AuthState>,
    request: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    validate_body(&*request)?;
    let request = request.into_inner();

    let response = state
        .auth_service
        .login(LoginInput {
            login: request.login.trim().to_string(),
            password: request.password,
            user_agent: user_agent(&req),
            ip_address: client_ip(&req),
        })
        .await?;

    Ok(HttpResponse::Ok().json(response))
}
