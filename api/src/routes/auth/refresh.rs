use actix_web::{web, HttpResponse};

use crate::dto::RefreshTokenRequest;
use crate::handlers::{validate_body, ApiResult};
use crate::state::AuthState;

/// Handler for POST /api/v1/auth/refresh
///
/// Rotates the refresh token: the presented one is spent and a new pair is
/// returned. Presenting a spent token revokes every session descending from
/// the same login.
///
/// # Request Body
///
/// ```json
/// {
///     "refresh_token": "q2V0..."
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// Same body as login.
///
/// ## Errors
/// - 401 Unauthorized: `TOKEN_INVALID`, `TOKEN_EXPIRED`, `TOKEN_REVOKED`, `TOKEN_REUSED`
pub async fn refresh(
    state: web::Data<AuthState>,
    request: web::Json<RefreshTokenRequest>,
) -> ApiResult<HttpResponse> {
    validate_body(&*request)?;

    let response = state.auth_service.refresh(&request.refresh_token).await?;
    Ok(HttpResponse::Ok().json(response))
}
