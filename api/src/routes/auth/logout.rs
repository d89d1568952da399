use actix_web::{web, HttpResponse};

use eh_shared::MessageResponse;

use crate::dto::LogoutAllResponse;
use crate::handlers::ApiResult;
use crate::middleware::AuthContext;
use crate::state::AuthState;

/// Handler for POST /api/v1/auth/logout
///
/// Revokes the session of the presented access token. The access token
/// itself stays valid until it expires.
///
/// # Headers
///
/// ```text
/// Authorization: Bearer {access_token}
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "message": "Logged out successfully"
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Missing or invalid access token
pub async fn logout(state: web::Data<AuthState>, auth: AuthContext) -> ApiResult<HttpResponse> {
    state
        .auth_service
        .logout(auth.user_id, auth.session_id)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Logged out successfully")))
}

/// Handler for POST /api/v1/auth/logout-all
///
/// Revokes every session of the caller.
///
/// ## Success (200 OK)
/// ```json
/// {
///     "message": "Logged out of all sessions",
///     "sessions_revoked": 3
/// }
/// ```
pub async fn logout_all(state: web::Data<AuthState>, auth: AuthContext) -> ApiResult<HttpResponse> {
    let revoked = state.auth_service.logout_all(auth.user_id).await?;

    Ok(HttpResponse::Ok().json(LogoutAllResponse {
        message: "Logged out of all sessions".to_string(),
        sessions_revoked: revoked,
    }))
}
