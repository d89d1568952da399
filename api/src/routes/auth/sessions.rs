use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::dto::SessionResponse;
use crate::handlers::ApiResult;
use crate::middleware::AuthContext;
use crate::state::AuthState;

/// Handler for GET /api/v1/auth/sessions
///
/// Active sessions of the caller, newest first. The session of the token
/// used for the request is flagged `current`.
pub async fn list_sessions(
    state: web::Data<AuthState>,
    auth: AuthContext,
) -> ApiResult<HttpResponse> {
    let sessions: Vec<SessionResponse> = state
        .auth_service
        .list_sessions(auth.user_id)
        .await?
        .into_iter()
        .map(|session| SessionResponse::new(session, auth.session_id))
        .collect();

    Ok(HttpResponse::Ok().json(sessions))
}

/// Handler for DELETE /api/v1/auth/sessions/{id}
///
/// ## Errors
/// - 404 Not Found: `SESSION_NOT_FOUND` for sessions of other users too
pub async fn revoke_session(
    state: web::Data<AuthState>,
    auth: AuthContext,
    session_id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state
        .auth_service
        .revoke_session(auth.user_id, session_id.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
