use actix_web::{web, HttpResponse};

use eh_shared::MessageResponse;

use crate::dto::{ChangePasswordRequest, EmailRequest, ResetPasswordRequest};
use crate::handlers::{validate_body, ApiResult};
use crate::middleware::AuthContext;
use crate::state::AuthState;

/// Handler for POST /api/v1/auth/forgot-password
///
/// Answers 202 for any well-formed address so accounts cannot be probed.
///
/// # Request Body
///
/// ```json
/// {
///     "email": "ana@example.com"
/// }
/// ```
pub async fn forgot_password(
    state: web::Data<AuthState>,
    request: web::Json<EmailRequest>,
) -> ApiResult<HttpResponse> {
    validate_body(&*request)?;

    state
        .auth_service
        .forgot_password(request.email.trim())
        .await?;
    Ok(HttpResponse::Accepted().json(MessageResponse::new(
        "If the account exists, a password reset link has been sent",
    )))
}

/// Handler for POST /api/v1/auth/reset-password
///
/// Sets a new password with the mailed token and signs out every session.
///
/// # Request Body
///
/// ```json
/// {
///     "email": "ana@example.com",
///     "token": "from the mailed link",
///     "new_password": "Better2#"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: `TOKEN_INVALID`
/// - 422 Unprocessable Entity: `PASSWORD_POLICY`
pub async fn reset_password(
    state: web::Data<AuthState>,
    request: web::Json<ResetPasswordRequest>,
) -> ApiResult<HttpResponse> {
    validate_body(&*request)?;

    state
        .auth_service
        .reset_password(
            request.email.trim(),
            request.token.trim(),
            &request.new_password,
        )
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Password has been reset")))
}

/// Handler for POST /api/v1/auth/change-password
///
/// ## Errors
/// - 401 Unauthorized: wrong current password (`INVALID_CREDENTIALS`)
/// - 422 Unprocessable Entity: `PASSWORD_POLICY`
pub async fn change_password(
    state: web::Data<AuthState>,
    auth: AuthContext,
    request: web::Json<ChangePasswordRequest>,
) -> ApiResult<HttpResponse> {
    validate_body(&*request)?;

    state
        .auth_service
        .change_password(
            auth.user_id,
            &request.current_password,
            &request.new_password,
        )
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Password changed")))
}
