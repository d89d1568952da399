use actix_web::{web, HttpResponse};

use eh_shared::MessageResponse;

use crate::dto::{ConfirmEmailRequest, EmailRequest};
use crate::handlers::{validate_body, ApiResult};
use crate::state::AuthState;

/// Handler for POST /api/v1/auth/confirm-email
///
/// # Request Body
///
/// ```json
/// {
///     "user_id": "550e8400-e29b-41d4-a716-446655440000",
///     "token": "from the mailed link"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: `TOKEN_INVALID` for unknown, spent or expired tokens
/// - 409 Conflict: `EMAIL_ALREADY_CONFIRMED`
pub async fn confirm_email(
    state: web::Data<AuthState>,
    request: web::Json<ConfirmEmailRequest>,
) -> ApiResult<HttpResponse> {
    validate_body(&*request)?;

    state
        .auth_service
        .confirm_email(request.user_id, request.token.trim())
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("E-mail confirmed")))
}

/// Handler for POST /api/v1/auth/resend-confirmation
///
/// Answers 202 whether or not the address belongs to an unconfirmed account.
pub async fn resend_confirmation(
    state: web::Data<AuthState>,
    request: web::Json<EmailRequest>,
) -> ApiResult<HttpResponse> {
    validate_body(&*request)?;

    state
        .auth_service
        .resend_confirmation(request.email.trim())
        .await?;
    Ok(HttpResponse::Accepted().json(MessageResponse::new(
        "If the account exists and is unconfirmed, a new link has been sent",
    )))
}
