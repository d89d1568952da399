use actix_web::{web, HttpResponse};

use crate::dto::{RegisterRequest, RegisterResponse};
use crate::handlers::ApiResult;
use crate::state::AuthState;

/// Handler for POST /api/v1/auth/register
///
/// Creates an unconfirmed account and mails a confirmation link.
///
/// # Request Body
///
/// ```json
/// {
///     "email": "ana@example.com",
///     "user_name": "ana.silva",
///     "password": "Secret1!",
///     "first_name": "Ana",
///     "last_name": "Silva"
/// }
/// ```
///
/// # Response
///
/// ## Success (201 Created)
/// ```json
/// {
///     "user_id": "550e8400-e29b-41d4-a716-446655440000",
///     "email_confirmed": false,
///     "message": "Registration successful, check your e-mail to confirm the account"
/// }
/// ```
///
/// ## Errors
/// - 409 Conflict: `EMAIL_TAKEN` or `USER_NAME_TAKEN`
/// - 422 Unprocessable Entity: invalid fields or `PASSWORD_POLICY`
pub async fn register(
    state: web::Data<AuthState>,
    request: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let user = state
        .auth_service
        .register(request.into_inner().into())
        .await?;

    Ok(HttpResponse::Created().json(RegisterResponse {
        user_id: user.id,
        email_confirmed: user.email_confirmed,
        message: "Registration successful, check your e-mail to confirm the account".to_string(),
    }))
}
