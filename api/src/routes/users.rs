//! User lookup and role administration
//!
//! `GET /users/{id}` and `GET /users/stats` are also what the listing
//! service's user directory calls, with the end user's bearer token.

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use eh_core::domain::value_objects::{UserProfile, UserSummary};
use eh_shared::{Error, Role};

use crate::dto::{AssignRoleRequest, UserStatsResponse};
use crate::handlers::{validate_body, ApiError, ApiResult};
use crate::middleware::AuthContext;
use crate::state::AuthState;

/// Handler for GET /api/v1/users/me
pub async fn me(state: web::Data<AuthState>, auth: AuthContext) -> ApiResult<HttpResponse> {
    let user = state.auth_service.get_user(auth.user_id).await?;
    Ok(HttpResponse::Ok().json(UserProfile::from(&user)))
}

/// Handler for GET /api/v1/users/stats (Admin)
///
/// ```json
/// { "total_users": 42 }
/// ```
pub async fn stats(state: web::Data<AuthState>, auth: AuthContext) -> ApiResult<HttpResponse> {
    let total_users = state.auth_service.count_users(&auth.actor()).await?;
    Ok(HttpResponse::Ok().json(UserStatsResponse { total_users }))
}

/// Handler for GET /api/v1/users/{id}
///
/// Public view of an account, used to show listing owners.
pub async fn get_user(
    state: web::Data<AuthState>,
    _auth: AuthContext,
    user_id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let user = state.auth_service.get_user(user_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserSummary {
        id: user.id,
        user_name: user.user_name,
        first_name: user.first_name,
        last_name: user.last_name,
    }))
}

/// Handler for POST /api/v1/users/{id}/roles (Admin)
///
/// ```json
/// { "role": "Admin" }
/// ```
pub async fn assign_role(
    state: web::Data<AuthState>,
    auth: AuthContext,
    user_id: web::Path<Uuid>,
    request: web::Json<AssignRoleRequest>,
) -> ApiResult<HttpResponse> {
    validate_body(&*request)?;
    let role = parse_role(&request.role)?;

    let user = state
        .auth_service
        .assign_role(&auth.actor(), user_id.into_inner(), role)
        .await?;
    Ok(HttpResponse::Ok().json(UserProfile::from(&user)))
}

/// Handler for DELETE /api/v1/users/{id}/roles/{role} (Admin)
pub async fn remove_role(
    state: web::Data<AuthState>,
    auth: AuthContext,
    path: web::Path<(Uuid, String)>,
) -> ApiResult<HttpResponse> {
    let (user_id, role) = path.into_inner();
    let role = parse_role(&role)?;

    let user = state
        .auth_service
        .remove_role(&auth.actor(), user_id, role)
        .await?;
    Ok(HttpResponse::Ok().json(UserProfile::from(&user)))
}

fn parse_role(value: &str) -> ApiResult<Role> {
    value.trim().parse::<Role>().map_err(|message| {
        ApiError(Error::validation(Default::default()).with_field_error("role", message))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role() {
        assert_eq!(parse_role(" admin ").unwrap(), Role::Admin);
        assert_eq!(parse_role("User").unwrap(), Role::User);

        let error = parse_role("owner").unwrap_err();
        assert_eq!(error.error().http_status(), 422);
        assert!(error.error().field_errors.contains_key("role"));
    }
}
