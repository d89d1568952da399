//! JWT authentication middleware for protecting API endpoints.
//!
//! The middleware reads the bearer token from the Authorization header,
//! verifies it with the [`AccessTokenValidator`] registered as app data and
//! injects an [`AuthContext`] into the request extensions.
//!
//! Two modes:
//! 1. Required (`JwtAuth::required()`): requests without a valid token are
//!    rejected with 401
//! 2. Optional (`JwtAuth::optional()`): anonymous requests pass through, a
//!    token that is present must still be valid

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};
use uuid::Uuid;

use eh_core::domain::entities::Claims;
use eh_core::domain::value_objects::Actor;
use eh_core::services::AccessTokenValidator;
use eh_core::DomainError;
use eh_shared::{ClaimsPrincipal, Role};

use crate::handlers::ApiError;

/// Authenticated caller, injected into requests by [`JwtAuth`]
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub roles: Vec<Role>,
    /// Session the access token was minted for
    pub session_id: Uuid,
    /// The raw access token, forwarded on calls to the authorization service
    pub token: String,
}

impl AuthContext {
    pub fn from_claims(claims: Claims, token: String) -> Self {
        Self {
            user_id: claims.sub,
            roles: claims.roles,
            session_id: claims.sid,
            token,
        }
    }

    pub fn actor(&self) -> Actor {
        Actor::new(self.user_id, self.roles.clone())
    }
}

impl ClaimsPrincipal for AuthContext {
    fn subject(&self) -> Uuid {
        self.user_id
    }

    fn roles(&self) -> &[Role] {
        &self.roles
    }
}

/// JWT authentication middleware factory
#[derive(Debug, Clone, Copy)]
pub struct JwtAuth {
    required: bool,
}

impl JwtAuth {
    /// Reject requests without a valid access token
    pub fn required() -> Self {
        Self { required: true }
    }

    /// Authenticate when a token is present, let anonymous requests through
    pub fn optional() -> Self {
        Self { required: false }
    }
}

impl Default for JwtAuth {
    fn default() -> Self {
        Self::required()
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            required: self.required,
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    required: bool,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let required = self.required;

        Box::pin(async move {
            let rejection = match extract_bearer_token(&req) {
                Some(token) => match authenticate(&req, token) {
                    Ok(context) => {
                        tracing::debug!(user_id = %context.user_id, "Request authenticated");
                        req.extensions_mut().insert(context);
                        None
                    }
                    Err(e) => Some(e),
                },
                None if required => Some(ApiError::unauthorized(
                    "Missing or invalid Authorization header",
                )),
                None => None,
            };

            // Rejections are answered here as problem+json
            if let Some(error) = rejection {
                let response = error.error_response();
                return Ok(req.into_response(response).map_into_right_body());
            }

            service
                .call(req)
                .await
                .map(ServiceResponse::map_into_left_body)
        })
    }
}

fn authenticate(req: &ServiceRequest, token: String) -> Result<AuthContext, ApiError> {
    let validator = req
        .app_data::<web::Data<AccessTokenValidator>>()
        .ok_or_else(|| {
            ApiError::from(DomainError::internal(
                "AccessTokenValidator is not registered as app data",
            ))
        })?;

    let claims = validator.validate(&token).map_err(|e| {
        tracing::debug!(error = %e, "Access token rejected");
        ApiError::from(e)
    })?;

    Ok(AuthContext::from_claims(claims, token))
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|s| s.to_string())
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Authentication required").into());

        ready(result)
    }
}

/// Extractor for optional authentication
pub struct OptionalAuth(pub Option<AuthContext>);

impl OptionalAuth {
    pub fn actor(&self) -> Option<Actor> {
        self.0.as_ref().map(AuthContext::actor)
    }
}

impl FromRequest for OptionalAuth {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let auth = req.extensions().get::<AuthContext>().cloned();
        ready(Ok(OptionalAuth(auth)))
    }
}
