use actix_web::web;

use eh_core::domain::value_objects::Actor;

use super::errors::unauthenticated;
use crate::middleware::AuthContext;
use crate::state::ListingState;
use juniper::FieldResult;

/// GraphQL request context
///
/// Services of the listing service plus the caller, when authenticated.
pub struct GraphQLContext {
    pub state: web::Data<ListingState>,
    pub auth: Option<AuthContext>,
    actor: Option<Actor>,
}

impl juniper::Context for GraphQLContext {}

impl GraphQLContext {
    pub fn new(state: web::Data<ListingState>, auth: Option<AuthContext>) -> Self {
        let actor = auth.as_ref().map(AuthContext::actor);
        Self { state, auth, actor }
    }

    /// The caller, if any
    pub fn viewer(&self) -> Option<&Actor> {
        self.actor.as_ref()
    }

    /// The caller, or an `UNAUTHORIZED` error
    pub fn actor(&self) -> FieldResult<&Actor> {
        self.actor.as_ref().ok_or_else(unauthenticated)
    }

    /// Bearer token of the caller, forwarded to the authorization service
    pub fn access_token(&self) -> FieldResult<&str> {
        self.auth
            .as_ref()
            .map(|auth| auth.token.as_str())
            .ok_or_else(unauthenticated)
    }
}
