//! The authenticated caller of a service operation.

use eh_shared::{ClaimsPrincipal, Role};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::Claims;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: Uuid,
    pub roles: Vec<Role>,
}

impl Actor {
    pub fn new(user_id: Uuid, roles: Vec<Role>) -> Self {
        Self { user_id, roles }
    }

    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            roles: claims.roles.clone(),
        }
    }
}

impl ClaimsPrincipal for Actor {
    fn subject(&self) -> Uuid {
        self.user_id
    }

    fn roles(&self) -> &[Role] {
        &self.roles
    }
}
