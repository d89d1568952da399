//! Roles and permission checks over authenticated claims

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Application role carried in the `roles` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" | "moderator" => Ok(Role::Admin),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// Something that knows who the caller is and which roles they hold.
///
/// Implemented by the token claims and by the request-scoped auth context,
/// so permission checks read the same on both services.
pub trait ClaimsPrincipal {
    fn subject(&self) -> Uuid;

    fn roles(&self) -> &[Role];

    fn has_role(&self, role: Role) -> bool {
        self.roles().contains(&role)
    }

    fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    /// Owners may modify their own resources, admins may modify anything
    fn can_modify(&self, owner_id: Uuid) -> bool {
        self.subject() == owner_id || self.is_admin()
    }
}
