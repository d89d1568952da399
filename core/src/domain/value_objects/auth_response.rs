//! Authentication response value object for API responses.

use chrono::{DateTime, Utc};
use eh_shared::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{TokenPair, User};

/// Account details safe to return to its owner
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub roles: Vec<Role>,
    pub email_confirmed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            user_name: user.user_name.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            roles: user.roles.clone(),
            email_confirmed: user.email_confirmed,
            created_at: user.created_at,
        }
    }
}

/// Authentication response containing tokens and user metadata
///
/// Returned by login and refresh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    /// JWT access token for API authentication
    pub access_token: String,

    /// Opaque refresh token for obtaining new access tokens
    pub refresh_token: String,

    /// Always `Bearer`
    pub token_type: String,

    /// Access token expiration time in seconds
    pub expires_in: i64,

    /// Refresh token expiration time in seconds
    pub refresh_expires_in: i64,

    pub session_id: Uuid,

    pub user: UserProfile,
}

impl AuthResponse {
    /// Creates an authentication response from a token pair and the user
    pub fn from_token_pair(token_pair: TokenPair, user: &User) -> Self {
        Self {
            access_token: token_pair.access_token,
            refresh_token: token_pair.refresh_token,
            token_type: token_pair.token_type,
            expires_in: token_pair.expires_in,
            refresh_expires_in: token_pair.refresh_expires_in,
            session_id: token_pair.session_id,
            user: UserProfile::from(user),
        }
    }
}
