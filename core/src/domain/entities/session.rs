//! Session and token entities for JWT-based authentication.

use chrono::{DateTime, Duration, Utc};
use eh_shared::config::JwtConfig;
use eh_shared::{ClaimsPrincipal, Role};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::User;

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: Uuid,

    pub email: String,

    /// User name
    pub name: String,

    pub roles: Vec<Role>,

    /// Session the token was minted for
    pub sid: Uuid,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// JWT ID (unique identifier for the token)
    pub jti: String,
}

impl Claims {
    /// Creates new claims for an access token
    pub fn new_access_token(user: &User, session_id: Uuid, config: &JwtConfig) -> Self {
        let now = Utc::now();
        let expiry = now + Duration::seconds(config.access_token_expiry);

        Self {
            sub: user.id,
            email: user.email.clone(),
            name: user.user_name.clone(),
            roles: user.roles.clone(),
            sid: session_id,
            iss: config.issuer.clone(),
            aud: config.audience.clone(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expiry.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

impl ClaimsPrincipal for Claims {
    fn subject(&self) -> Uuid {
        self.sub
    }

    fn roles(&self) -> &[Role] {
        &self.roles
    }
}

/// A login session holding the hash of its current refresh token.
///
/// Refreshing revokes the row and points `replaced_by` at its successor in
/// the same `token_family`. Presenting a refresh token whose row is already
/// revoked means the token leaked, and the whole family is revoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(skip_serializing)]
    pub refresh_token_hash: String,
    pub token_family: Uuid,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub replaced_by: Option<Uuid>,
}

impl Session {
    /// Start a new token family
    pub fn new(
        user_id: Uuid,
        refresh_token_hash: String,
        lifetime_seconds: i64,
        user_agent: Option<String>,
        ip_address: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            refresh_token_hash,
            token_family: Uuid::new_v4(),
            user_agent,
            ip_address,
            created_at: now,
            expires_at: now + Duration::seconds(lifetime_seconds),
            last_used_at: None,
            revoked_at: None,
            replaced_by: None,
        }
    }

    /// The session replacing this one after a refresh.
    ///
    /// It keeps the family and the client details, and gets a fresh lifetime.
    pub fn successor(&self, refresh_token_hash: String, lifetime_seconds: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: self.user_id,
            refresh_token_hash,
            token_family: self.token_family,
            user_agent: self.user_agent.clone(),
            ip_address: self.ip_address.clone(),
            created_at: now,
            expires_at: now + Duration::seconds(lifetime_seconds),
            last_used_at: Some(now),
            revoked_at: None,
            replaced_by: None,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.is_revoked() && !self.is_expired(now)
    }

    pub fn revoke(&mut self, now: DateTime<Utc>) {
        if self.revoked_at.is_none() {
            self.revoked_at = Some(now);
        }
    }
}

/// Token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// JWT access token
    pub access_token: String,

    /// Opaque refresh token, only its hash is stored
    pub refresh_token: String,

    pub token_type: String,

    /// Access token expiry time in seconds
    pub expires_in: i64,

    /// Refresh token expiry time in seconds
    pub refresh_expires_in: i64,

    pub session_id: Uuid,
}

impl TokenPair {
    pub fn new(
        access_token: String,
        refresh_token: String,
        session_id: Uuid,
        config: &JwtConfig,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: config.access_token_expiry,
            refresh_expires_in: config.refresh_token_expiry,
            session_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new(
            "owner@example.com".to_string(),
            "owner".to_string(),
            "hash".to_string(),
            "Olive".to_string(),
            "Owner".to_string(),
        )
    }

    #[test]
    fn test_access_token_claims() {
        let user = user();
        let config = JwtConfig::default();
        let sid = Uuid::new_v4();
        let claims = Claims::new_access_token(&user, sid, &config);

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.sid, sid);
        assert_eq!(claims.name, "owner");
        assert_eq!(claims.iss, "estatehub-auth");
        assert_eq!(claims.exp - claims.iat, 900);
        assert!(!claims.is_expired());
        assert!(!claims.is_admin());
    }

    #[test]
    fn test_roles_serialize_as_names() {
        let mut user = user();
        user.add_role(Role::Admin);
        let claims = Claims::new_access_token(&user, Uuid::new_v4(), &JwtConfig::default());
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["roles"], serde_json::json!(["User", "Admin"]));
    }

    #[test]
    fn test_session_successor_keeps_family() {
        let session = Session::new(Uuid::new_v4(), "a".into(), 60, Some("curl".into()), None);
        let next = session.successor("b".into(), 60);

        assert_ne!(next.id, session.id);
        assert_eq!(next.token_family, session.token_family);
        assert_eq!(next.user_agent.as_deref(), Some("curl"));
        assert!(next.is_active(Utc::now()));
    }

    #[test]
    fn test_session_revocation_and_expiry() {
        let mut session = Session::new(Uuid::new_v4(), "hash".into(), 60, None, None);
        let now = Utc::now();
        assert!(session.is_active(now));
        assert!(session.is_expired(now + Duration::seconds(61)));

        session.revoke(now);
        let first = session.revoked_at;
        session.revoke(now + Duration::seconds(5));
        assert_eq!(session.revoked_at, first);
        assert!(!session.is_active(now));
    }
}
