//! Session-backed token service

use chrono::Utc;
use eh_shared::config::JwtConfig;
use jsonwebtoken::{encode, EncodingKey, Header};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::entities::{Claims, Session, TokenPair, User};
use crate::errors::{DomainError, DomainResult, TokenError};
use crate::repositories::SessionRepository;

use super::{generate_opaque_token, hash_token, AccessTokenValidator};

/// Issues access tokens and manages the refresh sessions behind them
pub struct TokenService {
    sessions: Arc<dyn SessionRepository>,
    config: JwtConfig,
    encoding_key: EncodingKey,
    validator: AccessTokenValidator,
}

impl TokenService {
    pub fn new(sessions: Arc<dyn SessionRepository>, config: JwtConfig) -> Self {
        Self {
            sessions,
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            validator: AccessTokenValidator::new(&config),
            config,
        }
    }

    pub fn config(&self) -> &JwtConfig {
        &self.config
    }

    pub fn validator(&self) -> &AccessTokenValidator {
        &self.validator
    }

    pub fn verify_access_token(&self, token: &str) -> DomainResult<Claims> {
        self.validator.validate(token)
    }

    /// Start a new session (and token family) for `user`
    pub async fn create_session(
        &self,
        user: &User,
        user_agent: Option<String>,
        ip_address: Option<String>,
    ) -> DomainResult<TokenPair> {
        let refresh_token = generate_opaque_token();
        let session = Session::new(
            user.id,
            hash_token(&refresh_token),
            self.config.refresh_token_expiry,
            user_agent,
            ip_address,
        );
        let session = self.sessions.create(session).await?;
        debug!(user_id = %user.id, session_id = %session.id, "Session created");

        self.issue(user, session.id, refresh_token)
    }

    /// Look up the session behind a refresh token.
    ///
    /// A token whose session is already revoked was used twice, so every
    /// session of its family is revoked before failing.
    pub async fn validate_refresh_token(&self, refresh_token: &str) -> DomainResult<Session> {
        let session = self
            .sessions
            .find_by_token_hash(&hash_token(refresh_token))
            .await?
            .ok_or(TokenError::InvalidRefreshToken)?;

        let now = Utc::now();
        if session.is_revoked() {
            let revoked = self.sessions.revoke_family(session.token_family, now).await?;
            warn!(
                user_id = %session.user_id,
                token_family = %session.token_family,
                revoked,
                "Refresh token reuse detected, token family revoked"
            );
            return Err(TokenError::TokenReused.into());
        }
        if session.is_expired(now) {
            return Err(TokenError::RefreshTokenExpired.into());
        }
        Ok(session)
    }

    /// Replace `session` by a successor carrying a new refresh token
    pub async fn rotate(&self, session: &Session, user: &User) -> DomainResult<TokenPair> {
        let refresh_token = generate_opaque_token();
        let successor = session.successor(hash_token(&refresh_token), self.config.refresh_token_expiry);
        let successor_id = successor.id;
        let now = Utc::now();

        if !self.sessions.rotate(session.id, successor, now).await? {
            // lost the race against another refresh with the same token
            self.sessions.revoke_family(session.token_family, now).await?;
            warn!(
                user_id = %session.user_id,
                token_family = %session.token_family,
                "Concurrent refresh detected, token family revoked"
            );
            return Err(TokenError::TokenReused.into());
        }

        self.issue(user, successor_id, refresh_token)
    }

    pub async fn revoke_session(&self, session_id: Uuid) -> DomainResult<bool> {
        self.sessions.revoke(session_id, Utc::now()).await
    }

    pub async fn revoke_family(&self, token_family: Uuid) -> DomainResult<usize> {
        self.sessions.revoke_family(token_family, Utc::now()).await
    }

    pub async fn revoke_all(&self, user_id: Uuid) -> DomainResult<usize> {
        self.sessions.revoke_all_for_user(user_id, Utc::now()).await
    }

    pub async fn find_session(&self, session_id: Uuid) -> DomainResult<Option<Session>> {
        self.sessions.find_by_id(session_id).await
    }

    pub async fn active_sessions(&self, user_id: Uuid) -> DomainResult<Vec<Session>> {
        self.sessions.list_active(user_id, Utc::now()).await
    }

    pub async fn delete_expired_sessions(&self) -> DomainResult<usize> {
        self.sessions.delete_expired(Utc::now()).await
    }

    fn issue(&self, user: &User, session_id: Uuid, refresh_token: String) -> DomainResult<TokenPair> {
        let claims = Claims::new_access_token(user, session_id, &self.config);
        let access_token = self.encode_jwt(&claims)?;
        Ok(TokenPair::new(access_token, refresh_token, session_id, &self.config))
    }

    /// Encodes claims into a JWT
    pub(crate) fn encode_jwt(&self, claims: &Claims) -> Result<String, DomainError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }
}
