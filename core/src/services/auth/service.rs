//! Main authentication service implementation

use chrono::{Duration, Utc};
use eh_shared::config::AuthConfig;
use eh_shared::{ClaimsPrincipal, Role};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::domain::entities::{Session, TokenPurpose, User, UserToken};
use crate::domain::value_objects::{Actor, AuthResponse, RegisterInput};
use crate::errors::{AuthError, DomainError, DomainResult, TokenError, ValidationError};
use crate::repositories::{SessionRepository, UserRepository, UserTokenRepository};
use crate::services::email::{
    confirmation_email, password_changed_email, password_reset_email, EmailSender,
};
use crate::services::password::{PasswordHasher, PasswordPolicy};
use crate::services::token::{generate_opaque_token, hash_token, TokenService};

use super::CleanupResult;

/// Credentials and client details of a login attempt
#[derive(Debug, Clone)]
pub struct LoginInput {
    /// E-mail address or user name
    pub login: String,
    pub password: String,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

/// Authentication service for the complete account lifecycle
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    user_tokens: Arc<dyn UserTokenRepository>,
    tokens: Arc<TokenService>,
    email: Arc<dyn EmailSender>,
    policy: PasswordPolicy,
    hasher: PasswordHasher,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        user_tokens: Arc<dyn UserTokenRepository>,
        email: Arc<dyn EmailSender>,
        config: AuthConfig,
    ) -> Self {
        Self {
            users,
            user_tokens,
            tokens: Arc::new(TokenService::new(sessions, config.jwt.clone())),
            email,
            policy: PasswordPolicy::new(config.password.clone()),
            hasher: PasswordHasher::default(),
            config,
        }
    }

    /// Replace the bcrypt cost, mostly to keep tests fast
    pub fn with_password_hasher(mut self, hasher: PasswordHasher) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn token_service(&self) -> Arc<TokenService> {
        self.tokens.clone()
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Create an account and mail its confirmation link
    ///
    /// # Returns
    ///
    /// * `Ok(User)` - The new, unconfirmed user
    /// * `Err(AuthError::EmailTaken | UserNameTaken)` - Uniqueness violated
    /// * `Err(ValidationError)` - Invalid input or weak password
    pub async fn register(&self, input: RegisterInput) -> DomainResult<User> {
        let input = input.normalized();
        input.validate()?;
        self.policy.validate(&input.password)?;

        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(AuthError::EmailTaken.into());
        }
        if self.users.find_by_user_name(&input.user_name).await?.is_some() {
            return Err(AuthError::UserNameTaken.into());
        }

        let password_hash = self.hasher.hash(&input.password)?;
        let user = User::new(
            input.email,
            input.user_name,
            password_hash,
            input.first_name,
            input.last_name,
        );
        let user = self.users.create(user).await?;
        info!(user_id = %user.id, "User registered");

        // the account exists either way; the link can be re-sent
        if let Err(e) = self.send_confirmation(&user).await {
            warn!(user_id = %user.id, error = %e, "Failed to send confirmation e-mail");
        }

        Ok(user)
    }

    pub async fn confirm_email(&self, user_id: Uuid, token: &str) -> DomainResult<()> {
        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .filter(|u| !u.is_deleted)
            .ok_or(AuthError::InvalidUserToken)?;
        if user.email_confirmed {
            return Err(AuthError::EmailAlreadyConfirmed.into());
        }

        self.consume_user_token(user.id, TokenPurpose::EmailConfirmation, token)
            .await?;
        user.confirm_email();
        self.users.update(&user).await?;

        info!(user_id = %user.id, "E-mail confirmed");
        Ok(())
    }

    /// Mail a new confirmation link.
    ///
    /// Unknown, deleted and already confirmed addresses succeed silently so
    /// the endpoint cannot be used to probe for accounts.
    pub async fn resend_confirmation(&self, email: &str) -> DomainResult<()> {
        match self.users.find_by_email(email).await? {
            Some(user) if !user.is_deleted && !user.email_confirmed => {
                self.send_confirmation(&user).await
            }
            _ => Ok(()),
        }
    }

    /// Authenticate and open a new session
    ///
    /// # Returns
    ///
    /// * `Ok(AuthResponse)` - Tokens and the user profile
    /// * `Err(AuthError::InvalidCredentials)` - Unknown login or wrong password
    /// * `Err(AuthError::LockedOut)` - Too many failed attempts
    /// * `Err(AuthError::AccountDeleted)` - Soft-deleted account
    /// * `Err(AuthError::EmailNotConfirmed)` - When confirmation is required
    pub async fn login(&self, input: LoginInput) -> DomainResult<AuthResponse> {
        let mut user = self
            .users
            .find_by_login(&input.login)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let now = Utc::now();
        if let Some(until) = user.lockout_end.filter(|end| *end > now) {
            warn!(user_id = %user.id, "Login refused, account locked out");
            return Err(AuthError::LockedOut { until }.into());
        }

        if !self.hasher.verify(&input.password, &user.password_hash) {
            let locked = user.record_failed_access(&self.config.lockout, now);
            self.users.update(&user).await?;
            return match user.lockout_end {
                Some(until) if locked => {
                    warn!(user_id = %user.id, %until, "Account locked out after failed logins");
                    Err(AuthError::LockedOut { until }.into())
                }
                _ => Err(AuthError::InvalidCredentials.into()),
            };
        }

        if user.is_deleted {
            return Err(AuthError::AccountDeleted.into());
        }
        if self.config.require_confirmed_email && !user.email_confirmed {
            return Err(AuthError::EmailNotConfirmed.into());
        }

        user.record_successful_login(now);
        self.users.update(&user).await?;

        let pair = self
            .tokens
            .create_session(&user, input.user_agent, input.ip_address)
            .await?;
        info!(user_id = %user.id, session_id = %pair.session_id, "User logged in");

        Ok(AuthResponse::from_token_pair(pair, &user))
    }

    /// Exchange a refresh token for a new token pair
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<AuthResponse> {
        let session = self.tokens.validate_refresh_token(refresh_token).await?;

        let user = match self.users.find_by_id(session.user_id).await? {
            Some(user) if !user.is_deleted => user,
            _ => {
                self.tokens.revoke_family(session.token_family).await?;
                return Err(TokenError::InvalidRefreshToken.into());
            }
        };

        let pair = self.tokens.rotate(&session, &user).await?;
        Ok(AuthResponse::from_token_pair(pair, &user))
    }

    /// Sign out of one session
    pub async fn logout(&self, user_id: Uuid, session_id: Uuid) -> DomainResult<()> {
        self.revoke_session(user_id, session_id).await?;
        info!(%user_id, %session_id, "User logged out");
        Ok(())
    }

    /// Sign out everywhere
    pub async fn logout_all(&self, user_id: Uuid) -> DomainResult<usize> {
        let revoked = self.tokens.revoke_all(user_id).await?;
        info!(%user_id, revoked, "All sessions revoked");
        Ok(revoked)
    }

    pub async fn list_sessions(&self, user_id: Uuid) -> DomainResult<Vec<Session>> {
        self.tokens.active_sessions(user_id).await
    }

    /// Revoke a session of the user; revoking an already revoked one is a no-op
    pub async fn revoke_session(&self, user_id: Uuid, session_id: Uuid) -> DomainResult<()> {
        match self.tokens.find_session(session_id).await? {
            Some(session) if session.user_id == user_id => {
                self.tokens.revoke_session(session.id).await?;
                Ok(())
            }
            _ => Err(AuthError::SessionNotFound.into()),
        }
    }

    /// Mail a password reset link.
    ///
    /// Always succeeds for the caller, whether or not the account exists.
    pub async fn forgot_password(&self, email: &str) -> DomainResult<()> {
        let user = match self.users.find_by_email(email).await? {
            Some(user) if !user.is_deleted => user,
            _ => {
                info!("Password reset requested for an unknown address");
                return Ok(());
            }
        };

        let token = self
            .issue_user_token(
                user.id,
                TokenPurpose::PasswordReset,
                Duration::minutes(self.config.password_reset_expiry_minutes),
            )
            .await?;
        let link = format!(
            "{}/reset-password?userId={}&token={}",
            self.config.frontend_base_url.trim_end_matches('/'),
            user.id,
            token
        );
        let message =
            password_reset_email(&user, &link, self.config.password_reset_expiry_minutes);
        if let Err(e) = self.email.send(message).await {
            error!(user_id = %user.id, error = %e, "Failed to send password reset e-mail");
        }
        Ok(())
    }

    /// Set a new password with a mailed reset token and sign out everywhere
    pub async fn reset_password(
        &self,
        email: &str,
        token: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        let mut user = self
            .users
            .find_by_email(email)
            .await?
            .filter(|u| !u.is_deleted)
            .ok_or(AuthError::InvalidUserToken)?;
        self.policy.validate(new_password)?;

        self.consume_user_token(user.id, TokenPurpose::PasswordReset, token)
            .await?;
        user.set_password_hash(self.hasher.hash(new_password)?);
        self.users.update(&user).await?;

        let revoked = self.tokens.revoke_all(user.id).await?;
        info!(user_id = %user.id, revoked, "Password reset");

        if let Err(e) = self.email.send(password_changed_email(&user)).await {
            warn!(user_id = %user.id, error = %e, "Failed to send password changed notice");
        }
        Ok(())
    }

    pub async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        let mut user = self.get_user(user_id).await?;
        if !self.hasher.verify(current_password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials.into());
        }
        self.policy.validate(new_password)?;

        user.set_password_hash(self.hasher.hash(new_password)?);
        self.users.update(&user).await?;
        info!(%user_id, "Password changed");
        Ok(())
    }

    /// Non-deleted user by id
    pub async fn get_user(&self, user_id: Uuid) -> DomainResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .filter(|u| !u.is_deleted)
            .ok_or_else(|| AuthError::UserNotFound.into())
    }

    pub async fn assign_role(&self, admin: &Actor, user_id: Uuid, role: Role) -> DomainResult<User> {
        require_admin(admin)?;
        let mut user = self.get_user(user_id).await?;
        if user.add_role(role) {
            self.users.update(&user).await?;
            info!(admin_id = %admin.user_id, %user_id, %role, "Role assigned");
        }
        Ok(user)
    }

    pub async fn remove_role(&self, admin: &Actor, user_id: Uuid, role: Role) -> DomainResult<User> {
        require_admin(admin)?;
        if role == Role::User {
            return Err(business_rule("The User role cannot be removed"));
        }
        if role == Role::Admin && admin.user_id == user_id {
            return Err(business_rule("Admins cannot remove their own Admin role"));
        }

        let mut user = self.get_user(user_id).await?;
        if user.remove_role(role) {
            self.users.update(&user).await?;
            info!(admin_id = %admin.user_id, %user_id, %role, "Role removed");
        }
        Ok(user)
    }

    pub async fn count_users(&self, admin: &Actor) -> DomainResult<u64> {
        require_admin(admin)?;
        self.users.count().await
    }

    /// Delete expired sessions and spent confirmation/reset tokens
    pub async fn cleanup_expired(&self) -> CleanupResult {
        let mut result = CleanupResult::default();

        match self.tokens.delete_expired_sessions().await {
            Ok(count) => result.sessions_deleted = count,
            Err(e) => {
                error!("Failed to cleanup expired sessions: {}", e);
                result.errors.push(format!("Session cleanup error: {}", e));
            }
        }
        match self.user_tokens.delete_expired(Utc::now()).await {
            Ok(count) => result.user_tokens_deleted = count,
            Err(e) => {
                error!("Failed to cleanup user tokens: {}", e);
                result.errors.push(format!("User token cleanup error: {}", e));
            }
        }

        info!(
            sessions = result.sessions_deleted,
            user_tokens = result.user_tokens_deleted,
            "Expired credentials cleaned up"
        );
        result
    }

    async fn send_confirmation(&self, user: &User) -> DomainResult<()> {
        let hours = self.config.email_confirmation_expiry_hours;
        let token = self
            .issue_user_token(user.id, TokenPurpose::EmailConfirmation, Duration::hours(hours))
            .await?;
        let link = format!(
            "{}/confirm-email?userId={}&token={}",
            self.config.frontend_base_url.trim_end_matches('/'),
            user.id,
            token
        );
        self.email.send(confirmation_email(user, &link, hours)).await
    }

    /// Replace outstanding tokens of `purpose` with a fresh one
    async fn issue_user_token(
        &self,
        user_id: Uuid,
        purpose: TokenPurpose,
        lifetime: Duration,
    ) -> DomainResult<String> {
        self.user_tokens
            .invalidate_for_user(user_id, purpose, Utc::now())
            .await?;

        let token = generate_opaque_token();
        self.user_tokens
            .create(UserToken::new(user_id, purpose, hash_token(&token), lifetime))
            .await?;
        Ok(token)
    }

    async fn consume_user_token(
        &self,
        user_id: Uuid,
        purpose: TokenPurpose,
        token: &str,
    ) -> DomainResult<()> {
        let now = Utc::now();
        let stored = self
            .user_tokens
            .find_by_hash(purpose, &hash_token(token.trim()))
            .await?
            .filter(|t| t.user_id == user_id && t.is_usable(now))
            .ok_or(AuthError::InvalidUserToken)?;

        if !self.user_tokens.consume(stored.id, now).await? {
            return Err(AuthError::InvalidUserToken.into());
        }
        Ok(())
    }
}

fn require_admin(actor: &Actor) -> DomainResult<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(AuthError::InsufficientPermissions.into())
    }
}

fn business_rule(rule: &str) -> DomainError {
    ValidationError::BusinessRuleViolation {
        rule: rule.to_string(),
    }
    .into()
}
