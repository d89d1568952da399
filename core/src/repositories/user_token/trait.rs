use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::{TokenPurpose, UserToken};
use crate::errors::DomainResult;

/// Persistence for e-mail confirmation and password reset tokens
#[async_trait]
pub trait UserTokenRepository: Send + Sync {
    async fn create(&self, token: UserToken) -> DomainResult<UserToken>;

    async fn find_by_hash(
        &self,
        purpose: TokenPurpose,
        token_hash: &str,
    ) -> DomainResult<Option<UserToken>>;

    /// Mark a token used.
    ///
    /// # Returns
    /// * `Ok(false)` - it was already consumed
    async fn consume(&self, id: Uuid, now: DateTime<Utc>) -> DomainResult<bool>;

    /// Consume every outstanding token of `purpose` for the user
    async fn invalidate_for_user(
        &self,
        user_id: Uuid,
        purpose: TokenPurpose,
        now: DateTime<Utc>,
    ) -> DomainResult<usize>;

    /// Remove tokens that are expired or already consumed
    async fn delete_expired(&self, now: DateTime<Utc>) -> DomainResult<usize>;
}
