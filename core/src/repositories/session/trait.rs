//! Session repository trait for refresh-token backed login sessions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::Session;
use crate::errors::DomainResult;

/// Repository trait for Session persistence
///
/// # Security Considerations
/// - Only SHA-256 hashes of refresh tokens are stored
/// - Rotation must be atomic: exactly one caller may replace a session
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: Session) -> DomainResult<Session>;

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Session>>;

    async fn find_by_token_hash(&self, token_hash: &str) -> DomainResult<Option<Session>>;

    /// Sessions that are neither revoked nor expired, newest first
    async fn list_active(&self, user_id: Uuid, now: DateTime<Utc>) -> DomainResult<Vec<Session>>;

    /// Revoke `old_id` in favour of `successor` and store the successor.
    ///
    /// # Returns
    /// * `Ok(false)` - `old_id` was already revoked, nothing was written
    async fn rotate(&self, old_id: Uuid, successor: Session, now: DateTime<Utc>)
        -> DomainResult<bool>;

    /// # Returns
    /// * `Ok(true)` - the session was active and is now revoked
    async fn revoke(&self, id: Uuid, now: DateTime<Utc>) -> DomainResult<bool>;

    /// Revoke every session descended from the same login
    async fn revoke_family(&self, token_family: Uuid, now: DateTime<Utc>) -> DomainResult<usize>;

    async fn revoke_all_for_user(&self, user_id: Uuid, now: DateTime<Utc>) -> DomainResult<usize>;

    /// Remove sessions whose refresh token has expired
    async fn delete_expired(&self, now: DateTime<Utc>) -> DomainResult<usize>;
}
