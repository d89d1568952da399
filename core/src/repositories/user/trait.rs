//! User repository trait defining the interface for user data persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::User;
use crate::errors::DomainResult;

/// Repository trait for User entity persistence operations
///
/// E-mail lookups go through `User::normalized_email`; user names compare
/// case-insensitively. Soft-deleted users are still returned, callers decide
/// what a deleted account may do.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user
    ///
    /// # Returns
    /// * `Err(AuthError::EmailTaken)` / `Err(AuthError::UserNameTaken)` on
    ///   a uniqueness violation
    async fn create(&self, user: User) -> DomainResult<User>;

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>>;

    /// Find by e-mail, case-insensitive
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    /// Find by user name, case-insensitive
    async fn find_by_user_name(&self, user_name: &str) -> DomainResult<Option<User>>;

    /// Persist every mutable field of an existing user
    async fn update(&self, user: &User) -> DomainResult<()>;

    /// Number of accounts that are not deleted
    async fn count(&self) -> DomainResult<u64>;

    /// Resolve a login name that may be an e-mail or a user name
    async fn find_by_login(&self, login: &str) -> DomainResult<Option<User>> {
        let login = login.trim();
        if login.contains('@') {
            if let Some(user) = self.find_by_email(login).await? {
                return Ok(Some(user));
            }
        }
        self.find_by_user_name(login).await
    }
}
