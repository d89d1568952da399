//! Lookups of user accounts owned by the authorization service

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::value_objects::UserSummary;
use crate::errors::{DomainError, DomainResult};

/// Trait for the user directory client.
///
/// Calls are made on behalf of the current caller, whose bearer token is
/// forwarded.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_user(&self, id: Uuid, access_token: &str) -> DomainResult<Option<UserSummary>>;

    /// Requires an admin token
    async fn count_users(&self, access_token: &str) -> DomainResult<u64>;
}

/// Fixed set of users, for tests and offline runs
#[derive(Clone, Default)]
pub struct InMemoryUserDirectory {
    users: Arc<RwLock<HashMap<Uuid, UserSummary>>>,
    unavailable: bool,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A directory whose every call fails as if the service were down
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub async fn insert(&self, user: UserSummary) {
        self.users.write().await.insert(user.id, user);
    }

    fn check(&self) -> DomainResult<()> {
        if self.unavailable {
            return Err(DomainError::ServiceUnavailable {
                service: "user directory".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_user(&self, id: Uuid, _access_token: &str) -> DomainResult<Option<UserSummary>> {
        self.check()?;
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn count_users(&self, _access_token: &str) -> DomainResult<u64> {
        self.check()?;
        Ok(self.users.read().await.len() as u64)
    }
}
