//! In-memory implementation of UserRepository

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::{normalize_email, User};
use crate::errors::{AuthError, DomainError, DomainResult};

use super::UserRepository;

/// User store backed by a `HashMap`
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> DomainResult<User> {
        let mut users = self.users.write().await;

        if users
            .values()
            .any(|u| u.normalized_email == user.normalized_email)
        {
            return Err(AuthError::EmailTaken.into());
        }
        if users
            .values()
            .any(|u| u.user_name.eq_ignore_ascii_case(&user.user_name))
        {
            return Err(AuthError::UserNameTaken.into());
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let normalized = normalize_email(email);
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.normalized_email == normalized)
            .cloned())
    }

    async fn find_by_user_name(&self, user_name: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.user_name.eq_ignore_ascii_case(user_name))
            .cloned())
    }

    async fn update(&self, user: &User) -> DomainResult<()> {
        let mut users = self.users.write().await;
        match users.get_mut(&user.id) {
            Some(stored) => {
                *stored = user.clone();
                Ok(())
            }
            None => Err(DomainError::NotFound {
                resource: "User".to_string(),
            }),
        }
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .filter(|u| !u.is_deleted)
            .count() as u64)
    }
}
