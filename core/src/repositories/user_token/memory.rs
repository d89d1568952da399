//! In-memory implementation of UserTokenRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::{TokenPurpose, UserToken};
use crate::errors::DomainResult;

use super::UserTokenRepository;

#[derive(Clone, Default)]
pub struct InMemoryUserTokenRepository {
    tokens: Arc<RwLock<HashMap<Uuid, UserToken>>>,
}

impl InMemoryUserTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserTokenRepository for InMemoryUserTokenRepository {
    async fn create(&self, token: UserToken) -> DomainResult<UserToken> {
        self.tokens.write().await.insert(token.id, token.clone());
        Ok(token)
    }

    async fn find_by_hash(
        &self,
        purpose: TokenPurpose,
        token_hash: &str,
    ) -> DomainResult<Option<UserToken>> {
        Ok(self
            .tokens
            .read()
            .await
            .values()
            .find(|t| t.purpose == purpose && t.token_hash == token_hash)
            .cloned())
    }

    async fn consume(&self, id: Uuid, now: DateTime<Utc>) -> DomainResult<bool> {
        let mut tokens = self.tokens.write().await;
        match tokens.get_mut(&id) {
            Some(token) if token.consumed_at.is_none() => {
                token.consumed_at = Some(now);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn invalidate_for_user(
        &self,
        user_id: Uuid,
        purpose: TokenPurpose,
        now: DateTime<Utc>,
    ) -> DomainResult<usize> {
        let mut tokens = self.tokens.write().await;
        let mut count = 0;
        for token in tokens.values_mut() {
            if token.user_id == user_id && token.purpose == purpose && token.consumed_at.is_none() {
                token.consumed_at = Some(now);
                count += 1;
            }
        }
        Ok(count)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> DomainResult<usize> {
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, t| t.is_usable(now));
        Ok(before - tokens.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_consume_once() {
        let repo = InMemoryUserTokenRepository::new();
        let token = repo
            .create(UserToken::new(
                Uuid::new_v4(),
                TokenPurpose::EmailConfirmation,
                "hash".into(),
                Duration::hours(1),
            ))
            .await
            .unwrap();

        assert!(repo
            .find_by_hash(TokenPurpose::PasswordReset, "hash")
            .await
            .unwrap()
            .is_none());
        assert!(repo.consume(token.id, Utc::now()).await.unwrap());
        assert!(!repo.consume(token.id, Utc::now()).await.unwrap());
        assert_eq!(repo.delete_expired(Utc::now()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_for_user_only_touches_purpose() {
        let repo = InMemoryUserTokenRepository::new();
        let user_id = Uuid::new_v4();
        for purpose in [TokenPurpose::EmailConfirmation, TokenPurpose::PasswordReset] {
            repo.create(UserToken::new(user_id, purpose, purpose.to_string(), Duration::hours(1)))
                .await
                .unwrap();
        }

        let count = repo
            .invalidate_for_user(user_id, TokenPurpose::PasswordReset, Utc::now())
            .await
            .unwrap();
        assert_eq!(count, 1);
        let confirmation = repo
            .find_by_hash(TokenPurpose::EmailConfirmation, "EmailConfirmation")
            .await
            .unwrap()
            .unwrap();
        assert!(confirmation.consumed_at.is_none());
    }
}
