//! In-memory implementation of SessionRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::Session;
use crate::errors::DomainResult;

use super::SessionRepository;

#[derive(Clone, Default)]
pub struct InMemorySessionRepository {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn revoke_where<F>(sessions: &mut HashMap<Uuid, Session>, now: DateTime<Utc>, predicate: F) -> usize
    where
        F: Fn(&Session) -> bool,
    {
        let mut count = 0;
        for session in sessions.values_mut() {
            if !session.is_revoked() && predicate(session) {
                session.revoke(now);
                count += 1;
            }
        }
        count
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, session: Session) -> DomainResult<Session> {
        self.sessions
            .write()
            .await
            .insert(session.id, session.clone());
        Ok(session)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Session>> {
        Ok(self.sessions.read().await.get(&id).cloned())
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> DomainResult<Option<Session>> {
        Ok(self
            .sessions
            .read()
            .await
            .values()
            .find(|s| s.refresh_token_hash == token_hash)
            .cloned())
    }

    async fn list_active(&self, user_id: Uuid, now: DateTime<Utc>) -> DomainResult<Vec<Session>> {
        let mut active: Vec<Session> = self
            .sessions
            .read()
            .await
            .values()
            .filter(|s| s.user_id == user_id && s.is_active(now))
            .cloned()
            .collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(active)
    }

    async fn rotate(
        &self,
        old_id: Uuid,
        successor: Session,
        now: DateTime<Utc>,
    ) -> DomainResult<bool> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&old_id) {
            Some(old) if !old.is_revoked() => {
                old.revoke(now);
                old.replaced_by = Some(successor.id);
                old.last_used_at = Some(now);
            }
            _ => return Ok(false),
        }
        sessions.insert(successor.id, successor);
        Ok(true)
    }

    async fn revoke(&self, id: Uuid, now: DateTime<Utc>) -> DomainResult<bool> {
        let mut sessions = self.sessions.write().await;
        Ok(Self::revoke_where(&mut sessions, now, |s| s.id == id) == 1)
    }

    async fn revoke_family(&self, token_family: Uuid, now: DateTime<Utc>) -> DomainResult<usize> {
        let mut sessions = self.sessions.write().await;
        Ok(Self::revoke_where(&mut sessions, now, |s| {
            s.token_family == token_family
        }))
    }

    async fn revoke_all_for_user(&self, user_id: Uuid, now: DateTime<Utc>) -> DomainResult<usize> {
        let mut sessions = self.sessions.write().await;
        Ok(Self::revoke_where(&mut sessions, now, |s| s.user_id == user_id))
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> DomainResult<usize> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(now));
        Ok(before - sessions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_rotate_only_once() {
        let repo = InMemorySessionRepository::new();
        let first = repo
            .create(Session::new(Uuid::new_v4(), "h1".into(), 600, None, None))
            .await
            .unwrap();
        let now = Utc::now();

        let second = first.successor("h2".into(), 600);
        assert!(repo.rotate(first.id, second.clone(), now).await.unwrap());

        let stored = repo.find_by_id(first.id).await.unwrap().unwrap();
        assert!(stored.is_revoked());
        assert_eq!(stored.replaced_by, Some(second.id));

        let third = first.successor("h3".into(), 600);
        assert!(!repo.rotate(first.id, third, now).await.unwrap());
        assert!(repo.find_by_token_hash("h3").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_revoke_family_and_list_active() {
        let repo = InMemorySessionRepository::new();
        let user_id = Uuid::new_v4();
        let a = repo
            .create(Session::new(user_id, "a".into(), 600, None, None))
            .await
            .unwrap();
        let b = repo
            .create(Session::new(user_id, "b".into(), 600, None, None))
            .await
            .unwrap();
        let now = Utc::now();

        assert_eq!(repo.list_active(user_id, now).await.unwrap().len(), 2);
        assert_eq!(repo.revoke_family(a.token_family, now).await.unwrap(), 1);

        let active = repo.list_active(user_id, now).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, b.id);

        assert!(!repo.revoke(a.id, now).await.unwrap());
        assert_eq!(repo.revoke_all_for_user(user_id, now).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_expired() {
        let repo = InMemorySessionRepository::new();
        repo.create(Session::new(Uuid::new_v4(), "a".into(), 60, None, None))
            .await
            .unwrap();
        let later = Utc::now() + Duration::seconds(120);
        assert_eq!(repo.delete_expired(later).await.unwrap(), 1);
        assert!(repo.find_by_token_hash("a").await.unwrap().is_none());
    }
}
