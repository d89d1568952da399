//! MySQL implementation of the SessionRepository trait.
//!
//! Only SHA-256 hashes of refresh tokens reach the `sessions` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;
use uuid::Uuid;

use eh_core::domain::entities::Session;
use eh_core::repositories::SessionRepository;
use eh_core::{DomainError, DomainResult};

use super::columns::{db_error, get, opt_uuid, uuid};

const SESSION_COLUMNS: &str = r#"
    id, user_id, refresh_token_hash, token_family, user_agent, ip_address,
    created_at, expires_at, last_used_at, revoked_at, replaced_by
"#;

/// MySQL implementation of SessionRepository
pub struct MySqlSessionRepository {
    pool: MySqlPool,
}

impl MySqlSessionRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_session(row: &MySqlRow) -> Result<Session, DomainError> {
        Ok(Session {
            id: uuid(row, "id")?,
            user_id: uuid(row, "user_id")?,
            refresh_token_hash: get(row, "refresh_token_hash")?,
            token_family: uuid(row, "token_family")?,
            user_agent: get(row, "user_agent")?,
            ip_address: get(row, "ip_address")?,
            created_at: get(row, "created_at")?,
            expires_at: get(row, "expires_at")?,
            last_used_at: get(row, "last_used_at")?,
            revoked_at: get(row, "revoked_at")?,
            replaced_by: opt_uuid(row, "replaced_by")?,
        })
    }

    async fn find_one(&self, clause: &str, value: String) -> DomainResult<Option<Session>> {
        let query = format!(
            "SELECT {} FROM sessions WHERE {} LIMIT 1",
            SESSION_COLUMNS, clause
        );

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find session", e))?;

        row.as_ref().map(Self::row_to_session).transpose()
    }

    async fn insert<'e, E>(executor: E, session: &Session) -> Result<(), sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = sqlx::MySql>,
    {
        let query = r#"
            INSERT INTO sessions (
                id, user_id, refresh_token_hash, token_family, user_agent, ip_address,
                created_at, expires_at, last_used_at, revoked_at, replaced_by
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(session.id.to_string())
            .bind(session.user_id.to_string())
            .bind(&session.refresh_token_hash)
            .bind(session.token_family.to_string())
            .bind(&session.user_agent)
            .bind(&session.ip_address)
            .bind(session.created_at)
            .bind(session.expires_at)
            .bind(session.last_used_at)
            .bind(session.revoked_at)
            .bind(session.replaced_by.map(|id| id.to_string()))
            .execute(executor)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for MySqlSessionRepository {
    async fn create(&self, session: Session) -> DomainResult<Session> {
        Self::insert(&self.pool, &session)
            .await
            .map_err(|e| db_error("save session", e))?;
        Ok(session)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Session>> {
        self.find_one("id = ?", id.to_string()).await
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> DomainResult<Option<Session>> {
        self.find_one("refresh_token_hash = ?", token_hash.to_string())
            .await
    }

    async fn list_active(&self, user_id: Uuid, now: DateTime<Utc>) -> DomainResult<Vec<Session>> {
        let query = format!(
            r#"
            SELECT {}
            FROM sessions
            WHERE user_id = ?
                AND revoked_at IS NULL
                AND expires_at > ?
            ORDER BY created_at DESC
            "#,
            SESSION_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .bind(now)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("list sessions", e))?;

        rows.iter().map(Self::row_to_session).collect()
    }

    async fn rotate(
        &self,
        old_id: Uuid,
        successor: Session,
        now: DateTime<Utc>,
    ) -> DomainResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin rotation", e))?;

        // The conditional update is the claim: only one concurrent caller
        // sees a row affected.
        let claimed = sqlx::query(
            r#"
            UPDATE sessions
            SET revoked_at = ?, replaced_by = ?, last_used_at = ?
            WHERE id = ? AND revoked_at IS NULL
            "#,
        )
        .bind(now)
        .bind(successor.id.to_string())
        .bind(now)
        .bind(old_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("rotate session", e))?;

        if claimed.rows_affected() == 0 {
            tx.rollback()
                .await
                .map_err(|e| db_error("roll back rotation", e))?;
            return Ok(false);
        }

        Self::insert(&mut *tx, &successor)
            .await
            .map_err(|e| db_error("save rotated session", e))?;
        tx.commit()
            .await
            .map_err(|e| db_error("commit rotation", e))?;
        Ok(true)
    }

    async fn revoke(&self, id: Uuid, now: DateTime<Utc>) -> DomainResult<bool> {
        let result =
            sqlx::query("UPDATE sessions SET revoked_at = ? WHERE id = ? AND revoked_at IS NULL")
                .bind(now)
                .bind(id.to_string())
                .execute(&self.pool)
                .await
                .map_err(|e| db_error("revoke session", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn revoke_family(&self, token_family: Uuid, now: DateTime<Utc>) -> DomainResult<usize> {
        let result = sqlx::query(
            "UPDATE sessions SET revoked_at = ? WHERE token_family = ? AND revoked_at IS NULL",
        )
        .bind(now)
        .bind(token_family.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("revoke session family", e))?;

        Ok(result.rows_affected() as usize)
    }

    async fn revoke_all_for_user(&self, user_id: Uuid, now: DateTime<Utc>) -> DomainResult<usize> {
        let result = sqlx::query(
            "UPDATE sessions SET revoked_at = ? WHERE user_id = ? AND revoked_at IS NULL",
        )
        .bind(now)
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("revoke user sessions", e))?;

        Ok(result.rows_affected() as usize)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> DomainResult<usize> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete expired sessions", e))?;

        tracing::debug!(deleted = result.rows_affected(), "Expired sessions removed");
        Ok(result.rows_affected() as usize)
    }
}
