//! MySQL implementation of the UserTokenRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;
use uuid::Uuid;

use eh_core::domain::entities::{TokenPurpose, UserToken};
use eh_core::repositories::UserTokenRepository;
use eh_core::{DomainError, DomainResult};

use super::columns::{db_error, get, uuid, variant};

/// MySQL implementation of UserTokenRepository
pub struct MySqlUserTokenRepository {
    pool: MySqlPool,
}

impl MySqlUserTokenRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_token(row: &MySqlRow) -> Result<UserToken, DomainError> {
        Ok(UserToken {
            id: uuid(row, "id")?,
            user_id: uuid(row, "user_id")?,
            purpose: variant(row, "purpose")?,
            token_hash: get(row, "token_hash")?,
            created_at: get(row, "created_at")?,
            expires_at: get(row, "expires_at")?,
            consumed_at: get(row, "consumed_at")?,
        })
    }
}

#[async_trait]
impl UserTokenRepository for MySqlUserTokenRepository {
    async fn create(&self, token: UserToken) -> DomainResult<UserToken> {
        let query = r#"
            INSERT INTO user_tokens (
                id, user_id, purpose, token_hash, created_at, expires_at, consumed_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(token.id.to_string())
            .bind(token.user_id.to_string())
            .bind(token.purpose.as_str())
            .bind(&token.token_hash)
            .bind(token.created_at)
            .bind(token.expires_at)
            .bind(token.consumed_at)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("save user token", e))?;

        Ok(token)
    }

    async fn find_by_hash(
        &self,
        purpose: TokenPurpose,
        token_hash: &str,
    ) -> DomainResult<Option<UserToken>> {
        let query = r#"
            SELECT id, user_id, purpose, token_hash, created_at, expires_at, consumed_at
            FROM user_tokens
            WHERE purpose = ? AND token_hash = ?
            LIMIT 1
        "#;

        let row = sqlx::query(query)
            .bind(purpose.as_str())
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find user token", e))?;

        row.as_ref().map(Self::row_to_token).transpose()
    }

    async fn consume(&self, id: Uuid, now: DateTime<Utc>) -> DomainResult<bool> {
        let result = sqlx::query(
            "UPDATE user_tokens SET consumed_at = ? WHERE id = ? AND consumed_at IS NULL",
        )
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("consume user token", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn invalidate_for_user(
        &self,
        user_id: Uuid,
        purpose: TokenPurpose,
        now: DateTime<Utc>,
    ) -> DomainResult<usize> {
        let result = sqlx::query(
            r#"
            UPDATE user_tokens
            SET consumed_at = ?
            WHERE user_id = ? AND purpose = ? AND consumed_at IS NULL
            "#,
        )
        .bind(now)
        .bind(user_id.to_string())
        .bind(purpose.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("invalidate user tokens", e))?;

        Ok(result.rows_affected() as usize)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> DomainResult<usize> {
        let result =
            sqlx::query("DELETE FROM user_tokens WHERE expires_at <= ? OR consumed_at IS NOT NULL")
                .bind(now)
                .execute(&self.pool)
                .await
                .map_err(|e| db_error("delete expired user tokens", e))?;

        Ok(result.rows_affected() as usize)
    }
}
