//! MySQL implementation of the UserRepository trait.
//!
//! Uniqueness of e-mail and user name is enforced by unique keys; the
//! `utf8mb4_unicode_ci` collation makes the user name key case-insensitive.

use async_trait::async_trait;
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;
use uuid::Uuid;

use eh_core::domain::entities::{normalize_email, User};
use eh_core::repositories::UserRepository;
use eh_core::{AuthError, DomainError, DomainResult};

use super::columns::{db_error, decode_roles, encode_roles, get, unique_violation, uuid};

const USER_COLUMNS: &str = r#"
    id, email, normalized_email, user_name, password_hash, first_name, last_name,
    roles, email_confirmed, access_failed_count, lockout_end, is_deleted,
    created_at, updated_at, last_login_at
"#;

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &MySqlRow) -> Result<User, DomainError> {
        let roles: String = get(row, "roles")?;
        let access_failed_count: i32 = get(row, "access_failed_count")?;

        Ok(User {
            id: uuid(row, "id")?,
            email: get(row, "email")?,
            normalized_email: get(row, "normalized_email")?,
            user_name: get(row, "user_name")?,
            password_hash: get(row, "password_hash")?,
            first_name: get(row, "first_name")?,
            last_name: get(row, "last_name")?,
            roles: decode_roles(&roles)?,
            email_confirmed: get(row, "email_confirmed")?,
            access_failed_count: access_failed_count.max(0) as u32,
            lockout_end: get(row, "lockout_end")?,
            is_deleted: get(row, "is_deleted")?,
            created_at: get(row, "created_at")?,
            updated_at: get(row, "updated_at")?,
            last_login_at: get(row, "last_login_at")?,
        })
    }

    /// Map a duplicate-key error onto the field that collided
    fn map_duplicate(e: sqlx::Error) -> DomainError {
        match unique_violation(&e) {
            Some(message) if message.contains("normalized_email") => AuthError::EmailTaken.into(),
            Some(message) if message.contains("user_name") => AuthError::UserNameTaken.into(),
            _ => db_error("save user", e),
        }
    }

    async fn find_one(&self, clause: &str, value: String) -> DomainResult<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE {} LIMIT 1", USER_COLUMNS, clause);

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find user", e))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn create(&self, user: User) -> DomainResult<User> {
        let query = r#"
            INSERT INTO users (
                id, email, normalized_email, user_name, password_hash, first_name, last_name,
                roles, email_confirmed, access_failed_count, lockout_end, is_deleted,
                created_at, updated_at, last_login_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(user.id.to_string())
            .bind(&user.email)
            .bind(&user.normalized_email)
            .bind(&user.user_name)
            .bind(&user.password_hash)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(encode_roles(&user.roles))
            .bind(user.email_confirmed)
            .bind(user.access_failed_count as i32)
            .bind(user.lockout_end)
            .bind(user.is_deleted)
            .bind(user.created_at)
            .bind(user.updated_at)
            .bind(user.last_login_at)
            .execute(&self.pool)
            .await
            .map_err(Self::map_duplicate)?;

        tracing::debug!(user_id = %user.id, "User created");
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>> {
        self.find_one("id = ?", id.to_string()).await
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        self.find_one("normalized_email = ?", normalize_email(email))
            .await
    }

    async fn find_by_user_name(&self, user_name: &str) -> DomainResult<Option<User>> {
        self.find_one("user_name = ?", user_name.trim().to_string())
            .await
    }

    async fn update(&self, user: &User) -> DomainResult<()> {
        let query = r#"
            UPDATE users SET
                email = ?, normalized_email = ?, user_name = ?, password_hash = ?,
                first_name = ?, last_name = ?, roles = ?, email_confirmed = ?,
                access_failed_count = ?, lockout_end = ?, is_deleted = ?,
                updated_at = ?, last_login_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&user.email)
            .bind(&user.normalized_email)
            .bind(&user.user_name)
            .bind(&user.password_hash)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(encode_roles(&user.roles))
            .bind(user.email_confirmed)
            .bind(user.access_failed_count as i32)
            .bind(user.lockout_end)
            .bind(user.is_deleted)
            .bind(user.updated_at)
            .bind(user.last_login_at)
            .bind(user.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(Self::map_duplicate)?;

        if result.rows_affected() == 0 {
            // MySQL reports 0 when nothing changed, so tell "missing" apart
            if self.find_by_id(user.id).await?.is_none() {
                return Err(DomainError::NotFound {
                    resource: "User".to_string(),
                });
            }
        }
        Ok(())
    }

    async fn count(&self) -> DomainResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE is_deleted = FALSE")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("count users", e))?;

        Ok(count.max(0) as u64)
    }
}
