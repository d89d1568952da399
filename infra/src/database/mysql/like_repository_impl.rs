//! MySQL implementation of the LikeRepository trait.
//!
//! The primary key on (user_id, listing_id) keeps likes unique; `INSERT
//! IGNORE` turns a repeated like into a no-op.

use async_trait::async_trait;
use chrono::Utc;
use eh_shared::{ClaimsPrincipal, PaginatedResponse, Pagination};
use sqlx::MySqlPool;
use uuid::Uuid;

use eh_core::domain::entities::ListingStatus;
use eh_core::domain::value_objects::Actor;
use eh_core::repositories::LikeRepository;
use eh_core::DomainResult;

use super::columns::{db_error, parse_uuid};

/// Likes joined to the listings the viewer may still see
const VISIBLE_LIKES: &str = r#"
    FROM liked_listings k
    JOIN listings l ON l.id = k.listing_id
    WHERE k.user_id = ?
      AND l.is_deleted = FALSE
      AND (l.status = ? OR l.owner_id = ? OR ?)
"#;

/// MySQL implementation of LikeRepository
pub struct MySqlLikeRepository {
    pool: MySqlPool,
}

impl MySqlLikeRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LikeRepository for MySqlLikeRepository {
    async fn add(&self, user_id: Uuid, listing_id: Uuid) -> DomainResult<bool> {
        let result = sqlx::query(
            "INSERT IGNORE INTO liked_listings (user_id, listing_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(user_id.to_string())
        .bind(listing_id.to_string())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("save like", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove(&self, user_id: Uuid, listing_id: Uuid) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM liked_listings WHERE user_id = ? AND listing_id = ?")
            .bind(user_id.to_string())
            .bind(listing_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("remove like", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, user_id: Uuid, listing_id: Uuid) -> DomainResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM liked_listings WHERE user_id = ? AND listing_id = ?",
        )
        .bind(user_id.to_string())
        .bind(listing_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("check like", e))?;

        Ok(count > 0)
    }

    async fn liked_listing_ids(
        &self,
        viewer: &Actor,
        pagination: &Pagination,
    ) -> DomainResult<PaginatedResponse<Uuid>> {
        let user_id = viewer.user_id.to_string();
        let published = ListingStatus::Published.as_str();
        let is_admin = viewer.is_admin();

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) {}", VISIBLE_LIKES))
            .bind(&user_id)
            .bind(published)
            .bind(&user_id)
            .bind(is_admin)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("count likes", e))?;

        let ids: Vec<String> = sqlx::query_scalar(&format!(
            "SELECT k.listing_id {} ORDER BY k.created_at DESC LIMIT ? OFFSET ?",
            VISIBLE_LIKES
        ))
        .bind(&user_id)
        .bind(published)
        .bind(&user_id)
        .bind(is_admin)
        .bind(pagination.limit_i64())
        .bind(pagination.offset_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list likes", e))?;

        let ids = ids
            .iter()
            .map(|id| parse_uuid(id, "listing_id"))
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(PaginatedResponse::new(
            ids,
            pagination.clone(),
            total.max(0) as u64,
        ))
    }
}
