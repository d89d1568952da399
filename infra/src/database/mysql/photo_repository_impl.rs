//! MySQL implementation of the PhotoRepository trait.

use async_trait::async_trait;
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;
use uuid::Uuid;

use eh_core::domain::entities::ListingPhoto;
use eh_core::repositories::PhotoRepository;
use eh_core::{DomainError, DomainResult, ListingError};

use super::columns::{db_error, get, uuid};

const PHOTO_COLUMNS: &str = r#"
    id, listing_id, storage_id, file_name, content_type, size_bytes, position,
    is_primary, created_at
"#;

/// MySQL implementation of PhotoRepository
pub struct MySqlPhotoRepository {
    pool: MySqlPool,
}

impl MySqlPhotoRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_photo(row: &MySqlRow) -> Result<ListingPhoto, DomainError> {
        Ok(ListingPhoto {
            id: uuid(row, "id")?,
            listing_id: uuid(row, "listing_id")?,
            storage_id: get(row, "storage_id")?,
            file_name: get(row, "file_name")?,
            content_type: get(row, "content_type")?,
            size_bytes: get(row, "size_bytes")?,
            position: get(row, "position")?,
            is_primary: get(row, "is_primary")?,
            created_at: get(row, "created_at")?,
        })
    }
}

#[async_trait]
impl PhotoRepository for MySqlPhotoRepository {
    async fn create(&self, photo: ListingPhoto, max_per_listing: usize) -> DomainResult<ListingPhoto> {
        let mut photo = photo;
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin transaction", e))?;

        // Locking the parent listing row serializes concurrent appends
        let locked: Option<String> =
            sqlx::query_scalar("SELECT id FROM listings WHERE id = ? FOR UPDATE")
                .bind(photo.listing_id.to_string())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| db_error("lock listing", e))?;
        if locked.is_none() {
            return Err(ListingError::NotFound.into());
        }

        let (count, next_position): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(MAX(position) + 1, 0) FROM listing_photos WHERE listing_id = ?",
        )
        .bind(photo.listing_id.to_string())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| db_error("count photos", e))?;

        if count >= max_per_listing as i64 {
            return Err(ListingError::PhotoLimitReached { max: max_per_listing }.into());
        }
        photo.position = i32::try_from(next_position).unwrap_or(i32::MAX);
        photo.is_primary = count == 0;

        let query = r#"
            INSERT INTO listing_photos (
                id, listing_id, storage_id, file_name, content_type, size_bytes, position,
                is_primary, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(photo.id.to_string())
            .bind(photo.listing_id.to_string())
            .bind(&photo.storage_id)
            .bind(&photo.file_name)
            .bind(&photo.content_type)
            .bind(photo.size_bytes)
            .bind(photo.position)
            .bind(photo.is_primary)
            .bind(photo.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("save photo", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("commit photo", e))?;

        Ok(photo)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<ListingPhoto>> {
        let query = format!(
            "SELECT {} FROM listing_photos WHERE id = ? LIMIT 1",
            PHOTO_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find photo", e))?;

        row.as_ref().map(Self::row_to_photo).transpose()
    }

    async fn list_for_listing(&self, listing_id: Uuid) -> DomainResult<Vec<ListingPhoto>> {
        let query = format!(
            "SELECT {} FROM listing_photos WHERE listing_id = ? ORDER BY position, created_at",
            PHOTO_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(listing_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("list photos", e))?;

        rows.iter().map(Self::row_to_photo).collect()
    }

    async fn count_for_listing(&self, listing_id: Uuid) -> DomainResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM listing_photos WHERE listing_id = ?")
                .bind(listing_id.to_string())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| db_error("count photos", e))?;

        Ok(count.max(0) as u64)
    }

    async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM listing_photos WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete photo", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_primary(&self, listing_id: Uuid, photo_id: Uuid) -> DomainResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin transaction", e))?;

        let exists: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM listing_photos WHERE id = ? AND listing_id = ?",
        )
        .bind(photo_id.to_string())
        .bind(listing_id.to_string())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| db_error("find photo", e))?;

        if exists == 0 {
            return Err(ListingError::PhotoNotFound.into());
        }

        sqlx::query("UPDATE listing_photos SET is_primary = (id = ?) WHERE listing_id = ?")
            .bind(photo_id.to_string())
            .bind(listing_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("set primary photo", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("commit primary photo", e))?;
        Ok(())
    }
}
