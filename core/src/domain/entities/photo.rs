//! Photo metadata; the bytes live in the photo store under `storage_id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingPhoto {
    pub id: Uuid,
    pub listing_id: Uuid,
    /// Object id in the photo store, as a string
    pub storage_id: String,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    /// Display order within the listing, starting at 0
    pub position: i32,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}

impl ListingPhoto {
    pub fn new(
        listing_id: Uuid,
        storage_id: String,
        file_name: String,
        content_type: String,
        size_bytes: i64,
        position: i32,
        is_primary: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            listing_id,
            storage_id,
            file_name,
            content_type,
            size_bytes,
            position,
            is_primary,
            created_at: Utc::now(),
        }
    }
}
