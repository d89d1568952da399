use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use eh_core::domain::entities::ListingPhoto;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadPhotoQuery {
    pub file_name: Option<String>,
}

/// Photo metadata; the bytes are served from `url`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoResponse {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub position: i32,
    pub is_primary: bool,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// Route serving the bytes of a photo
pub fn photo_url(photo_id: Uuid) -> String {
    format!("/api/v1/photos/{}", photo_id)
}

impl From<ListingPhoto> for PhotoResponse {
    fn from(photo: ListingPhoto) -> Self {
        Self {
            url: photo_url(photo.id),
            id: photo.id,
            listing_id: photo.listing_id,
            file_name: photo.file_name,
            content_type: photo.content_type,
            size_bytes: photo.size_bytes,
            position: photo.position,
            is_primary: photo.is_primary,
            created_at: photo.created_at,
        }
    }
}
