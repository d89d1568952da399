use eh_shared::config::PhotoStorageConfig;
use eh_shared::ClaimsPrincipal;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::entities::{Listing, ListingPhoto};
use crate::domain::value_objects::Actor;
use crate::errors::{AuthError, DomainError, DomainResult, ListingError, ValidationError};
use crate::repositories::{ListingRepository, PhotoRepository};

use super::PhotoStorage;

const MAX_FILE_NAME_CHARS: usize = 255;

#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub listing_id: Uuid,
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Photo metadata together with its bytes
#[derive(Debug, Clone)]
pub struct PhotoContent {
    pub photo: ListingPhoto,
    pub bytes: Vec<u8>,
}

pub struct PhotoService {
    listings: Arc<dyn ListingRepository>,
    photos: Arc<dyn PhotoRepository>,
    storage: Arc<dyn PhotoStorage>,
    config: PhotoStorageConfig,
}

impl PhotoService {
    pub fn new(
        listings: Arc<dyn ListingRepository>,
        photos: Arc<dyn PhotoRepository>,
        storage: Arc<dyn PhotoStorage>,
        config: PhotoStorageConfig,
    ) -> Self {
        Self {
            listings,
            photos,
            storage,
            config,
        }
    }

    pub fn config(&self) -> &PhotoStorageConfig {
        &self.config
    }

    /// Store a photo for a listing the caller may modify.
    ///
    /// The first photo of a listing becomes its primary photo.
    pub async fn upload_photo(&self, actor: &Actor, upload: PhotoUpload) -> DomainResult<ListingPhoto> {
        if !self.config.is_allowed_content_type(&upload.content_type) {
            return Err(ValidationError::UnsupportedContentType {
                content_type: upload.content_type,
            }
            .into());
        }
        if upload.bytes.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "file".to_string(),
            }
            .into());
        }
        if upload.bytes.len() > self.config.max_photo_bytes {
            return Err(ValidationError::PayloadTooLarge {
                max_bytes: self.config.max_photo_bytes,
            }
            .into());
        }

        // Early refusal before storing bytes; the repository re-checks
        // the limit atomically on insert
        let max_photos = self.config.max_photos_per_listing;
        let listing = self.load_for_edit(actor, upload.listing_id).await?;
        if self.photos.count_for_listing(listing.id).await? >= max_photos as u64 {
            return Err(ListingError::PhotoLimitReached { max: max_photos }.into());
        }

        let file_name = sanitize_file_name(upload.file_name.as_deref());
        let content_type = upload.content_type.trim().to_ascii_lowercase();
        let size = upload.bytes.len() as i64;
        let storage_id = self
            .storage
            .store(&file_name, &content_type, upload.bytes)
            .await?;

        let photo = ListingPhoto::new(
            listing.id,
            storage_id.clone(),
            file_name,
            content_type,
            size,
            0,
            false,
        );

        match self.photos.create(photo, max_photos).await {
            Ok(photo) => {
                info!(listing_id = %listing.id, photo_id = %photo.id, size, "Photo uploaded");
                Ok(photo)
            }
            Err(e) => {
                if let Err(cleanup) = self.storage.delete(&storage_id).await {
                    error!(%storage_id, error = %cleanup, "Failed to remove orphaned photo bytes");
                }
                Err(e)
            }
        }
    }

    /// Photos of a listing visible to `viewer`, in display order
    pub async fn list_photos(
        &self,
        listing_id: Uuid,
        viewer: Option<&Actor>,
    ) -> DomainResult<Vec<ListingPhoto>> {
        self.load_visible(listing_id, viewer).await?;
        self.photos.list_for_listing(listing_id).await
    }

    pub async fn photo_content(&self, photo_id: Uuid, viewer: Option<&Actor>) -> DomainResult<PhotoContent> {
        let photo = self.find_photo(photo_id).await?;
        self.load_visible(photo.listing_id, viewer)
            .await
            .map_err(|_| DomainError::from(ListingError::PhotoNotFound))?;

        let bytes = match self.storage.load(&photo.storage_id).await? {
            Some(bytes) => bytes,
            None => {
                warn!(%photo_id, storage_id = %photo.storage_id, "Photo metadata without stored bytes");
                return Err(ListingError::PhotoNotFound.into());
            }
        };
        Ok(PhotoContent { photo, bytes })
    }

    /// Remove bytes and metadata; the next photo in order becomes primary
    pub async fn delete_photo(&self, actor: &Actor, photo_id: Uuid) -> DomainResult<()> {
        let photo = self.find_photo(photo_id).await?;
        self.load_for_edit(actor, photo.listing_id).await?;

        if !self.photos.delete(photo.id).await? {
            return Err(ListingError::PhotoNotFound.into());
        }
        if let Err(e) = self.storage.delete(&photo.storage_id).await {
            warn!(%photo_id, error = %e, "Failed to delete photo bytes");
        }

        if photo.is_primary {
            let remaining = self.photos.list_for_listing(photo.listing_id).await?;
            if let Some(next) = remaining.first() {
                self.photos.set_primary(photo.listing_id, next.id).await?;
            }
        }
        info!(%photo_id, listing_id = %photo.listing_id, "Photo deleted");
        Ok(())
    }

    pub async fn set_primary_photo(&self, actor: &Actor, photo_id: Uuid) -> DomainResult<ListingPhoto> {
        let photo = self.find_photo(photo_id).await?;
        self.load_for_edit(actor, photo.listing_id).await?;

        self.photos.set_primary(photo.listing_id, photo.id).await?;
        Ok(ListingPhoto {
            is_primary: true,
            ..photo
        })
    }

    async fn find_photo(&self, photo_id: Uuid) -> DomainResult<ListingPhoto> {
        self.photos
            .find_by_id(photo_id)
            .await?
            .ok_or_else(|| ListingError::PhotoNotFound.into())
    }

    async fn load_visible(&self, listing_id: Uuid, viewer: Option<&Actor>) -> DomainResult<Listing> {
        self.listings
            .find_by_id(listing_id)
            .await?
            .filter(|l| l.is_visible_to(viewer))
            .ok_or_else(|| ListingError::NotFound.into())
    }

    async fn load_for_edit(&self, actor: &Actor, listing_id: Uuid) -> DomainResult<Listing> {
        let listing = self.load_visible(listing_id, Some(actor)).await?;
        if !actor.can_modify(listing.owner_id) {
            return Err(AuthError::InsufficientPermissions.into());
        }
        Ok(listing)
    }
}

/// Last path segment, trimmed and bounded; `photo` when nothing is left.
/// Quotes and control characters are dropped so the name can sit inside a
/// quoted `Content-Disposition` filename.
pub(super) fn sanitize_file_name(file_name: Option<&str>) -> String {
    let name: String = file_name
        .unwrap_or_default()
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_control() && *c != '"')
        .collect();
    let name = name.trim();
    if name.is_empty() {
        return "photo".to_string();
    }
    name.chars().take(MAX_FILE_NAME_CHARS).collect()
}
