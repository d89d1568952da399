//! In-memory implementation of PhotoRepository

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::ListingPhoto;
use crate::errors::{DomainResult, ListingError};

use super::PhotoRepository;

#[derive(Clone, Default)]
pub struct InMemoryPhotoRepository {
    photos: Arc<RwLock<HashMap<Uuid, ListingPhoto>>>,
}

impl InMemoryPhotoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PhotoRepository for InMemoryPhotoRepository {
    async fn create(&self, mut photo: ListingPhoto, max_per_listing: usize) -> DomainResult<ListingPhoto> {
        let mut photos = self.photos.write().await;
        let siblings: Vec<&ListingPhoto> = photos
            .values()
            .filter(|p| p.listing_id == photo.listing_id)
            .collect();
        if siblings.len() >= max_per_listing {
            return Err(ListingError::PhotoLimitReached {
                max: max_per_listing,
            }
            .into());
        }

        photo.position = siblings.iter().map(|p| p.position + 1).max().unwrap_or(0);
        photo.is_primary = siblings.is_empty();
        photos.insert(photo.id, photo.clone());
        Ok(photo)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<ListingPhoto>> {
        Ok(self.photos.read().await.get(&id).cloned())
    }

    async fn list_for_listing(&self, listing_id: Uuid) -> DomainResult<Vec<ListingPhoto>> {
        let mut photos: Vec<ListingPhoto> = self
            .photos
            .read()
            .await
            .values()
            .filter(|p| p.listing_id == listing_id)
            .cloned()
            .collect();
        photos.sort_by_key(|p| (p.position, p.created_at));
        Ok(photos)
    }

    async fn count_for_listing(&self, listing_id: Uuid) -> DomainResult<u64> {
        Ok(self
            .photos
            .read()
            .await
            .values()
            .filter(|p| p.listing_id == listing_id)
            .count() as u64)
    }

    async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        Ok(self.photos.write().await.remove(&id).is_some())
    }

    async fn set_primary(&self, listing_id: Uuid, photo_id: Uuid) -> DomainResult<()> {
        let mut photos = self.photos.write().await;
        if !photos
            .get(&photo_id)
            .is_some_and(|p| p.listing_id == listing_id)
        {
            return Err(ListingError::PhotoNotFound.into());
        }
        for photo in photos.values_mut().filter(|p| p.listing_id == listing_id) {
            photo.is_primary = photo.id == photo_id;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DomainError;

    const MAX: usize = 20;

    fn photo(listing_id: Uuid, name: &str) -> ListingPhoto {
        ListingPhoto::new(
            listing_id,
            format!("obj-{}", name),
            format!("{}.jpg", name),
            "image/jpeg".to_string(),
            1024,
            0,
            false,
        )
    }

    #[tokio::test]
    async fn test_create_appends_in_order() {
        let repo = InMemoryPhotoRepository::new();
        let listing_id = Uuid::new_v4();
        for name in ["front", "kitchen", "garden"] {
            repo.create(photo(listing_id, name), MAX).await.unwrap();
        }
        repo.create(photo(Uuid::new_v4(), "other"), MAX).await.unwrap();

        let photos = repo.list_for_listing(listing_id).await.unwrap();
        let positions: Vec<i32> = photos.iter().map(|p| p.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        assert_eq!(photos[0].file_name, "front.jpg");
        assert!(photos[0].is_primary);
        assert!(!photos[1].is_primary && !photos[2].is_primary);
        assert_eq!(repo.count_for_listing(listing_id).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_create_enforces_the_limit_under_concurrency() {
        let repo = InMemoryPhotoRepository::new();
        let listing_id = Uuid::new_v4();
        repo.create(photo(listing_id, "front"), 2).await.unwrap();

        let (a, b) = tokio::join!(
            repo.create(photo(listing_id, "a"), 2),
            repo.create(photo(listing_id, "b"), 2),
        );
        assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
        let err = a.err().or(b.err()).unwrap();
        assert_eq!(err, DomainError::from(ListingError::PhotoLimitReached { max: 2 }));
        assert_eq!(repo.count_for_listing(listing_id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_set_primary_is_exclusive() {
        let repo = InMemoryPhotoRepository::new();
        let listing_id = Uuid::new_v4();
        let first = repo.create(photo(listing_id, "front"), MAX).await.unwrap();
        let second = repo.create(photo(listing_id, "back"), MAX).await.unwrap();

        repo.set_primary(listing_id, second.id).await.unwrap();
        let photos = repo.list_for_listing(listing_id).await.unwrap();
        let primary: Vec<Uuid> = photos.iter().filter(|p| p.is_primary).map(|p| p.id).collect();
        assert_eq!(primary, vec![second.id]);

        let err = repo.set_primary(Uuid::new_v4(), first.id).await.unwrap_err();
        assert_eq!(err, DomainError::from(ListingError::PhotoNotFound));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryPhotoRepository::new();
        let p = repo.create(photo(Uuid::new_v4(), "front"), MAX).await.unwrap();
        assert!(repo.delete(p.id).await.unwrap());
        assert!(!repo.delete(p.id).await.unwrap());
    }
}
