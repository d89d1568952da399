//! Photo metadata repository.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::ListingPhoto;
use crate::errors::DomainResult;

/// Repository trait for listing photo metadata
///
/// At most one photo per listing has `is_primary` set.
#[async_trait]
pub trait PhotoRepository: Send + Sync {
    /// Append a photo to its listing as one atomic step.
    ///
    /// `position` is set past the last photo and `is_primary` when the
    /// listing had none; a listing already holding `max_per_listing` photos
    /// fails with `ListingError::PhotoLimitReached`.
    async fn create(&self, photo: ListingPhoto, max_per_listing: usize) -> DomainResult<ListingPhoto>;

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<ListingPhoto>>;

    /// Photos of a listing ordered by `position`
    async fn list_for_listing(&self, listing_id: Uuid) -> DomainResult<Vec<ListingPhoto>>;

    async fn count_for_listing(&self, listing_id: Uuid) -> DomainResult<u64>;

    /// # Returns
    /// * `Ok(false)` - no photo with this id
    async fn delete(&self, id: Uuid) -> DomainResult<bool>;

    /// Make `photo_id` the only primary photo of `listing_id`
    async fn set_primary(&self, listing_id: Uuid, photo_id: Uuid) -> DomainResult<()>;
}
