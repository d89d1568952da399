//! Like repository trait.

use async_trait::async_trait;
use eh_shared::{PaginatedResponse, Pagination};
use uuid::Uuid;

use crate::domain::value_objects::Actor;
use crate::errors::DomainResult;

/// Repository trait for (user, listing) likes
///
/// Add and remove are idempotent; the boolean tells whether anything changed
/// so the caller can keep `Listing::likes_count` in step.
#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// # Returns
    /// * `Ok(false)` - the like already existed
    async fn add(&self, user_id: Uuid, listing_id: Uuid) -> DomainResult<bool>;

    /// # Returns
    /// * `Ok(false)` - there was nothing to remove
    async fn remove(&self, user_id: Uuid, listing_id: Uuid) -> DomainResult<bool>;

    async fn exists(&self, user_id: Uuid, listing_id: Uuid) -> DomainResult<bool>;

    /// Ids of the listings `viewer` liked and may still see, most recent
    /// like first. Deleted listings are skipped, and so are drafts and
    /// archived listings unless the viewer owns them or is an admin;
    /// `total` counts the same set.
    async fn liked_listing_ids(
        &self,
        viewer: &Actor,
        pagination: &Pagination,
    ) -> DomainResult<PaginatedResponse<Uuid>>;
}
