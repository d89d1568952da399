use eh_shared::{ClaimsPrincipal, PaginatedResponse, Pagination};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::domain::entities::{Listing, ListingStatus};
use crate::domain::value_objects::{Actor, ListingFilter, ListingInput, ListingPatch};
use crate::errors::{AuthError, DomainError, DomainResult, ListingError};
use crate::repositories::{LikeRepository, ListingRepository};
use crate::services::moderation::{ContentModerator, ModerationRequest, ModerationVerdict};

/// Service for listings and the likes on them
pub struct ListingService {
    listings: Arc<dyn ListingRepository>,
    likes: Arc<dyn LikeRepository>,
    moderator: Option<Arc<dyn ContentModerator>>,
}

impl ListingService {
    pub fn new(listings: Arc<dyn ListingRepository>, likes: Arc<dyn LikeRepository>) -> Self {
        Self {
            listings,
            likes,
            moderator: None,
        }
    }

    /// Review title and description with `moderator` before publishing.
    /// An unreachable moderator does not block publishing.
    pub fn with_moderator(mut self, moderator: Arc<dyn ContentModerator>) -> Self {
        self.moderator = Some(moderator);
        self
    }

    /// Create a draft owned by the caller
    pub async fn create_listing(&self, actor: &Actor, input: ListingInput) -> DomainResult<Listing> {
        let input = input.normalized();
        input.validate()?;

        let listing = self.listings.create(Listing::new(actor.user_id, input)).await?;
        info!(listing_id = %listing.id, owner_id = %listing.owner_id, "Listing created");
        Ok(listing)
    }

    /// Apply a partial update.
    ///
    /// `expected_version` is the `row_version` the caller last read; a newer
    /// stored version fails with `ConcurrencyConflict`.
    pub async fn update_listing(
        &self,
        actor: &Actor,
        id: Uuid,
        patch: ListingPatch,
        expected_version: i64,
    ) -> DomainResult<Listing> {
        let patch = patch.normalized();
        patch.validate()?;

        let mut listing = self.load_for_edit(actor, id).await?;
        if listing.row_version != expected_version {
            return Err(DomainError::conflict("Listing"));
        }
        listing.apply_patch(patch);
        self.listings.update(&listing, expected_version).await
    }

    pub async fn publish_listing(&self, actor: &Actor, id: Uuid) -> DomainResult<Listing> {
        let mut listing = self.load_for_edit(actor, id).await?;
        let version = listing.row_version;
        listing.publish()?;
        self.moderate(&listing).await?;

        let listing = self.listings.update(&listing, version).await?;
        info!(listing_id = %id, "Listing published");
        Ok(listing)
    }

    pub async fn archive_listing(&self, actor: &Actor, id: Uuid) -> DomainResult<Listing> {
        let mut listing = self.load_for_edit(actor, id).await?;
        let version = listing.row_version;
        listing.archive()?;

        let listing = self.listings.update(&listing, version).await?;
        info!(listing_id = %id, "Listing archived");
        Ok(listing)
    }

    /// Soft delete
    pub async fn delete_listing(&self, actor: &Actor, id: Uuid) -> DomainResult<()> {
        let mut listing = self.load_for_edit(actor, id).await?;
        let version = listing.row_version;
        listing.soft_delete();

        self.listings.update(&listing, version).await?;
        info!(listing_id = %id, actor_id = %actor.user_id, "Listing deleted");
        Ok(())
    }

    /// Published listings are public, the rest only for owner and admins
    pub async fn get_listing(&self, id: Uuid, viewer: Option<&Actor>) -> DomainResult<Listing> {
        self.listings
            .find_by_id(id)
            .await?
            .filter(|l| l.is_visible_to(viewer))
            .ok_or_else(|| ListingError::NotFound.into())
    }

    /// Search; callers other than admins only ever see published listings
    pub async fn search_listings(
        &self,
        viewer: Option<&Actor>,
        mut filter: ListingFilter,
        pagination: &Pagination,
    ) -> DomainResult<PaginatedResponse<Listing>> {
        if !viewer.is_some_and(|v| v.is_admin()) {
            filter.status = Some(ListingStatus::Published);
        }
        self.listings.search(&filter, pagination).await
    }

    /// Every non-deleted listing of the caller, any status
    pub async fn my_listings(
        &self,
        actor: &Actor,
        status: Option<ListingStatus>,
        pagination: &Pagination,
    ) -> DomainResult<PaginatedResponse<Listing>> {
        let filter = ListingFilter {
            status,
            ..ListingFilter::for_owner(actor.user_id)
        };
        self.listings.search(&filter, pagination).await
    }

    /// Like a published listing; liking twice changes nothing
    pub async fn like_listing(&self, actor: &Actor, id: Uuid) -> DomainResult<Listing> {
        let listing = self.get_listing(id, Some(actor)).await?;
        if !listing.is_published() {
            return Err(ListingError::NotPublished.into());
        }

        if self.likes.add(actor.user_id, id).await? {
            self.listings.adjust_likes(id, 1).await?;
        }
        self.get_listing(id, Some(actor)).await
    }

    /// Remove a like; unliking a listing that is not liked changes nothing
    pub async fn unlike_listing(&self, actor: &Actor, id: Uuid) -> DomainResult<Listing> {
        let listing = self
            .listings
            .find_by_id(id)
            .await?
            .filter(|l| !l.is_deleted)
            .ok_or(ListingError::NotFound)?;

        if self.likes.remove(actor.user_id, id).await? {
            self.listings.adjust_likes(id, -1).await?;
            return self
                .listings
                .find_by_id(id)
                .await?
                .ok_or_else(|| ListingError::NotFound.into());
        }
        Ok(listing)
    }

    pub async fn is_liked(&self, actor: &Actor, id: Uuid) -> DomainResult<bool> {
        self.likes.exists(actor.user_id, id).await
    }

    /// Listings the caller liked and may still see, most recent like first
    pub async fn liked_listings(
        &self,
        actor: &Actor,
        pagination: &Pagination,
    ) -> DomainResult<PaginatedResponse<Listing>> {
        let ids = self.likes.liked_listing_ids(actor, pagination).await?;
        let listings = self
            .listings
            .find_by_ids(&ids.data)
            .await?
            .into_iter()
            .filter(|l| l.is_visible_to(Some(actor)))
            .collect();
        Ok(PaginatedResponse::new(listings, pagination.clone(), ids.total))
    }

    /// Load a live listing the caller may modify.
    ///
    /// Listings the caller cannot even see are reported as not found.
    async fn load_for_edit(&self, actor: &Actor, id: Uuid) -> DomainResult<Listing> {
        let listing = self
            .listings
            .find_by_id(id)
            .await?
            .filter(|l| l.is_visible_to(Some(actor)))
            .ok_or(ListingError::NotFound)?;

        if !actor.can_modify(listing.owner_id) {
            return Err(AuthError::InsufficientPermissions.into());
        }
        Ok(listing)
    }

    async fn moderate(&self, listing: &Listing) -> DomainResult<()> {
        let Some(moderator) = &self.moderator else {
            return Ok(());
        };
        match moderator.review(&ModerationRequest::from(listing)).await {
            Ok(ModerationVerdict::Approved) => Ok(()),
            Ok(ModerationVerdict::Rejected { reason }) => {
                info!(listing_id = %listing.id, %reason, "Listing rejected by moderation");
                Err(ListingError::ModerationRejected { reason }.into())
            }
            Err(e) => {
                warn!(listing_id = %listing.id, error = %e, "Content moderation unavailable");
                Ok(())
            }
        }
    }
}
