//! Listing repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eh_shared::{PaginatedResponse, Pagination};
use uuid::Uuid;

use crate::domain::entities::Listing;
use crate::domain::value_objects::{ListingFilter, ListingStatusCounts};
use crate::errors::DomainResult;

/// Repository trait for Listing persistence
///
/// Updates use optimistic concurrency: the stored `row_version` must equal
/// the expected version, otherwise `DomainError::ConcurrencyConflict` is
/// returned. A successful update stores `expected_version + 1`.
#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn create(&self, listing: Listing) -> DomainResult<Listing>;

    /// Includes soft-deleted listings
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Listing>>;

    /// Non-deleted listings among `ids`, in the order of `ids`
    async fn find_by_ids(&self, ids: &[Uuid]) -> DomainResult<Vec<Listing>>;

    /// # Returns
    /// * The stored listing with its new `row_version`
    async fn update(&self, listing: &Listing, expected_version: i64) -> DomainResult<Listing>;

    /// Non-deleted listings matching `filter`
    async fn search(
        &self,
        filter: &ListingFilter,
        pagination: &Pagination,
    ) -> DomainResult<PaginatedResponse<Listing>>;

    /// Add `delta` to `likes_count`, never going below zero.
    /// Does not touch `row_version`.
    async fn adjust_likes(&self, id: Uuid, delta: i64) -> DomainResult<()>;

    async fn count_by_status(&self) -> DomainResult<ListingStatusCounts>;

    async fn count_created_since(&self, since: DateTime<Utc>) -> DomainResult<u64>;

    /// Published listings with the most likes
    async fn top_liked(&self, limit: usize) -> DomainResult<Vec<Listing>>;
}
