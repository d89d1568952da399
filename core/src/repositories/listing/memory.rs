//! In-memory implementation of ListingRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eh_shared::{paginate_vec, PaginatedResponse, Pagination};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::{Listing, ListingStatus};
use crate::domain::value_objects::{ListingFilter, ListingSort, ListingStatusCounts};
use crate::errors::{DomainError, DomainResult, ListingError};

use super::ListingRepository;

#[derive(Clone, Default)]
pub struct InMemoryListingRepository {
    pub(crate) listings: Arc<RwLock<HashMap<Uuid, Listing>>>,
}

impl InMemoryListingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Version check and write, shared with the report repository's
    /// resolve-and-archive unit of work
    pub(crate) fn apply_update(
        listings: &mut HashMap<Uuid, Listing>,
        listing: &Listing,
        expected_version: i64,
    ) -> DomainResult<Listing> {
        let stored = listings.get_mut(&listing.id).ok_or(ListingError::NotFound)?;
        if stored.row_version != expected_version {
            return Err(DomainError::conflict("Listing"));
        }
        let mut updated = listing.clone();
        updated.row_version = expected_version + 1;
        updated.likes_count = stored.likes_count;
        *stored = updated.clone();
        Ok(updated)
    }
}

fn matches(listing: &Listing, filter: &ListingFilter, needle: Option<&str>) -> bool {
    if listing.is_deleted {
        return false;
    }
    if let Some(needle) = needle {
        if !listing.title.to_lowercase().contains(needle)
            && !listing.description.to_lowercase().contains(needle)
        {
            return false;
        }
    }
    filter.listing_type.map_or(true, |t| listing.listing_type == t)
        && filter.category.map_or(true, |c| listing.category == c)
        && filter
            .city
            .as_deref()
            .map_or(true, |city| listing.city.eq_ignore_ascii_case(city.trim()))
        && filter.min_price.map_or(true, |min| listing.price >= min)
        && filter.max_price.map_or(true, |max| listing.price <= max)
        && filter
            .min_rooms
            .map_or(true, |min| listing.rooms.is_some_and(|rooms| rooms >= min))
        && filter.status.map_or(true, |s| listing.status == s)
        && filter.owner_id.map_or(true, |owner| listing.owner_id == owner)
}

fn compare(a: &Listing, b: &Listing, sort: ListingSort) -> Ordering {
    let newest = b.created_at.cmp(&a.created_at);
    match sort {
        ListingSort::Newest => newest,
        ListingSort::PriceAsc => a.price.total_cmp(&b.price).then(newest),
        ListingSort::PriceDesc => b.price.total_cmp(&a.price).then(newest),
        ListingSort::MostLiked => b.likes_count.cmp(&a.likes_count).then(newest),
    }
}

#[async_trait]
impl ListingRepository for InMemoryListingRepository {
    async fn create(&self, listing: Listing) -> DomainResult<Listing> {
        self.listings
            .write()
            .await
            .insert(listing.id, listing.clone());
        Ok(listing)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Listing>> {
        Ok(self.listings.read().await.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> DomainResult<Vec<Listing>> {
        let listings = self.listings.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| listings.get(id))
            .filter(|l| !l.is_deleted)
            .cloned()
            .collect())
    }

    async fn update(&self, listing: &Listing, expected_version: i64) -> DomainResult<Listing> {
        let mut listings = self.listings.write().await;
        Self::apply_update(&mut listings, listing, expected_version)
    }

    async fn search(
        &self,
        filter: &ListingFilter,
        pagination: &Pagination,
    ) -> DomainResult<PaginatedResponse<Listing>> {
        let needle = filter.text_needle();
        let mut found: Vec<Listing> = self
            .listings
            .read()
            .await
            .values()
            .filter(|l| matches(l, filter, needle.as_deref()))
            .cloned()
            .collect();
        found.sort_by(|a, b| compare(a, b, filter.sort));
        Ok(paginate_vec(found, pagination))
    }

    async fn adjust_likes(&self, id: Uuid, delta: i64) -> DomainResult<()> {
        let mut listings = self.listings.write().await;
        let listing = listings.get_mut(&id).ok_or(ListingError::NotFound)?;
        listing.likes_count = (listing.likes_count + delta).max(0);
        Ok(())
    }

    async fn count_by_status(&self) -> DomainResult<ListingStatusCounts> {
        let mut counts = ListingStatusCounts::default();
        for listing in self.listings.read().await.values().filter(|l| !l.is_deleted) {
            counts.add(listing.status, 1);
        }
        Ok(counts)
    }

    async fn count_created_since(&self, since: DateTime<Utc>) -> DomainResult<u64> {
        Ok(self
            .listings
            .read()
            .await
            .values()
            .filter(|l| !l.is_deleted && l.created_at >= since)
            .count() as u64)
    }

    async fn top_liked(&self, limit: usize) -> DomainResult<Vec<Listing>> {
        let mut published: Vec<Listing> = self
            .listings
            .read()
            .await
            .values()
            .filter(|l| !l.is_deleted && l.status == ListingStatus::Published)
            .cloned()
            .collect();
        published.sort_by(|a, b| compare(a, b, ListingSort::MostLiked));
        published.truncate(limit);
        Ok(published)
    }
}
