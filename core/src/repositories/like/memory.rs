//! In-memory implementation of LikeRepository

use async_trait::async_trait;
use eh_shared::{paginate_vec, PaginatedResponse, Pagination};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::LikedListing;
use crate::domain::value_objects::Actor;
use crate::errors::DomainResult;
use crate::repositories::listing::InMemoryListingRepository;

use super::LikeRepository;

/// Like store reading the listing map of an `InMemoryListingRepository`
/// to hide listings the viewer may no longer see
#[derive(Clone)]
pub struct InMemoryLikeRepository {
    likes: Arc<RwLock<HashMap<(Uuid, Uuid), LikedListing>>>,
    listings: Arc<InMemoryListingRepository>,
}

impl InMemoryLikeRepository {
    pub fn new(listings: Arc<InMemoryListingRepository>) -> Self {
        Self {
            likes: Arc::new(RwLock::new(HashMap::new())),
            listings,
        }
    }
}

#[async_trait]
impl LikeRepository for InMemoryLikeRepository {
    async fn add(&self, user_id: Uuid, listing_id: Uuid) -> DomainResult<bool> {
        let mut likes = self.likes.write().await;
        if likes.contains_key(&(user_id, listing_id)) {
            return Ok(false);
        }
        likes.insert(
            (user_id, listing_id),
            LikedListing::new(user_id, listing_id),
        );
        Ok(true)
    }

    async fn remove(&self, user_id: Uuid, listing_id: Uuid) -> DomainResult<bool> {
        Ok(self
            .likes
            .write()
            .await
            .remove(&(user_id, listing_id))
            .is_some())
    }

    async fn exists(&self, user_id: Uuid, listing_id: Uuid) -> DomainResult<bool> {
        Ok(self.likes.read().await.contains_key(&(user_id, listing_id)))
    }

    async fn liked_listing_ids(
        &self,
        viewer: &Actor,
        pagination: &Pagination,
    ) -> DomainResult<PaginatedResponse<Uuid>> {
        let listings = self.listings.listings.read().await;
        let mut liked: Vec<LikedListing> = self
            .likes
            .read()
            .await
            .values()
            .filter(|l| l.user_id == viewer.user_id)
            .filter(|l| {
                listings
                    .get(&l.listing_id)
                    .is_some_and(|listing| listing.is_visible_to(Some(viewer)))
            })
            .cloned()
            .collect();
        liked.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let ids = liked.into_iter().map(|l| l.listing_id).collect();
        Ok(paginate_vec(ids, pagination))
    }
}
