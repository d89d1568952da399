//! Content moderation hook applied before a listing is published

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::entities::Listing;
use crate::errors::DomainResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationRequest {
    pub title: String,
    pub description: String,
}

impl From<&Listing> for ModerationRequest {
    fn from(listing: &Listing) -> Self {
        Self {
            title: listing.title.clone(),
            description: listing.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum ModerationVerdict {
    Approved,
    Rejected { reason: String },
}

/// Trait for content moderation backends
#[async_trait]
pub trait ContentModerator: Send + Sync {
    /// An `Err` means the backend could not be asked, not a rejection
    async fn review(&self, request: &ModerationRequest) -> DomainResult<ModerationVerdict>;
}

/// Approves everything; used when no moderation endpoint is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAllModerator;

#[async_trait]
impl ContentModerator for AllowAllModerator {
    async fn review(&self, _request: &ModerationRequest) -> DomainResult<ModerationVerdict> {
        Ok(ModerationVerdict::Approved)
    }
}
