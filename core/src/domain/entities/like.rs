use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's like of a listing; unique per (user, listing)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikedListing {
    pub user_id: Uuid,
    pub listing_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl LikedListing {
    pub fn new(user_id: Uuid, listing_id: Uuid) -> Self {
        Self {
            user_id,
            listing_id,
            created_at: Utc::now(),
        }
    }
}
