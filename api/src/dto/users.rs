use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AssignRoleRequest {
    /// `User` or `Admin`
    #[validate(length(min = 1, max = 32))]
    pub role: String,
}

/// Served to the listing service for the admin dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStatsResponse {
    pub total_users: u64,
}
