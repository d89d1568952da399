use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public view of a user, as served by the user directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
}
