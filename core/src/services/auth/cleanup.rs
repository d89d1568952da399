use serde::Serialize;

/// Result of a cleanup operation
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct CleanupResult {
    /// Expired sessions deleted
    pub sessions_deleted: usize,
    /// Expired or consumed confirmation/reset tokens deleted
    pub user_tokens_deleted: usize,
    /// Errors encountered, one entry per failed step
    pub errors: Vec<String>,
}

impl CleanupResult {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn total_cleaned(&self) -> usize {
        self.sessions_deleted + self.user_tokens_deleted
    }
}
