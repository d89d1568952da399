use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{ReportReason, ReportStatus};

/// Moderator queue filter; every set field must match
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilter {
    pub status: Option<ReportStatus>,
    pub listing_id: Option<Uuid>,
    pub reason: Option<ReportReason>,
    pub reporter_id: Option<Uuid>,
}

impl ReportFilter {
    pub fn for_reporter(reporter_id: Uuid) -> Self {
        Self {
            reporter_id: Some(reporter_id),
            ..Default::default()
        }
    }
}
