//! Report entity and its moderation state machine.
//!
//! ```text
//! Pending -> UnderReview -> Resolved  -> Closed
//!                        -> Dismissed -> Closed
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ReportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportReason {
    Spam,
    Fraud,
    Inappropriate,
    WrongInformation,
    Duplicate,
    Other,
}

string_enum!(ReportReason {
    Spam,
    Fraud,
    Inappropriate,
    WrongInformation,
    Duplicate,
    Other
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportStatus {
    Pending,
    UnderReview,
    Resolved,
    Dismissed,
    Closed,
}

string_enum!(ReportStatus {
    Pending,
    UnderReview,
    Resolved,
    Dismissed,
    Closed
});

impl ReportStatus {
    /// Still waiting for a moderator decision
    pub fn is_open(&self) -> bool {
        matches!(self, ReportStatus::Pending | ReportStatus::UnderReview)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub reporter_id: Uuid,
    pub reason: ReportReason,
    pub description: Option<String>,
    pub status: ReportStatus,
    pub moderator_id: Option<Uuid>,
    pub resolution_note: Option<String>,
    pub row_version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl Report {
    pub fn new(
        listing_id: Uuid,
        reporter_id: Uuid,
        reason: ReportReason,
        description: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            listing_id,
            reporter_id,
            reason,
            description,
            status: ReportStatus::Pending,
            moderator_id: None,
            resolution_note: None,
            row_version: 1,
            created_at: now,
            updated_at: now,
            resolved_at: None,
            closed_at: None,
        }
    }

    pub fn start_review(&mut self, moderator_id: Uuid) -> Result<(), ReportError> {
        self.expect(ReportStatus::Pending, "review")?;
        self.status = ReportStatus::UnderReview;
        self.moderator_id = Some(moderator_id);
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn resolve(&mut self, moderator_id: Uuid, note: Option<String>) -> Result<(), ReportError> {
        self.expect(ReportStatus::UnderReview, "resolve")?;
        self.decide(ReportStatus::Resolved, moderator_id, note);
        Ok(())
    }

    pub fn dismiss(&mut self, moderator_id: Uuid, note: Option<String>) -> Result<(), ReportError> {
        self.expect(ReportStatus::UnderReview, "dismiss")?;
        self.decide(ReportStatus::Dismissed, moderator_id, note);
        Ok(())
    }

    pub fn close(&mut self) -> Result<(), ReportError> {
        match self.status {
            ReportStatus::Resolved | ReportStatus::Dismissed => {
                let now = Utc::now();
                self.status = ReportStatus::Closed;
                self.closed_at = Some(now);
                self.updated_at = now;
                Ok(())
            }
            _ => Err(self.invalid("close")),
        }
    }

    fn decide(&mut self, status: ReportStatus, moderator_id: Uuid, note: Option<String>) {
        let now = Utc::now();
        self.status = status;
        self.moderator_id = Some(moderator_id);
        self.resolution_note = note;
        self.resolved_at = Some(now);
        self.updated_at = now;
    }

    fn expect(&self, status: ReportStatus, action: &str) -> Result<(), ReportError> {
        if self.status == status {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn invalid(&self, action: &str) -> ReportError {
        ReportError::InvalidTransition {
            status: self.status.to_string(),
            action: action.to_string(),
        }
    }
}
