//! Admin dashboard figures.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Listing, ListingStatus, ReportStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingStatusCounts {
    pub draft: u64,
    pub published: u64,
    pub archived: u64,
}

impl ListingStatusCounts {
    pub fn add(&mut self, status: ListingStatus, count: u64) {
        match status {
            ListingStatus::Draft => self.draft += count,
            ListingStatus::Published => self.published += count,
            ListingStatus::Archived => self.archived += count,
        }
    }

    pub fn total(&self) -> u64 {
        self.draft + self.published + self.archived
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportStatusCounts {
    pub pending: u64,
    pub under_review: u64,
    pub resolved: u64,
    pub dismissed: u64,
    pub closed: u64,
}

impl ReportStatusCounts {
    pub fn add(&mut self, status: ReportStatus, count: u64) {
        match status {
            ReportStatus::Pending => self.pending += count,
            ReportStatus::UnderReview => self.under_review += count,
            ReportStatus::Resolved => self.resolved += count,
            ReportStatus::Dismissed => self.dismissed += count,
            ReportStatus::Closed => self.closed += count,
        }
    }

    /// Reports still waiting for a decision
    pub fn open(&self) -> u64 {
        self.pending + self.under_review
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub listings: ListingStatusCounts,
    pub reports: ReportStatusCounts,
    /// `None` when the user directory could not be reached
    pub total_users: Option<u64>,
    pub listings_last_7_days: u64,
    pub listings_last_30_days: u64,
    pub top_liked: Vec<Listing>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let mut listings = ListingStatusCounts::default();
        listings.add(ListingStatus::Draft, 2);
        listings.add(ListingStatus::Published, 5);
        assert_eq!(listings.total(), 7);

        let mut reports = ReportStatusCounts::default();
        reports.add(ReportStatus::Pending, 1);
        reports.add(ReportStatus::UnderReview, 2);
        reports.add(ReportStatus::Closed, 9);
        assert_eq!(reports.open(), 3);
    }
}
