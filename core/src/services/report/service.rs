use eh_shared::{ClaimsPrincipal, PaginatedResponse, Pagination};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::entities::{ListingStatus, Report, ReportReason};
use crate::domain::value_objects::{Actor, ReportFilter};
use crate::errors::{AuthError, DomainResult, ListingError, ReportError, ValidationError};
use crate::repositories::{ListingRepository, ReportRepository};

const MAX_TEXT_CHARS: usize = 2000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitReport {
    pub listing_id: Uuid,
    pub reason: ReportReason,
    pub description: Option<String>,
}

pub struct ReportService {
    reports: Arc<dyn ReportRepository>,
    listings: Arc<dyn ListingRepository>,
}

impl ReportService {
    pub fn new(reports: Arc<dyn ReportRepository>, listings: Arc<dyn ListingRepository>) -> Self {
        Self { reports, listings }
    }

    /// File a report against someone else's published listing.
    ///
    /// A reporter may hold one open report per listing.
    pub async fn submit_report(&self, reporter: &Actor, input: SubmitReport) -> DomainResult<Report> {
        let description = clean_text("description", input.description)?;
        if input.reason == ReportReason::Other && description.is_none() {
            return Err(ValidationError::RequiredField {
                field: "description".to_string(),
            }
            .into());
        }

        let listing = self
            .listings
            .find_by_id(input.listing_id)
            .await?
            .filter(|l| !l.is_deleted)
            .ok_or(ListingError::NotFound)?;
        if listing.status != ListingStatus::Published {
            return Err(ReportError::ListingNotReportable.into());
        }
        if listing.owner_id == reporter.user_id {
            return Err(ReportError::OwnListing.into());
        }
        // The repository refuses a second open report atomically
        let report = self
            .reports
            .create(Report::new(listing.id, reporter.user_id, input.reason, description))
            .await?;
        info!(report_id = %report.id, listing_id = %listing.id, reason = %report.reason, "Report submitted");
        Ok(report)
    }

    pub async fn start_review(&self, moderator: &Actor, id: Uuid) -> DomainResult<Report> {
        require_admin(moderator)?;
        let mut report = self.load(id).await?;
        let version = report.row_version;
        report.start_review(moderator.user_id)?;
        self.reports.update(&report, version).await
    }

    /// Resolve a report under review, archiving the listing in the same
    /// unit of work when `archive_listing` is set
    pub async fn resolve_report(
        &self,
        moderator: &Actor,
        id: Uuid,
        note: Option<String>,
        archive_listing: bool,
    ) -> DomainResult<Report> {
        require_admin(moderator)?;
        let note = clean_text("note", note)?;
        let mut report = self.load(id).await?;
        let version = report.row_version;
        report.resolve(moderator.user_id, note)?;

        if archive_listing {
            let listing = self
                .listings
                .find_by_id(report.listing_id)
                .await?
                .filter(|l| !l.is_deleted && l.status != ListingStatus::Archived);
            if let Some(mut listing) = listing {
                let listing_version = listing.row_version;
                listing.archive()?;
                let (report, listing) = self
                    .reports
                    .resolve_with_archive(&report, version, &listing, listing_version)
                    .await?;
                info!(report_id = %report.id, listing_id = %listing.id, "Report resolved, listing archived");
                return Ok(report);
            }
        }

        let report = self.reports.update(&report, version).await?;
        info!(report_id = %report.id, "Report resolved");
        Ok(report)
    }

    pub async fn dismiss_report(
        &self,
        moderator: &Actor,
        id: Uuid,
        note: Option<String>,
    ) -> DomainResult<Report> {
        require_admin(moderator)?;
        let note = clean_text("note", note)?;
        let mut report = self.load(id).await?;
        let version = report.row_version;
        report.dismiss(moderator.user_id, note)?;

        let report = self.reports.update(&report, version).await?;
        info!(report_id = %report.id, "Report dismissed");
        Ok(report)
    }

    pub async fn close_report(&self, moderator: &Actor, id: Uuid) -> DomainResult<Report> {
        require_admin(moderator)?;
        let mut report = self.load(id).await?;
        let version = report.row_version;
        report.close()?;
        self.reports.update(&report, version).await
    }

    /// Visible to admins and to the reporter
    pub async fn get_report(&self, actor: &Actor, id: Uuid) -> DomainResult<Report> {
        let report = self.load(id).await?;
        if !actor.can_modify(report.reporter_id) {
            return Err(ReportError::NotFound.into());
        }
        Ok(report)
    }

    pub async fn list_reports(
        &self,
        moderator: &Actor,
        filter: ReportFilter,
        pagination: &Pagination,
    ) -> DomainResult<PaginatedResponse<Report>> {
        require_admin(moderator)?;
        self.reports.search(&filter, pagination).await
    }

    pub async fn my_reports(
        &self,
        reporter: &Actor,
        pagination: &Pagination,
    ) -> DomainResult<PaginatedResponse<Report>> {
        self.reports
            .search(&ReportFilter::for_reporter(reporter.user_id), pagination)
            .await
    }

    async fn load(&self, id: Uuid) -> DomainResult<Report> {
        self.reports
            .find_by_id(id)
            .await?
            .ok_or_else(|| ReportError::NotFound.into())
    }
}

fn require_admin(actor: &Actor) -> DomainResult<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(AuthError::InsufficientPermissions.into())
    }
}

/// Trim; blank becomes `None`
fn clean_text(field: &str, text: Option<String>) -> Result<Option<String>, ValidationError> {
    let text = text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
    match text {
        Some(t) if t.chars().count() > MAX_TEXT_CHARS => Err(ValidationError::InvalidLength {
            field: field.to_string(),
            min: 0,
            max: MAX_TEXT_CHARS,
        }),
        other => Ok(other),
    }
}
