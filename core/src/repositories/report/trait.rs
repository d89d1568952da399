//! Report repository trait.

use async_trait::async_trait;
use eh_shared::{PaginatedResponse, Pagination};
use uuid::Uuid;

use crate::domain::entities::{Listing, Report};
use crate::domain::value_objects::{ReportFilter, ReportStatusCounts};
use crate::errors::DomainResult;

/// Repository trait for listing reports
///
/// Same optimistic concurrency contract as `ListingRepository::update`.
#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn create(&self, report: Report) -> DomainResult<Report>;

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Report>>;

    async fn update(&self, report: &Report, expected_version: i64) -> DomainResult<Report>;

    /// Store a resolved report together with its archived listing.
    ///
    /// Both version checks must pass or neither row is written.
    async fn resolve_with_archive(
        &self,
        report: &Report,
        report_version: i64,
        listing: &Listing,
        listing_version: i64,
    ) -> DomainResult<(Report, Listing)>;

    /// Matching reports, newest first
    async fn search(
        &self,
        filter: &ReportFilter,
        pagination: &Pagination,
    ) -> DomainResult<PaginatedResponse<Report>>;

    async fn count_by_status(&self) -> DomainResult<ReportStatusCounts>;
}
