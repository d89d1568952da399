//! In-memory implementation of ReportRepository

use async_trait::async_trait;
use eh_shared::{paginate_vec, PaginatedResponse, Pagination};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::{Listing, Report};
use crate::domain::value_objects::{ReportFilter, ReportStatusCounts};
use crate::errors::{DomainError, DomainResult, ReportError};
use crate::repositories::listing::InMemoryListingRepository;

use super::ReportRepository;

/// Report store sharing the listing map of an `InMemoryListingRepository`
/// so that resolve-and-archive happens under one pair of locks
#[derive(Clone)]
pub struct InMemoryReportRepository {
    reports: Arc<RwLock<HashMap<Uuid, Report>>>,
    listings: Arc<InMemoryListingRepository>,
}

impl InMemoryReportRepository {
    pub fn new(listings: Arc<InMemoryListingRepository>) -> Self {
        Self {
            reports: Arc::new(RwLock::new(HashMap::new())),
            listings,
        }
    }

    fn check_version(stored: Option<&Report>, expected_version: i64) -> DomainResult<()> {
        match stored {
            None => Err(ReportError::NotFound.into()),
            Some(r) if r.row_version != expected_version => Err(DomainError::conflict("Report")),
            Some(_) => Ok(()),
        }
    }
}

fn matches(report: &Report, filter: &ReportFilter) -> bool {
    filter.status.map_or(true, |s| report.status == s)
        && filter.listing_id.map_or(true, |id| report.listing_id == id)
        && filter.reason.map_or(true, |r| report.reason == r)
        && filter.reporter_id.map_or(true, |id| report.reporter_id == id)
}

#[async_trait]
impl ReportRepository for InMemoryReportRepository {
    async fn create(&self, report: Report) -> DomainResult<Report> {
        let mut reports = self.reports.write().await;
        let duplicate = report.status.is_open()
            && reports.values().any(|r| {
                r.listing_id == report.listing_id
                    && r.reporter_id == report.reporter_id
                    && r.status.is_open()
            });
        if duplicate {
            return Err(ReportError::DuplicateOpenReport.into());
        }
        reports.insert(report.id, report.clone());
        Ok(report)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Report>> {
        Ok(self.reports.read().await.get(&id).cloned())
    }

    async fn update(&self, report: &Report, expected_version: i64) -> DomainResult<Report> {
        let mut reports = self.reports.write().await;
        Self::check_version(reports.get(&report.id), expected_version)?;

        let mut updated = report.clone();
        updated.row_version = expected_version + 1;
        reports.insert(updated.id, updated.clone());
        Ok(updated)
    }

    async fn resolve_with_archive(
        &self,
        report: &Report,
        report_version: i64,
        listing: &Listing,
        listing_version: i64,
    ) -> DomainResult<(Report, Listing)> {
        let mut reports = self.reports.write().await;
        let mut listings = self.listings.listings.write().await;

        Self::check_version(reports.get(&report.id), report_version)?;
        let listing =
            InMemoryListingRepository::apply_update(&mut listings, listing, listing_version)?;

        let mut updated = report.clone();
        updated.row_version = report_version + 1;
        reports.insert(updated.id, updated.clone());
        Ok((updated, listing))
    }

    async fn search(
        &self,
        filter: &ReportFilter,
        pagination: &Pagination,
    ) -> DomainResult<PaginatedResponse<Report>> {
        let mut found: Vec<Report> = self
            .reports
            .read()
            .await
            .values()
            .filter(|r| matches(r, filter))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate_vec(found, pagination))
    }

    async fn count_by_status(&self) -> DomainResult<ReportStatusCounts> {
        let mut counts = ReportStatusCounts::default();
        for report in self.reports.read().await.values() {
            counts.add(report.status, 1);
        }
        Ok(counts)
    }
}
