//! MySQL implementation of the ReportRepository trait.

use async_trait::async_trait;
use eh_shared::{PaginatedResponse, Pagination};
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlConnection, MySqlPool, QueryBuilder};
use uuid::Uuid;

use eh_core::domain::entities::{Listing, Report, ReportStatus};
use eh_core::domain::value_objects::{ReportFilter, ReportStatusCounts};
use eh_core::repositories::ReportRepository;
use eh_core::{DomainError, DomainResult, ReportError};

use super::columns::{db_error, get, opt_uuid, unique_violation, uuid, variant};
use super::listing_repository_impl::MySqlListingRepository;

const REPORT_COLUMNS: &str = r#"
    id, listing_id, reporter_id, reason, description, status, moderator_id,
    resolution_note, row_version, created_at, updated_at, resolved_at, closed_at
"#;

/// MySQL implementation of ReportRepository
pub struct MySqlReportRepository {
    pool: MySqlPool,
}

impl MySqlReportRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_report(row: &MySqlRow) -> Result<Report, DomainError> {
        Ok(Report {
            id: uuid(row, "id")?,
            listing_id: uuid(row, "listing_id")?,
            reporter_id: uuid(row, "reporter_id")?,
            reason: variant(row, "reason")?,
            description: get(row, "description")?,
            status: variant(row, "status")?,
            moderator_id: opt_uuid(row, "moderator_id")?,
            resolution_note: get(row, "resolution_note")?,
            row_version: get(row, "row_version")?,
            created_at: get(row, "created_at")?,
            updated_at: get(row, "updated_at")?,
            resolved_at: get(row, "resolved_at")?,
            closed_at: get(row, "closed_at")?,
        })
    }

    async fn fetch(conn: &mut MySqlConnection, id: Uuid) -> DomainResult<Option<Report>> {
        let query = format!("SELECT {} FROM reports WHERE id = ? LIMIT 1", REPORT_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(conn)
            .await
            .map_err(|e| db_error("find report", e))?;

        row.as_ref().map(Self::row_to_report).transpose()
    }

    async fn update_on(
        conn: &mut MySqlConnection,
        report: &Report,
        expected_version: i64,
    ) -> DomainResult<Report> {
        let query = r#"
            UPDATE reports SET
                status = ?, moderator_id = ?, resolution_note = ?, updated_at = ?,
                resolved_at = ?, closed_at = ?, row_version = row_version + 1
            WHERE id = ? AND row_version = ?
        "#;

        let result = sqlx::query(query)
            .bind(report.status.as_str())
            .bind(report.moderator_id.map(|id| id.to_string()))
            .bind(&report.resolution_note)
            .bind(report.updated_at)
            .bind(report.resolved_at)
            .bind(report.closed_at)
            .bind(report.id.to_string())
            .bind(expected_version)
            .execute(&mut *conn)
            .await
            .map_err(|e| db_error("update report", e))?;

        if result.rows_affected() == 0 {
            return match Self::fetch(conn, report.id).await? {
                None => Err(ReportError::NotFound.into()),
                Some(_) => Err(DomainError::conflict("Report")),
            };
        }

        Self::fetch(conn, report.id)
            .await?
            .ok_or_else(|| ReportError::NotFound.into())
    }

    fn push_filters(builder: &mut QueryBuilder<'_, MySql>, filter: &ReportFilter) {
        builder.push(" WHERE 1 = 1");

        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(listing_id) = filter.listing_id {
            builder
                .push(" AND listing_id = ")
                .push_bind(listing_id.to_string());
        }
        if let Some(reason) = filter.reason {
            builder.push(" AND reason = ").push_bind(reason.as_str());
        }
        if let Some(reporter_id) = filter.reporter_id {
            builder
                .push(" AND reporter_id = ")
                .push_bind(reporter_id.to_string());
        }
    }
}

#[async_trait]
impl ReportRepository for MySqlReportRepository {
    async fn create(&self, report: Report) -> DomainResult<Report> {
        let query = r#"
            INSERT INTO reports (
                id, listing_id, reporter_id, reason, description, status, moderator_id,
                resolution_note, row_version, created_at, updated_at, resolved_at, closed_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(report.id.to_string())
            .bind(report.listing_id.to_string())
            .bind(report.reporter_id.to_string())
            .bind(report.reason.as_str())
            .bind(&report.description)
            .bind(report.status.as_str())
            .bind(report.moderator_id.map(|id| id.to_string()))
            .bind(&report.resolution_note)
            .bind(report.row_version)
            .bind(report.created_at)
            .bind(report.updated_at)
            .bind(report.resolved_at)
            .bind(report.closed_at)
            .execute(&self.pool)
            .await
            .map_err(|e| match unique_violation(&e) {
                Some(message) if message.contains("uq_reports_open") => {
                    ReportError::DuplicateOpenReport.into()
                }
                _ => db_error("save report", e),
            })?;

        tracing::debug!(report_id = %report.id, listing_id = %report.listing_id, "Report created");
        Ok(report)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Report>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| db_error("acquire connection", e))?;
        Self::fetch(&mut conn, id).await
    }

    async fn update(&self, report: &Report, expected_version: i64) -> DomainResult<Report> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| db_error("acquire connection", e))?;
        Self::update_on(&mut conn, report, expected_version).await
    }

    async fn resolve_with_archive(
        &self,
        report: &Report,
        report_version: i64,
        listing: &Listing,
        listing_version: i64,
    ) -> DomainResult<(Report, Listing)> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin transaction", e))?;

        // Dropping `tx` on an early return rolls both writes back
        let report = Self::update_on(&mut tx, report, report_version).await?;
        let listing = MySqlListingRepository::update_on(&mut tx, listing, listing_version).await?;

        tx.commit()
            .await
            .map_err(|e| db_error("commit report resolution", e))?;

        tracing::info!(report_id = %report.id, listing_id = %listing.id, "Report resolved and listing archived");
        Ok((report, listing))
    }

    async fn search(
        &self,
        filter: &ReportFilter,
        pagination: &Pagination,
    ) -> DomainResult<PaginatedResponse<Report>> {
        let mut count_query: QueryBuilder<MySql> = QueryBuilder::new("SELECT COUNT(*) FROM reports");
        Self::push_filters(&mut count_query, filter);
        let total = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("count reports", e))?;

        let mut select: QueryBuilder<MySql> =
            QueryBuilder::new(format!("SELECT {} FROM reports", REPORT_COLUMNS));
        Self::push_filters(&mut select, filter);
        select
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(pagination.limit_i64())
            .push(" OFFSET ")
            .push_bind(pagination.offset_i64());

        let rows = select
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("search reports", e))?;

        let reports = rows
            .iter()
            .map(Self::row_to_report)
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(PaginatedResponse::new(
            reports,
            pagination.clone(),
            total.max(0) as u64,
        ))
    }

    async fn count_by_status(&self) -> DomainResult<ReportStatusCounts> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM reports GROUP BY status")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| db_error("count reports by status", e))?;

        let mut counts = ReportStatusCounts::default();
        for (status, count) in rows {
            let status: ReportStatus = status
                .parse()
                .map_err(|message| DomainError::Internal { message })?;
            counts.add(status, count.max(0) as u64);
        }
        Ok(counts)
    }
}
