//! MySQL implementation of the ListingRepository trait.
//!
//! `row_version` is checked and bumped inside the UPDATE statement itself,
//! so two writers holding the same version cannot both succeed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eh_shared::{PaginatedResponse, Pagination};
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlConnection, MySqlPool, QueryBuilder};
use uuid::Uuid;

use eh_core::domain::entities::{Listing, ListingStatus};
use eh_core::domain::value_objects::{ListingFilter, ListingSort, ListingStatusCounts};
use eh_core::repositories::ListingRepository;
use eh_core::{DomainError, DomainResult, ListingError};

use super::columns::{db_error, get, like_pattern, placeholders, uuid, variant};

pub(crate) const LISTING_COLUMNS: &str = r#"
    id, owner_id, title, description, listing_type, category, status, price, currency,
    area_sqm, rooms, address, city, country, latitude, longitude, likes_count,
    is_deleted, row_version, created_at, updated_at, published_at
"#;

/// MySQL implementation of ListingRepository
pub struct MySqlListingRepository {
    pool: MySqlPool,
}

impl MySqlListingRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub(crate) fn row_to_listing(row: &MySqlRow) -> Result<Listing, DomainError> {
        Ok(Listing {
            id: uuid(row, "id")?,
            owner_id: uuid(row, "owner_id")?,
            title: get(row, "title")?,
            description: get(row, "description")?,
            listing_type: variant(row, "listing_type")?,
            category: variant(row, "category")?,
            status: variant(row, "status")?,
            price: get(row, "price")?,
            currency: get(row, "currency")?,
            area_sqm: get(row, "area_sqm")?,
            rooms: get(row, "rooms")?,
            address: get(row, "address")?,
            city: get(row, "city")?,
            country: get(row, "country")?,
            latitude: get(row, "latitude")?,
            longitude: get(row, "longitude")?,
            likes_count: get(row, "likes_count")?,
            is_deleted: get(row, "is_deleted")?,
            row_version: get(row, "row_version")?,
            created_at: get(row, "created_at")?,
            updated_at: get(row, "updated_at")?,
            published_at: get(row, "published_at")?,
        })
    }

    pub(crate) async fn fetch(
        conn: &mut MySqlConnection,
        id: Uuid,
    ) -> DomainResult<Option<Listing>> {
        let query = format!("SELECT {} FROM listings WHERE id = ? LIMIT 1", LISTING_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(conn)
            .await
            .map_err(|e| db_error("find listing", e))?;

        row.as_ref().map(Self::row_to_listing).transpose()
    }

    /// Versioned write on an open connection; the report repository calls
    /// this inside its resolve-and-archive transaction.
    pub(crate) async fn update_on(
        conn: &mut MySqlConnection,
        listing: &Listing,
        expected_version: i64,
    ) -> DomainResult<Listing> {
        let query = r#"
            UPDATE listings SET
                title = ?, description = ?, listing_type = ?, category = ?, status = ?,
                price = ?, currency = ?, area_sqm = ?, rooms = ?, address = ?, city = ?,
                country = ?, latitude = ?, longitude = ?, is_deleted = ?,
                updated_at = ?, published_at = ?, row_version = row_version + 1
            WHERE id = ? AND row_version = ?
        "#;

        let result = sqlx::query(query)
            .bind(&listing.title)
            .bind(&listing.description)
            .bind(listing.listing_type.as_str())
            .bind(listing.category.as_str())
            .bind(listing.status.as_str())
            .bind(listing.price)
            .bind(&listing.currency)
            .bind(listing.area_sqm)
            .bind(listing.rooms)
            .bind(&listing.address)
            .bind(&listing.city)
            .bind(&listing.country)
            .bind(listing.latitude)
            .bind(listing.longitude)
            .bind(listing.is_deleted)
            .bind(listing.updated_at)
            .bind(listing.published_at)
            .bind(listing.id.to_string())
            .bind(expected_version)
            .execute(&mut *conn)
            .await
            .map_err(|e| db_error("update listing", e))?;

        if result.rows_affected() == 0 {
            return match Self::fetch(conn, listing.id).await? {
                None => Err(ListingError::NotFound.into()),
                Some(_) => Err(DomainError::conflict("Listing")),
            };
        }

        Self::fetch(conn, listing.id)
            .await?
            .ok_or_else(|| ListingError::NotFound.into())
    }

    /// Append the WHERE clause for `filter`; deleted listings never match
    fn push_filters(builder: &mut QueryBuilder<'_, MySql>, filter: &ListingFilter) {
        builder.push(" WHERE is_deleted = FALSE");

        if let Some(needle) = filter.text_needle() {
            let pattern = like_pattern(&needle);
            builder
                .push(r" AND (title LIKE ")
                .push_bind(pattern.clone())
                .push(r" ESCAPE '\\' OR description LIKE ")
                .push_bind(pattern)
                .push(r" ESCAPE '\\')");
        }
        if let Some(listing_type) = filter.listing_type {
            builder
                .push(" AND listing_type = ")
                .push_bind(listing_type.as_str());
        }
        if let Some(category) = filter.category {
            builder.push(" AND category = ").push_bind(category.as_str());
        }
        if let Some(city) = filter.city.as_deref() {
            builder.push(" AND city = ").push_bind(city.trim().to_string());
        }
        if let Some(min) = filter.min_price {
            builder.push(" AND price >= ").push_bind(min);
        }
        if let Some(max) = filter.max_price {
            builder.push(" AND price <= ").push_bind(max);
        }
        if let Some(min) = filter.min_rooms {
            builder.push(" AND rooms >= ").push_bind(min);
        }
        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(owner_id) = filter.owner_id {
            builder.push(" AND owner_id = ").push_bind(owner_id.to_string());
        }
    }

    fn order_by(sort: ListingSort) -> &'static str {
        match sort {
            ListingSort::Newest => " ORDER BY created_at DESC",
            ListingSort::PriceAsc => " ORDER BY price ASC, created_at DESC",
            ListingSort::PriceDesc => " ORDER BY price DESC, created_at DESC",
            ListingSort::MostLiked => " ORDER BY likes_count DESC, created_at DESC",
        }
    }
}

#[async_trait]
impl ListingRepository for MySqlListingRepository {
    async fn create(&self, listing: Listing) -> DomainResult<Listing> {
        let query = format!(
            "INSERT INTO listings ({}) VALUES ({})",
            LISTING_COLUMNS,
            placeholders(22)
        );

        sqlx::query(&query)
            .bind(listing.id.to_string())
            .bind(listing.owner_id.to_string())
            .bind(&listing.title)
            .bind(&listing.description)
            .bind(listing.listing_type.as_str())
            .bind(listing.category.as_str())
            .bind(listing.status.as_str())
            .bind(listing.price)
            .bind(&listing.currency)
            .bind(listing.area_sqm)
            .bind(listing.rooms)
            .bind(&listing.address)
            .bind(&listing.city)
            .bind(&listing.country)
            .bind(listing.latitude)
            .bind(listing.longitude)
            .bind(listing.likes_count)
            .bind(listing.is_deleted)
            .bind(listing.row_version)
            .bind(listing.created_at)
            .bind(listing.updated_at)
            .bind(listing.published_at)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("save listing", e))?;

        tracing::debug!(listing_id = %listing.id, "Listing created");
        Ok(listing)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Listing>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| db_error("acquire connection", e))?;
        Self::fetch(&mut conn, id).await
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> DomainResult<Vec<Listing>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<MySql> = QueryBuilder::new(format!(
            "SELECT {} FROM listings WHERE is_deleted = FALSE AND id IN (",
            LISTING_COLUMNS
        ));
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(id.to_string());
        }
        separated.push_unseparated(")");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("find listings", e))?;

        let mut found = rows
            .iter()
            .map(Self::row_to_listing)
            .collect::<DomainResult<Vec<_>>>()?;
        found.sort_by_key(|listing| ids.iter().position(|id| *id == listing.id));
        Ok(found)
    }

    async fn update(&self, listing: &Listing, expected_version: i64) -> DomainResult<Listing> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| db_error("acquire connection", e))?;
        Self::update_on(&mut conn, listing, expected_version).await
    }

    async fn search(
        &self,
        filter: &ListingFilter,
        pagination: &Pagination,
    ) -> DomainResult<PaginatedResponse<Listing>> {
        let mut count_query: QueryBuilder<MySql> =
            QueryBuilder::new("SELECT COUNT(*) FROM listings");
        Self::push_filters(&mut count_query, filter);
        let total = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("count listings", e))?;

        let mut select: QueryBuilder<MySql> =
            QueryBuilder::new(format!("SELECT {} FROM listings", LISTING_COLUMNS));
        Self::push_filters(&mut select, filter);
        select
            .push(Self::order_by(filter.sort))
            .push(" LIMIT ")
            .push_bind(pagination.limit_i64())
            .push(" OFFSET ")
            .push_bind(pagination.offset_i64());

        let rows = select
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("search listings", e))?;

        let listings = rows
            .iter()
            .map(Self::row_to_listing)
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(PaginatedResponse::new(
            listings,
            pagination.clone(),
            total.max(0) as u64,
        ))
    }

    async fn adjust_likes(&self, id: Uuid, delta: i64) -> DomainResult<()> {
        let result =
            sqlx::query("UPDATE listings SET likes_count = GREATEST(likes_count + ?, 0) WHERE id = ?")
                .bind(delta)
                .bind(id.to_string())
                .execute(&self.pool)
                .await
                .map_err(|e| db_error("adjust likes", e))?;

        if result.rows_affected() == 0 && self.find_by_id(id).await?.is_none() {
            return Err(ListingError::NotFound.into());
        }
        Ok(())
    }

    async fn count_by_status(&self) -> DomainResult<ListingStatusCounts> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) FROM listings WHERE is_deleted = FALSE GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("count listings by status", e))?;

        let mut counts = ListingStatusCounts::default();
        for (status, count) in rows {
            let status: ListingStatus = status
                .parse()
                .map_err(|message| DomainError::Internal { message })?;
            counts.add(status, count.max(0) as u64);
        }
        Ok(counts)
    }

    async fn count_created_since(&self, since: DateTime<Utc>) -> DomainResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM listings WHERE is_deleted = FALSE AND created_at >= ?",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("count new listings", e))?;

        Ok(count.max(0) as u64)
    }

    async fn top_liked(&self, limit: usize) -> DomainResult<Vec<Listing>> {
        let query = format!(
            r#"
            SELECT {}
            FROM listings
            WHERE is_deleted = FALSE AND status = ?
            ORDER BY likes_count DESC, created_at DESC
            LIMIT ?
            "#,
            LISTING_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(ListingStatus::Published.as_str())
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("load most liked listings", e))?;

        rows.iter().map(Self::row_to_listing).collect()
    }
}
