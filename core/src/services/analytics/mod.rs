//! Admin dashboard

use chrono::{Duration, Utc};
use eh_shared::ClaimsPrincipal;
use std::sync::Arc;
use tracing::warn;

use crate::domain::value_objects::{Actor, Dashboard};
use crate::errors::{AuthError, DomainResult};
use crate::repositories::{ListingRepository, ReportRepository};
use crate::services::user_directory::UserDirectory;

/// Listings shown in the "most liked" panel
pub const DEFAULT_TOP_LIKED: usize = 5;

pub struct AnalyticsService {
    listings: Arc<dyn ListingRepository>,
    reports: Arc<dyn ReportRepository>,
    directory: Arc<dyn UserDirectory>,
}

impl AnalyticsService {
    pub fn new(
        listings: Arc<dyn ListingRepository>,
        reports: Arc<dyn ReportRepository>,
        directory: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            listings,
            reports,
            directory,
        }
    }

    /// Figures for the admin dashboard.
    ///
    /// `access_token` is forwarded to the user directory; when the directory
    /// cannot answer, `total_users` is left empty instead of failing.
    pub async fn dashboard(
        &self,
        admin: &Actor,
        access_token: &str,
        top_liked: usize,
    ) -> DomainResult<Dashboard> {
        if !admin.is_admin() {
            return Err(AuthError::InsufficientPermissions.into());
        }

        let now = Utc::now();
        let listings = self.listings.count_by_status().await?;
        let reports = self.reports.count_by_status().await?;
        let listings_last_7_days = self
            .listings
            .count_created_since(now - Duration::days(7))
            .await?;
        let listings_last_30_days = self
            .listings
            .count_created_since(now - Duration::days(30))
            .await?;
        let top_liked = self.listings.top_liked(top_liked.clamp(1, 50)).await?;

        let total_users = match self.directory.count_users(access_token).await {
            Ok(count) => Some(count),
            Err(e) => {
                warn!(error = %e, "User count unavailable for dashboard");
                None
            }
        };

        Ok(Dashboard {
            listings,
            reports,
            total_users,
            listings_last_7_days,
            listings_last_30_days,
            top_liked,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Listing, Report, ReportReason};
    use crate::domain::value_objects::UserSummary;
    use crate::repositories::{InMemoryListingRepository, InMemoryReportRepository};
    use crate::services::user_directory::InMemoryUserDirectory;
    use crate::test_support::{admin_actor, listing_input, published_listing, user_actor};
    use uuid::Uuid;

    async fn service(directory: InMemoryUserDirectory) -> AnalyticsService {
        let listings = Arc::new(InMemoryListingRepository::new());
        let reports = Arc::new(InMemoryReportRepository::new(listings.clone()));
        let owner = Uuid::new_v4();

        let mut popular = published_listing(owner, "Popular");
        popular.likes_count = 9;
        listings.create(popular.clone()).await.unwrap();
        listings.create(published_listing(owner, "Quiet")).await.unwrap();
        let mut old = Listing::new(owner, listing_input("Old draft"));
        old.created_at = Utc::now() - Duration::days(20);
        listings.create(old).await.unwrap();

        reports
            .create(Report::new(popular.id, Uuid::new_v4(), ReportReason::Spam, None))
            .await
            .unwrap();

        AnalyticsService::new(listings, reports, Arc::new(directory))
    }

    #[tokio::test]
    async fn test_dashboard() {
        let directory = InMemoryUserDirectory::new();
        directory
            .insert(UserSummary {
                id: Uuid::new_v4(),
                user_name: "ana".to_string(),
                first_name: "Ana".to_string(),
                last_name: "Silva".to_string(),
            })
            .await;
        let service = service(directory).await;

        let dashboard = service.dashboard(&admin_actor(), "token", 1).await.unwrap();
        assert_eq!(dashboard.listings.published, 2);
        assert_eq!(dashboard.listings.draft, 1);
        assert_eq!(dashboard.reports.pending, 1);
        assert_eq!(dashboard.total_users, Some(1));
        assert_eq!(dashboard.listings_last_7_days, 2);
        assert_eq!(dashboard.listings_last_30_days, 3);
        assert_eq!(dashboard.top_liked.len(), 1);
        assert_eq!(dashboard.top_liked[0].title, "Popular");
    }

    #[tokio::test]
    async fn test_dashboard_without_directory() {
        let service = service(InMemoryUserDirectory::unavailable()).await;
        let dashboard = service
            .dashboard(&admin_actor(), "token", DEFAULT_TOP_LIKED)
            .await
            .unwrap();
        assert_eq!(dashboard.total_users, None);
        assert_eq!(dashboard.top_liked.len(), 2);
    }

    #[tokio::test]
    async fn test_dashboard_requires_admin() {
        let service = service(InMemoryUserDirectory::new()).await;
        assert!(service.dashboard(&user_actor(), "token", 5).await.is_err());
    }
}
