//! Application state shared by the request handlers

use std::sync::Arc;

use eh_core::services::{
    AccessTokenValidator, AnalyticsService, AuthService, ListingService, PhotoService,
    ReportService,
};

/// State of the authorization service
pub struct AuthState {
    pub auth_service: Arc<AuthService>,
    /// Cap on JSON request bodies
    pub max_payload_size: usize,
}

impl AuthState {
    pub fn new(auth_service: Arc<AuthService>) -> Self {
        Self {
            auth_service,
            max_payload_size: 64 * 1024,
        }
    }

    /// Verifier for the access tokens this service issues
    pub fn token_validator(&self) -> AccessTokenValidator {
        self.auth_service.token_service().validator().clone()
    }
}

/// State of the listing service
pub struct ListingState {
    pub listing_service: Arc<ListingService>,
    pub photo_service: Arc<PhotoService>,
    pub report_service: Arc<ReportService>,
    pub analytics_service: Arc<AnalyticsService>,
    pub user_directory: Arc<dyn eh_core::services::UserDirectory>,
    pub token_validator: AccessTokenValidator,
    pub max_payload_size: usize,
}
