//! Shared setup for the HTTP tests: both services on in-memory repositories

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{http::header, test::TestRequest, web};
use serde_json::{json, Value};
use uuid::Uuid;

use eh_api::{AuthState, ListingState};
use eh_core::domain::value_objects::{RegisterInput, UserSummary};
use eh_core::repositories::{
    InMemoryLikeRepository, InMemoryListingRepository, InMemoryPhotoRepository,
    InMemoryReportRepository, InMemorySessionRepository, InMemoryUserRepository,
    InMemoryUserTokenRepository, UserRepository,
};
use eh_core::services::{
    AccessTokenValidator, AnalyticsService, AuthService, InMemoryEmailSender, InMemoryPhotoStorage,
    InMemoryUserDirectory, ListingService, LoginInput, PasswordHasher, PhotoService,
    ReportService,
};
use eh_shared::{AuthConfig, CorsConfig, Environment, JwtConfig, PhotoStorageConfig, Role};

pub const PASSWORD: &str = "Secret1!";

pub fn cors() -> CorsConfig {
    CorsConfig::development()
}

pub const ENVIRONMENT: Environment = Environment::Development;

fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt: JwtConfig::new("integration-test-secret"),
        ..Default::default()
    }
}

pub struct AuthHarness {
    pub state: web::Data<AuthState>,
    pub service: Arc<AuthService>,
    pub users: Arc<InMemoryUserRepository>,
    pub outbox: Arc<InMemoryEmailSender>,
}

pub fn auth_harness() -> AuthHarness {
    let users = Arc::new(InMemoryUserRepository::new());
    let outbox = Arc::new(InMemoryEmailSender::new());
    let service = Arc::new(
        AuthService::new(
            users.clone(),
            Arc::new(InMemorySessionRepository::new()),
            Arc::new(InMemoryUserTokenRepository::new()),
            outbox.clone(),
            auth_config(),
        )
        .with_password_hasher(PasswordHasher::new(4)),
    );

    AuthHarness {
        state: web::Data::new(AuthState::new(service.clone())),
        service,
        users,
        outbox,
    }
}

/// A signed-in account
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl TestUser {
    pub fn bearer(&self) -> (header::HeaderName, String) {
        (header::AUTHORIZATION, format!("Bearer {}", self.access_token))
    }
}

impl AuthHarness {
    /// Register and log in through the service; admins get the role first
    pub async fn sign_in(&self, user_name: &str, admin: bool) -> TestUser {
        let email = format!("{}@example.com", user_name);
        let user = self
            .service
            .register(RegisterInput {
                email: email.clone(),
                user_name: user_name.to_string(),
                password: PASSWORD.to_string(),
                first_name: "Test".to_string(),
                last_name: user_name.to_string(),
            })
            .await
            .unwrap();

        if admin {
            let mut stored = self.users.find_by_id(user.id).await.unwrap().unwrap();
            stored.add_role(Role::Admin);
            self.users.update(&stored).await.unwrap();
        }

        let response = self
            .service
            .login(LoginInput {
                login: email.clone(),
                password: PASSWORD.to_string(),
                user_agent: Some("integration-test".to_string()),
                ip_address: Some("127.0.0.1".to_string()),
            })
            .await
            .unwrap();

        TestUser {
            id: user.id,
            email,
            access_token: response.access_token,
            refresh_token: response.refresh_token,
        }
    }
}

pub struct ListingHarness {
    pub state: web::Data<ListingState>,
    pub auth: AuthHarness,
    pub directory: Arc<InMemoryUserDirectory>,
}

/// Listing service whose tokens come from an in-memory authorization service
pub fn listing_harness() -> ListingHarness {
    listing_harness_with(PhotoStorageConfig::default())
}

pub fn listing_harness_with(storage: PhotoStorageConfig) -> ListingHarness {
    let auth = auth_harness();
    let directory = Arc::new(InMemoryUserDirectory::new());

    let listings = Arc::new(InMemoryListingRepository::new());
    let reports = Arc::new(InMemoryReportRepository::new(listings.clone()));

    let state = web::Data::new(ListingState {
        listing_service: Arc::new(ListingService::new(
            listings.clone(),
            Arc::new(InMemoryLikeRepository::new(listings.clone())),
        )),
        photo_service: Arc::new(PhotoService::new(
            listings.clone(),
            Arc::new(InMemoryPhotoRepository::new()),
            Arc::new(InMemoryPhotoStorage::new()),
            storage,
        )),
        report_service: Arc::new(ReportService::new(reports.clone(), listings.clone())),
        analytics_service: Arc::new(AnalyticsService::new(
            listings,
            reports,
            directory.clone(),
        )),
        user_directory: directory.clone(),
        token_validator: AccessTokenValidator::new(&auth_config().jwt),
        max_payload_size: 256 * 1024,
    });

    ListingHarness {
        state,
        auth,
        directory,
    }
}

impl ListingHarness {
    /// Sign in and make the account known to the user directory
    pub async fn sign_in(&self, user_name: &str, admin: bool) -> TestUser {
        let user = self.auth.sign_in(user_name, admin).await;
        self.directory
            .insert(UserSummary {
                id: user.id,
                user_name: user_name.to_string(),
                first_name: "Test".to_string(),
                last_name: user_name.to_string(),
            })
            .await;
        user
    }
}

/// POST /graphql with an optional bearer token
pub fn graphql_request(user: Option<&TestUser>, query: &str, variables: Value) -> TestRequest {
    let mut request = TestRequest::post()
        .uri("/graphql")
        .set_json(json!({ "query": query, "variables": variables }));
    if let Some(user) = user {
        request = request.insert_header(user.bearer());
    }
    request
}

/// Error code of the first GraphQL error, if any
pub fn first_error_code(body: &Value) -> Option<&str> {
    body["errors"][0]["extensions"]["code"].as_str()
}

pub const CREATE_LISTING: &str = r#"
    mutation Create($input: ListingInput!) {
        createListing(input: $input) { id status version title }
    }
"#;

pub fn listing_input(title: &str) -> Value {
    json!({
        "title": title,
        "description": "Two bedrooms, close to the river",
        "listingType": "SALE",
        "category": "APARTMENT",
        "price": 185000.0,
        "rooms": 2,
        "city": "Porto",
        "country": "Portugal"
    })
}
