//! Cross-cutting behaviour: bearer authentication, problem responses,
//! security headers and health checks

mod common;

use std::sync::Arc;

use actix_web::{http::header, test};
use serde_json::Value;

use common::{auth_harness, cors, listing_harness, ENVIRONMENT, PASSWORD};
use eh_api::{create_auth_app, create_listing_app};
use eh_core::domain::value_objects::RegisterInput;
use eh_core::repositories::{
    InMemorySessionRepository, InMemoryUserRepository, InMemoryUserTokenRepository,
};
use eh_core::services::{AuthService, InMemoryEmailSender, LoginInput, PasswordHasher};
use eh_shared::{AuthConfig, JwtConfig};

#[actix_web::test]
async fn test_missing_token_is_problem_json() {
    let harness = auth_harness();
    let app = test::init_service(create_auth_app(harness.state.clone(), &cors(), ENVIRONMENT)).await;

    let req = test::TestRequest::get().uri("/api/v1/users/me").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/problem+json"
    );
    let problem: Value = test::read_body_json(resp).await;
    assert_eq!(problem["status"], 401);
    assert_eq!(problem["code"], "UNAUTHORIZED");
}

#[actix_web::test]
async fn test_malformed_token_is_rejected() {
    let harness = auth_harness();
    let app = test::init_service(create_auth_app(harness.state.clone(), &cors(), ENVIRONMENT)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/logout")
        .insert_header((header::AUTHORIZATION, "Bearer not-a-jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
    let problem: Value = test::read_body_json(resp).await;
    assert_eq!(problem["code"], "TOKEN_INVALID");
}

#[actix_web::test]
async fn test_token_signed_with_another_secret_is_rejected() {
    let harness = listing_harness();
    let app = test::init_service(create_listing_app(harness.state.clone(), &cors(), ENVIRONMENT)).await;

    let other = AuthService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemorySessionRepository::new()),
        Arc::new(InMemoryUserTokenRepository::new()),
        Arc::new(InMemoryEmailSender::new()),
        AuthConfig {
            jwt: JwtConfig::new("some-other-secret"),
            ..Default::default()
        },
    )
    .with_password_hasher(PasswordHasher::new(4));
    other
        .register(RegisterInput {
            email: "gina@example.com".to_string(),
            user_name: "gina".to_string(),
            password: PASSWORD.to_string(),
            first_name: String::new(),
            last_name: String::new(),
        })
        .await
        .unwrap();
    let foreign = other
        .login(LoginInput {
            login: "gina".to_string(),
            password: PASSWORD.to_string(),
            user_agent: None,
            ip_address: None,
        })
        .await
        .unwrap();

    let req = test::TestRequest::get()
        .uri("/graphql")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", foreign.access_token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    // Anonymous access to the same route is fine
    let req = test::TestRequest::get().uri("/graphql").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);
}

#[actix_web::test]
async fn test_unknown_route_is_problem_json() {
    let harness = auth_harness();
    let app = test::init_service(create_auth_app(harness.state.clone(), &cors(), ENVIRONMENT)).await;

    let req = test::TestRequest::get().uri("/api/v1/nowhere").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
    let problem: Value = test::read_body_json(resp).await;
    assert_eq!(problem["instance"], "/api/v1/nowhere");
}

#[actix_web::test]
async fn test_malformed_json_is_bad_request() {
    let harness = auth_harness();
    let app = test::init_service(create_auth_app(harness.state.clone(), &cors(), ENVIRONMENT)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{ not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/problem+json"
    );
}

#[actix_web::test]
async fn test_health_and_security_headers() {
    let auth = auth_harness();
    let app = test::init_service(create_auth_app(auth.state.clone(), &cors(), ENVIRONMENT)).await;
    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert_eq!(resp.headers().get("x-frame-options").unwrap(), "DENY");
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["service"], "auth");

    let listing = listing_harness();
    let app = test::init_service(create_listing_app(listing.state.clone(), &cors(), ENVIRONMENT)).await;
    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["service"], "listing");
}

#[actix_web::test]
async fn test_graphiql_page() {
    let harness = listing_harness();
    let app = test::init_service(create_listing_app(harness.state.clone(), &cors(), ENVIRONMENT)).await;

    let req = test::TestRequest::get().uri("/graphql").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&body).contains("graphiql"));
}
