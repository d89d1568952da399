//! Account lifecycle over the authorization REST API

mod common;

use actix_web::{http::header, test};
use serde_json::{json, Value};

use common::{auth_harness, cors, ENVIRONMENT, PASSWORD};
use eh_api::create_auth_app;

#[actix_web::test]
async fn test_register_confirm_login_refresh_logout() {
    let harness = auth_harness();
    let app = test::init_service(create_auth_app(harness.state.clone(), &cors(), ENVIRONMENT)).await;

    // Register
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({
            "email": "Ana@Example.com",
            "user_name": "ana",
            "password": PASSWORD,
            "first_name": "Ana",
            "last_name": "Silva"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["email_confirmed"], false);
    let user_id = body["user_id"].as_str().unwrap().to_string();

    // Confirm with the mailed token
    let token = harness
        .outbox
        .last_link_param("ana@example.com", "token")
        .await
        .expect("confirmation e-mail");
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/confirm-email")
        .set_json(json!({ "user_id": user_id, "token": token }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    // Log in by user name
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .insert_header((header::USER_AGENT, "integration-test"))
        .set_json(json!({ "login": "ana", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let login: Value = test::read_body_json(resp).await;
    assert_eq!(login["token_type"], "Bearer");
    assert_eq!(login["user"]["email_confirmed"], true);
    let access_token = login["access_token"].as_str().unwrap().to_string();
    let refresh_token = login["refresh_token"].as_str().unwrap().to_string();

    // Rotate the refresh token
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .set_json(json!({ "refresh_token": refresh_token }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let rotated: Value = test::read_body_json(resp).await;
    assert_ne!(rotated["refresh_token"], login["refresh_token"]);

    // Replaying the old refresh token is rejected
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .set_json(json!({ "refresh_token": refresh_token }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/problem+json"
    );

    // The profile is reachable with the access token
    let req = test::TestRequest::get()
        .uri("/api/v1/users/me")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", access_token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let me: Value = test::read_body_json(resp).await;
    assert!(me["email"]
        .as_str()
        .unwrap()
        .eq_ignore_ascii_case("ana@example.com"));
    assert_eq!(me["user_name"], "ana");
}

#[actix_web::test]
async fn test_register_validation_and_duplicates() {
    let harness = auth_harness();
    let app = test::init_service(create_auth_app(harness.state.clone(), &cors(), ENVIRONMENT)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({ "email": "bob@example.com", "user_name": "bob", "password": "short" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 422);
    let problem: Value = test::read_body_json(resp).await;
    assert_eq!(problem["code"], "PASSWORD_POLICY");
    assert!(problem["errors"]["password"].is_array());

    harness.sign_in("bob", false).await;
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({ "email": "bob@example.com", "user_name": "bobby", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);
    let problem: Value = test::read_body_json(resp).await;
    assert_eq!(problem["code"], "EMAIL_TAKEN");
}

#[actix_web::test]
async fn test_wrong_password_is_unauthorized() {
    let harness = auth_harness();
    let app = test::init_service(create_auth_app(harness.state.clone(), &cors(), ENVIRONMENT)).await;
    harness.sign_in("carla", false).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "login": "carla@example.com", "password": "Wrong1!!" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
    let problem: Value = test::read_body_json(resp).await;
    assert_eq!(problem["code"], "INVALID_CREDENTIALS");
}

#[actix_web::test]
async fn test_sessions_and_logout_all() {
    let harness = auth_harness();
    let app = test::init_service(create_auth_app(harness.state.clone(), &cors(), ENVIRONMENT)).await;
    let first = harness.sign_in("dora", false).await;

    // Second device
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "login": "dora", "password": PASSWORD }))
        .to_request();
    let second: Value = test::call_and_read_body_json(&app, req).await;
    let second_session = second["session_id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/sessions")
        .insert_header(first.bearer())
        .to_request();
    let sessions: Value = test::call_and_read_body_json(&app, req).await;
    let sessions = sessions.as_array().unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions.iter().filter(|s| s["current"] == true).count(), 1);

    // Revoke the other device
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/auth/sessions/{}", second_session))
        .insert_header(first.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .set_json(json!({ "refresh_token": second["refresh_token"] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/logout-all")
        .insert_header(first.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["sessions_revoked"], 1);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .set_json(json!({ "refresh_token": first.refresh_token }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn test_password_reset_flow() {
    let harness = auth_harness();
    let app = test::init_service(create_auth_app(harness.state.clone(), &cors(), ENVIRONMENT)).await;
    let user = harness.sign_in("eva", false).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/forgot-password")
        .set_json(json!({ "email": user.email }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 202);

    // Unknown addresses get the same answer
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/forgot-password")
        .set_json(json!({ "email": "nobody@example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 202);

    let token = harness
        .outbox
        .last_link_param(&user.email, "token")
        .await
        .expect("reset e-mail");
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/reset-password")
        .set_json(json!({ "email": user.email, "token": token, "new_password": "Brand2new!" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    // Old sessions are gone, the new password works
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .set_json(json!({ "refresh_token": user.refresh_token }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 401);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "login": "eva", "password": "Brand2new!" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);
}

#[actix_web::test]
async fn test_roles_and_stats_require_admin() {
    let harness = auth_harness();
    let app = test::init_service(create_auth_app(harness.state.clone(), &cors(), ENVIRONMENT)).await;
    let admin = harness.sign_in("root", true).await;
    let user = harness.sign_in("fred", false).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/users/stats")
        .insert_header(user.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    let req = test::TestRequest::get()
        .uri("/api/v1/users/stats")
        .insert_header(admin.bearer())
        .to_request();
    let stats: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(stats["total_users"], 2);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/users/{}/roles", user.id))
        .insert_header(admin.bearer())
        .set_json(json!({ "role": "admin" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let profile: Value = test::read_body_json(resp).await;
    assert_eq!(profile["roles"].as_array().unwrap().len(), 2);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/users/{}/roles/admin", user.id))
        .insert_header(admin.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let profile: Value = test::read_body_json(resp).await;
    assert_eq!(profile["roles"].as_array().unwrap().len(), 1);

    // Public lookup used by the listing service
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/users/{}", user.id))
        .insert_header(admin.bearer())
        .to_request();
    let summary: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(summary["user_name"], "fred");
    assert!(summary.get("email").is_none());
}
