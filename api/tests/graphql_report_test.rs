//! Moderation workflow and the admin dashboard through GraphQL

mod common;

use actix_web::test;
use serde_json::{json, Value};

use common::{
    cors, first_error_code, graphql_request, listing_harness, listing_input, ENVIRONMENT,
    CREATE_LISTING,
};
use eh_api::create_listing_app;

const SUBMIT: &str = r#"
    mutation R($input: SubmitReportInput!) {
        submitReport(input: $input) { id status reason }
    }
"#;

#[actix_web::test]
async fn test_report_workflow_archives_listing() {
    let harness = listing_harness();
    let app = test::init_service(create_listing_app(harness.state.clone(), &cors(), ENVIRONMENT)).await;
    let owner = harness.sign_in("owner", false).await;
    let reporter = harness.sign_in("reporter", false).await;
    let admin = harness.sign_in("moderator", true).await;

    let req = graphql_request(Some(&owner), CREATE_LISTING, json!({ "input": listing_input("Too good to be true") }));
    let body: Value = test::call_and_read_body_json(&app, req.to_request()).await;
    let listing_id = body["data"]["createListing"]["id"].as_str().unwrap().to_string();

    let report_input = json!({ "input": {
        "listingId": listing_id,
        "reason": "FRAUD",
        "description": "Asks for a deposit by wire transfer"
    }});

    // Drafts cannot be reported
    let req = graphql_request(Some(&reporter), SUBMIT, report_input.clone());
    let body: Value = test::call_and_read_body_json(&app, req.to_request()).await;
    assert!(first_error_code(&body).is_some());

    let publish = "mutation P($id: Uuid!) { publishListing(id: $id) { status } }";
    let req = graphql_request(Some(&owner), publish, json!({ "id": listing_id }));
    test::call_and_read_body_json::<_, _, Value>(&app, req.to_request()).await;

    // Owners cannot report themselves
    let req = graphql_request(Some(&owner), SUBMIT, report_input.clone());
    let body: Value = test::call_and_read_body_json(&app, req.to_request()).await;
    assert_eq!(first_error_code(&body), Some("OWN_LISTING"));

    let req = graphql_request(Some(&reporter), SUBMIT, report_input.clone());
    let body: Value = test::call_and_read_body_json(&app, req.to_request()).await;
    let report = &body["data"]["submitReport"];
    assert_eq!(report["status"], "PENDING");
    assert_eq!(report["reason"], "FRAUD");
    let report_id = report["id"].as_str().unwrap().to_string();

    // One open report per reporter and listing
    let req = graphql_request(Some(&reporter), SUBMIT, report_input);
    let body: Value = test::call_and_read_body_json(&app, req.to_request()).await;
    assert_eq!(first_error_code(&body), Some("DUPLICATE_REPORT"));

    // Only admins moderate
    let review = "mutation S($id: Uuid!) { startReview(id: $id) { status moderatorId } }";
    let req = graphql_request(Some(&reporter), review, json!({ "id": report_id }));
    let body: Value = test::call_and_read_body_json(&app, req.to_request()).await;
    assert_eq!(first_error_code(&body), Some("FORBIDDEN"));

    // Resolving needs a review first
    let resolve = r#"
        mutation V($id: Uuid!) {
            resolveReport(id: $id, note: "Confirmed scam", archiveListing: true) {
                status resolutionNote resolvedAt listing { status }
            }
        }
    "#;
    let req = graphql_request(Some(&admin), resolve, json!({ "id": report_id }));
    let body: Value = test::call_and_read_body_json(&app, req.to_request()).await;
    assert_eq!(first_error_code(&body), Some("INVALID_TRANSITION"));

    let req = graphql_request(Some(&admin), review, json!({ "id": report_id }));
    let body: Value = test::call_and_read_body_json(&app, req.to_request()).await;
    assert_eq!(body["data"]["startReview"]["status"], "UNDER_REVIEW");
    assert_eq!(body["data"]["startReview"]["moderatorId"], admin.id.to_string());

    let req = graphql_request(Some(&admin), resolve, json!({ "id": report_id }));
    let body: Value = test::call_and_read_body_json(&app, req.to_request()).await;
    let resolved = &body["data"]["resolveReport"];
    assert_eq!(resolved["status"], "RESOLVED");
    assert_eq!(resolved["resolutionNote"], "Confirmed scam");
    assert!(!resolved["resolvedAt"].is_null());
    assert_eq!(resolved["listing"]["status"], "ARCHIVED");

    let close = "mutation C($id: Uuid!) { closeReport(id: $id) { status closedAt } }";
    let req = graphql_request(Some(&admin), close, json!({ "id": report_id }));
    let body: Value = test::call_and_read_body_json(&app, req.to_request()).await;
    assert_eq!(body["data"]["closeReport"]["status"], "CLOSED");

    // The reporter sees their own report, the queue is for admins
    let mine = "{ myReports { items { id status } pageInfo { total } } }";
    let req = graphql_request(Some(&reporter), mine, Value::Null);
    let body: Value = test::call_and_read_body_json(&app, req.to_request()).await;
    assert_eq!(body["data"]["myReports"]["pageInfo"]["total"], 1);
    assert_eq!(body["data"]["myReports"]["items"][0]["status"], "CLOSED");

    let queue = r#"
        query Q($filter: ReportFilter) {
            reports(filter: $filter) { pageInfo { total } }
        }
    "#;
    let req = graphql_request(Some(&reporter), queue, json!({ "filter": null }));
    let body: Value = test::call_and_read_body_json(&app, req.to_request()).await;
    assert_eq!(first_error_code(&body), Some("FORBIDDEN"));

    let req = graphql_request(Some(&admin), queue, json!({ "filter": { "status": "CLOSED" } }));
    let body: Value = test::call_and_read_body_json(&app, req.to_request()).await;
    assert_eq!(body["data"]["reports"]["pageInfo"]["total"], 1);

    let req = graphql_request(Some(&admin), queue, json!({ "filter": { "status": "PENDING" } }));
    let body: Value = test::call_and_read_body_json(&app, req.to_request()).await;
    assert_eq!(body["data"]["reports"]["pageInfo"]["total"], 0);
}

#[actix_web::test]
async fn test_dismissed_report_leaves_listing_published() {
    let harness = listing_harness();
    let app = test::init_service(create_listing_app(harness.state.clone(), &cors(), ENVIRONMENT)).await;
    let owner = harness.sign_in("owner", false).await;
    let reporter = harness.sign_in("reporter", false).await;
    let admin = harness.sign_in("moderator", true).await;

    let req = graphql_request(Some(&owner), CREATE_LISTING, json!({ "input": listing_input("Harbour loft") }));
    let body: Value = test::call_and_read_body_json(&app, req.to_request()).await;
    let listing_id = body["data"]["createListing"]["id"].as_str().unwrap().to_string();
    let publish = "mutation P($id: Uuid!) { publishListing(id: $id) { status } }";
    let req = graphql_request(Some(&owner), publish, json!({ "id": listing_id }));
    test::call_and_read_body_json::<_, _, Value>(&app, req.to_request()).await;

    let req = graphql_request(
        Some(&reporter),
        SUBMIT,
        json!({ "input": { "listingId": listing_id, "reason": "DUPLICATE" } }),
    );
    let body: Value = test::call_and_read_body_json(&app, req.to_request()).await;
    let report_id = body["data"]["submitReport"]["id"].as_str().unwrap().to_string();

    let review = "mutation S($id: Uuid!) { startReview(id: $id) { status } }";
    let req = graphql_request(Some(&admin), review, json!({ "id": report_id }));
    test::call_and_read_body_json::<_, _, Value>(&app, req.to_request()).await;

    let dismiss = r#"
        mutation D($id: Uuid!) {
            dismissReport(id: $id, note: "Not a duplicate") { status listing { status } }
        }
    "#;
    let req = graphql_request(Some(&admin), dismiss, json!({ "id": report_id }));
    let body: Value = test::call_and_read_body_json(&app, req.to_request()).await;
    assert_eq!(body["data"]["dismissReport"]["status"], "DISMISSED");
    assert_eq!(body["data"]["dismissReport"]["listing"]["status"], "PUBLISHED");
}

#[actix_web::test]
async fn test_dashboard() {
    let harness = listing_harness();
    let app = test::init_service(create_listing_app(harness.state.clone(), &cors(), ENVIRONMENT)).await;
    let owner = harness.sign_in("owner", false).await;
    let admin = harness.sign_in("admin", true).await;

    for title in ["First listing", "Second listing"] {
        let req = graphql_request(Some(&owner), CREATE_LISTING, json!({ "input": listing_input(title) }));
        test::call_and_read_body_json::<_, _, Value>(&app, req.to_request()).await;
    }

    let dashboard = r#"
        {
            dashboard(topLiked: 3) {
                listings { draft published total }
                reports { open }
                totalUsers
                listingsLast7Days
                topLiked { id }
            }
        }
    "#;
    let req = graphql_request(Some(&owner), dashboard, Value::Null);
    let body: Value = test::call_and_read_body_json(&app, req.to_request()).await;
    assert_eq!(first_error_code(&body), Some("FORBIDDEN"));

    let req = graphql_request(Some(&admin), dashboard, Value::Null);
    let body: Value = test::call_and_read_body_json(&app, req.to_request()).await;
    assert!(body["errors"].is_null(), "{}", body);
    let data = &body["data"]["dashboard"];
    assert_eq!(data["listings"]["draft"], 2);
    assert_eq!(data["listings"]["published"], 0);
    assert_eq!(data["listings"]["total"], 2);
    assert_eq!(data["reports"]["open"], 0);
    assert_eq!(data["totalUsers"], 2);
    assert_eq!(data["listingsLast7Days"], 2);
    assert_eq!(data["topLiked"].as_array().unwrap().len(), 0);
}
