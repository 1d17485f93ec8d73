//! Integration tests for share creation, lookup and name claims.

mod helpers;

use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_create_share() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/shares",
            Some(json!({
                "folder_path": "/photos/Summer 2024/",
                "password": "secret",
                "expires_in_hours": 24,
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let share = &response.body["share"];
    assert_eq!(share["id"].as_str().unwrap().len(), 8);
    assert!(share.get("password").is_none());
    assert!(share["expires_at"].is_string());
    assert_eq!(response.body["session"]["session_name"], "Summer 2024");
}

#[tokio::test]
async fn test_create_share_requires_password() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/shares",
            Some(json!({ "folder_path": "/photos", "password": "" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_get_share_counts_access() {
    let app = helpers::TestApp::new().await;
    let share_id = app.create_share().await;

    app.request("GET", &format!("/api/shares/{share_id}"), None)
        .await;
    let response = app
        .request("GET", &format!("/api/shares/{share_id}"), None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["id"], share_id.as_str());
    assert_eq!(response.body["access_count"], 2);
}

#[tokio::test]
async fn test_get_unknown_share() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/shares/zz99zz99", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_claim_name_then_conflict_with_suggestions() {
    let app = helpers::TestApp::new().await;
    let share_id = app.create_share().await;
    let body = json!({ "share_id": share_id, "user_name": "ana" });

    let first = app
        .request("POST", "/api/sessions/validate-name", Some(body.clone()))
        .await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["success"], true);

    let second = app
        .request("POST", "/api/sessions/validate-name", Some(body))
        .await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(second.body["success"], false);
    assert_eq!(second.body["suggestions"], json!(["ana2", "ana_B"]));
    assert!(second.body["error"].as_str().unwrap().contains("'ana'"));
}

#[tokio::test]
async fn test_claim_name_on_unknown_share() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/sessions/validate-name",
            Some(json!({ "share_id": "nope1234", "user_name": "ana" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_reports_metrics() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["hub_running"], true);
    assert_eq!(response.body["realtime"]["connections_active"], 0);
}
