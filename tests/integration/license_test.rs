//! Integration tests for license accounting.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_limit_reached_reports_limit() {
    let app = TestApp::new(2).await;
    for email in ["a@firm.test", "b@firm.test", "c@firm.test"] {
        app.create_user(email).await;
    }
    app.login("a@firm.test").await;
    app.login("b@firm.test").await;

    let refused = app.login_response("c@firm.test").await;
    assert_eq!(refused.status, StatusCode::FORBIDDEN);
    assert_eq!(refused.error_code(), "LICENSE_LIMIT_REACHED");
    assert_eq!(refused.body["details"]["license_limit"], 2);
    assert_eq!(app.license_used().await, 2);
}

#[tokio::test]
async fn test_logout_frees_license() {
    let app = TestApp::new(2).await;
    for email in ["a@firm.test", "b@firm.test", "c@firm.test"] {
        app.create_user(email).await;
    }
    let a = app.login("a@firm.test").await;
    app.login("b@firm.test").await;

    app.request("POST", "/api/auth/logout", None, Some(&a)).await;
    app.login("c@firm.test").await;

    assert_eq!(app.license_used().await, 2);
    app.store.check_consistency().await.unwrap();
}

#[tokio::test]
async fn test_license_info_lists_sessions() {
    let app = TestApp::new(3).await;
    app.create_user("a@firm.test").await;
    let token = app.login("a@firm.test").await;

    let response = app.request("GET", "/api/license", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["license_limit"], 3);
    assert_eq!(response.data()["license_used"], 1);
    assert_eq!(response.data()["available"], 2);

    let sessions = response.data()["active_sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["email"], "a@firm.test");
    assert_eq!(sessions[0]["ip_address"], "198.51.100.4");
}

#[tokio::test]
async fn test_set_limit_below_usage_conflicts() {
    let app = TestApp::new(3).await;
    app.create_user("a@firm.test").await;
    app.create_user("b@firm.test").await;
    let token = app.login("a@firm.test").await;
    app.login("b@firm.test").await;

    let below = app
        .request(
            "PUT",
            "/api/admin/license/limit",
            Some(json!({ "license_limit": 1 })),
            Some(&token),
        )
        .await;
    assert_eq!(below.status, StatusCode::CONFLICT);

    let invalid = app
        .request(
            "PUT",
            "/api/admin/license/limit",
            Some(json!({ "license_limit": 0 })),
            Some(&token),
        )
        .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);

    let ok = app
        .request(
            "PUT",
            "/api/admin/license/limit",
            Some(json!({ "license_limit": 5 })),
            Some(&token),
        )
        .await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.data()["license_limit"], 5);
    assert_eq!(ok.data()["license_used"], 2);
}
