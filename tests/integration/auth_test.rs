//! Integration tests for the authentication flow.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{PASSWORD, TestApp};

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::new(2).await;
    let user = app.create_user("lawyer@firm.test").await;

    let response = app.login_response("lawyer@firm.test").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.data()["access_token"].is_string());
    assert!(response.data()["session_token"].is_string());
    assert_eq!(response.data()["user"]["id"], json!(user.id));
    assert!(response.data()["user"].get("password_hash").is_none());
    assert_eq!(app.license_used().await, 1);
}

#[tokio::test]
async fn test_login_failures_look_identical() {
    let app = TestApp::new(2).await;
    app.create_user("lawyer@firm.test").await;

    let wrong = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "lawyer@firm.test", "password": "wrongpassword" })),
            None,
        )
        .await;
    let unknown = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "nobody@firm.test", "password": PASSWORD })),
            None,
        )
        .await;

    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.body, unknown.body);
    assert_eq!(wrong.error_code(), "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_second_login_conflicts() {
    let app = TestApp::new(2).await;
    app.create_user("lawyer@firm.test").await;
    let token = app.login("lawyer@firm.test").await;

    let second = app.login_response("lawyer@firm.test").await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(second.error_code(), "CONFLICT_ACTIVE_SESSION");

    let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(me.status, StatusCode::OK);
}

#[tokio::test]
async fn test_me_and_logout() {
    let app = TestApp::new(2).await;
    app.create_user("lawyer@firm.test").await;
    let token = app.login("lawyer@firm.test").await;

    let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.data()["email"], "lawyer@firm.test");

    let logout = app.request("POST", "/api/auth/logout", None, Some(&token)).await;
    assert_eq!(logout.status, StatusCode::OK);
    assert_eq!(app.license_used().await, 0);

    let after = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
    assert_eq!(after.error_code(), "UNAUTHORIZED");
    app.store.check_consistency().await.unwrap();
}

#[tokio::test]
async fn test_missing_and_bad_credentials() {
    let app = TestApp::new(2).await;

    let missing = app.request("GET", "/api/auth/me", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.error_code(), "UNAUTHENTICATED");

    let bad = app.request("GET", "/api/auth/me", None, Some("not-a-jwt")).await;
    assert_eq!(bad.status, StatusCode::UNAUTHORIZED);
    assert_eq!(bad.error_code(), "UNAUTHORIZED");
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new(1).await;
    let response = app.request("GET", "/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["database"], "memory");
}

#[tokio::test]
async fn test_register_logs_in() {
    let app = TestApp::new(2).await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "email": "new@firm.test",
                "password": PASSWORD,
                "full_name": "New Associate",
                "tenant_id": app.tenant.id,
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.data()["user"]["role"], "staff");
    let token = response.data()["access_token"].as_str().unwrap().to_string();

    let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(app.license_used().await, 1);
}

#[tokio::test]
async fn test_register_without_tenant() {
    let app = TestApp::new(2).await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "email": "new@firm.test",
                "password": PASSWORD,
                "full_name": "New Associate",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "TENANT_REQUIRED");
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::new(5).await;
    app.create_user("taken@firm.test").await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "email": "taken@firm.test",
                "password": PASSWORD,
                "full_name": "Someone",
                "tenant_id": app.tenant.id,
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), "DUPLICATE_EMAIL");
}
