//! Integration tests for administrative session actions.

use axum::http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_force_logout_same_tenant() {
    let app = TestApp::new(2).await;
    app.create_user("admin@firm.test").await;
    let target = app.create_user("target@firm.test").await;
    let admin_token = app.login("admin@firm.test").await;
    let target_token = app.login("target@firm.test").await;

    let response = app
        .request(
            "POST",
            &format!("/api/admin/users/{}/force-logout", target.id),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["sessions_ended"], 1);

    let me = app.request("GET", "/api/auth/me", None, Some(&target_token)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.license_used().await, 1);
}

#[tokio::test]
async fn test_force_logout_other_tenant_forbidden() {
    let app = TestApp::new(2).await;
    let other = app.store.insert_tenant("Other Firm", 2).await;
    app.create_user("admin@firm.test").await;
    let outsider = app.create_user_in(other.id, "x@other.test").await;
    let admin_token = app.login("admin@firm.test").await;
    let outsider_token = app.login("x@other.test").await;

    let response = app
        .request(
            "POST",
            &format!("/api/admin/users/{}/force-logout", outsider.id),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let me = app.request("GET", "/api/auth/me", None, Some(&outsider_token)).await;
    assert_eq!(me.status, StatusCode::OK);
}

#[tokio::test]
async fn test_deactivate_account() {
    let app = TestApp::new(2).await;
    app.create_user("admin@firm.test").await;
    let target = app.create_user("target@firm.test").await;
    let admin_token = app.login("admin@firm.test").await;
    app.login("target@firm.test").await;

    let response = app
        .request(
            "POST",
            &format!("/api/admin/users/{}/deactivate", target.id),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let relogin = app.login_response("target@firm.test").await;
    assert_eq!(relogin.status, StatusCode::FORBIDDEN);
    assert_eq!(relogin.error_code(), "ACCOUNT_DEACTIVATED");
    assert_eq!(app.license_used().await, 1);
    app.store.check_consistency().await.unwrap();
}

#[tokio::test]
async fn test_unknown_target_not_found() {
    let app = TestApp::new(2).await;
    app.create_user("admin@firm.test").await;
    let admin_token = app.login("admin@firm.test").await;

    let response = app
        .request(
            "POST",
            &format!("/api/admin/users/{}/force-logout", uuid::Uuid::new_v4()),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
