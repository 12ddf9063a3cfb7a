//! Shared test helpers for integration tests.

use std::sync::{Arc, OnceLock};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use lexdesk_api::AppState;
use lexdesk_auth::PasswordHasher;
use lexdesk_core::config::AppConfig;
use lexdesk_database::MemoryStore;
use lexdesk_database::repositories::UserRepository;
use lexdesk_entity::tenant::Tenant;
use lexdesk_entity::user::{CreateUser, User, UserRole};

pub const PASSWORD: &str = "password123";

fn password_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| {
        PasswordHasher::new()
            .hash_password(PASSWORD)
            .expect("Failed to hash test password")
    })
}

/// Response captured from a oneshot request
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    /// The `data` field of a success envelope
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// The `error` code of an error body
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum app for making test requests
    pub router: Router,
    /// Backing store for direct inspection
    pub store: MemoryStore,
    /// Tenant created for the test
    pub tenant: Tenant,
}

impl TestApp {
    /// Create a new test application with one tenant
    pub async fn new(license_limit: i32) -> Self {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "integration-test-secret".to_string();

        let store = MemoryStore::new();
        let tenant = store.insert_tenant("Test Firm", license_limit).await;

        let state = AppState::new(
            config,
            None,
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
        )
        .expect("Failed to build app state");

        Self {
            router: lexdesk_api::build_app(state),
            store,
            tenant,
        }
    }

    /// Insert a user directly into the store
    pub async fn create_user(&self, email: &str) -> User {
        self.create_user_in(self.tenant.id, email).await
    }

    /// Insert a user into a specific tenant
    pub async fn create_user_in(&self, tenant_id: Uuid, email: &str) -> User {
        UserRepository::create(
            &self.store,
            &CreateUser {
                tenant_id,
                email: email.to_string(),
                password_hash: password_hash().to_string(),
                full_name: email.to_string(),
                role: UserRole::Admin,
            },
        )
        .await
        .expect("Failed to create test user")
    }

    /// Send a request through the router
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-forwarded-for", "198.51.100.4")
            .header("user-agent", "lexdesk-tests");

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .expect("Failed to build request"),
            None => builder.body(Body::empty()).expect("Failed to build request"),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Log in and return the full response
    pub async fn login_response(&self, email: &str) -> TestResponse {
        self.request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({ "email": email, "password": PASSWORD })),
            None,
        )
        .await
    }

    /// Log in and return the bearer credential
    pub async fn login(&self, email: &str) -> String {
        let response = self.login_response(email).await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.body);
        response.data()["access_token"]
            .as_str()
            .expect("access_token missing")
            .to_string()
    }

    /// Current license usage of the test tenant
    pub async fn license_used(&self) -> i32 {
        lexdesk_database::TenantRepository::find_by_id(&self.store, self.tenant.id)
            .await
            .expect("tenant lookup")
            .expect("tenant exists")
            .license_used
    }
}
