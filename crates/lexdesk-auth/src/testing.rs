//! Shared fixtures for unit tests.

use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use lexdesk_core::config::{AuthConfig, SessionConfig};
use lexdesk_database::MemoryStore;
use lexdesk_database::repositories::{SessionRepository, TenantRepository, UserRepository};
use lexdesk_entity::session::{CreateSession, Session};
use lexdesk_entity::tenant::Tenant;
use lexdesk_entity::user::{CreateUser, User, UserRole};

use crate::gateway::AuthGateway;
use crate::jwt::{JwtDecoder, JwtEncoder};
use crate::password::PasswordHasher;
use crate::session::{SessionManager, generate_session_token};

pub(crate) const PASSWORD: &str = "password123";

/// Argon2 is slow in debug builds, so the fixture password is hashed once.
fn password_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| {
        PasswordHasher::new()
            .hash_password(PASSWORD)
            .expect("hash fixture password")
    })
}

pub(crate) struct Fixture {
    pub store: MemoryStore,
    pub manager: Arc<SessionManager>,
    pub gateway: AuthGateway,
    pub tenant: Tenant,
}

impl Fixture {
    pub async fn new(license_limit: i32) -> Self {
        let store = MemoryStore::new();
        let tenant = store.insert_tenant("Firm", license_limit).await;

        let auth = AuthConfig {
            jwt_secret: "unit-test-secret".to_string(),
            ..AuthConfig::default()
        };
        let users: Arc<dyn UserRepository> = Arc::new(store.clone());
        let tenants: Arc<dyn TenantRepository> = Arc::new(store.clone());
        let sessions: Arc<dyn SessionRepository> = Arc::new(store.clone());

        let manager = Arc::new(SessionManager::new(
            Arc::clone(&users),
            tenants,
            sessions,
            Arc::new(JwtEncoder::new(&auth).unwrap()),
            Arc::new(JwtDecoder::new(&auth)),
            &SessionConfig::default(),
        )
        .unwrap());
        let gateway = AuthGateway::new(users, Arc::clone(&manager), auth.password_min_length as usize);

        Self {
            store,
            manager,
            gateway,
            tenant,
        }
    }

    pub async fn user(&self, email: &str) -> User {
        self.user_in(self.tenant.id, email).await
    }

    pub async fn user_in(&self, tenant_id: Uuid, email: &str) -> User {
        UserRepository::create(
            &self.store,
            &CreateUser {
                tenant_id,
                email: email.to_string(),
                password_hash: password_hash().to_string(),
                full_name: email.to_string(),
                role: UserRole::Lawyer,
            },
        )
        .await
        .expect("create user")
    }

    pub async fn license_used(&self) -> i32 {
        TenantRepository::find_by_id(&self.store, self.tenant.id)
            .await
            .unwrap()
            .unwrap()
            .license_used
    }

    pub async fn store_session(&self, id: Uuid) -> Session {
        SessionRepository::find_by_id(&self.store, id)
            .await
            .unwrap()
            .unwrap()
    }

    /// Writes an active session row without going through the manager.
    pub async fn insert_raw_session(&self, user: &User, expires_at: DateTime<Utc>) -> Session {
        SessionRepository::create(
            &self.store,
            &CreateSession {
                id: Uuid::new_v4(),
                user_id: user.id,
                session_token: generate_session_token(),
                ip_address: None,
                user_agent: None,
                created_at: Utc::now(),
                expires_at,
            },
        )
        .await
        .expect("insert raw session")
    }
}
