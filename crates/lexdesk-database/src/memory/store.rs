//! In-memory store using a Tokio mutex for single-node deployments and tests.
//!
//! One mutex guards all three tables, so every trait method is atomic with
//! respect to every other, matching the single-statement guarantees of the
//! PostgreSQL repositories.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use lexdesk_core::error::AppError;
use lexdesk_core::result::AppResult;
use lexdesk_entity::session::{ActiveSessionSummary, CreateSession, DeactivatedSession, Session};
use lexdesk_entity::tenant::Tenant;
use lexdesk_entity::user::{CreateUser, User};

use crate::repositories::{SessionRepository, TenantRepository, UserRepository};

#[derive(Debug, Default)]
struct Tables {
    tenants: HashMap<Uuid, Tenant>,
    users: HashMap<Uuid, User>,
    sessions: HashMap<Uuid, Session>,
}

impl Tables {
    fn tenant_of(&self, user_id: Uuid) -> Option<Uuid> {
        self.users.get(&user_id).map(|u| u.tenant_id)
    }

    fn active_sessions_of_tenant(&self, tenant_id: Uuid) -> i32 {
        self.sessions
            .values()
            .filter(|s| s.is_active && self.tenant_of(s.user_id) == Some(tenant_id))
            .count() as i32
    }

    /// Flips every active session matching `pred` and reports it.
    fn deactivate_where(
        &mut self,
        at: DateTime<Utc>,
        pred: impl Fn(&Session) -> bool,
    ) -> Vec<DeactivatedSession> {
        let users = &self.users;
        let mut flipped = Vec::new();
        for session in self.sessions.values_mut() {
            if !session.is_active || !pred(session) {
                continue;
            }
            let Some(user) = users.get(&session.user_id) else {
                continue;
            };
            session.is_active = false;
            session.updated_at = at;
            flipped.push(DeactivatedSession {
                session_id: session.id,
                user_id: session.user_id,
                tenant_id: user.tenant_id,
            });
        }
        flipped
    }
}

/// Mutex-guarded in-memory implementation of every repository trait.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a tenant. Tenant administration lives outside the session
    /// core, so this is the only way to seed one.
    pub async fn insert_tenant(&self, name: &str, license_limit: i32) -> Tenant {
        let now = Utc::now();
        let tenant = Tenant {
            id: Uuid::new_v4(),
            name: name.to_string(),
            license_limit,
            license_used: 0,
            created_at: now,
            updated_at: now,
        };
        self.tables
            .lock()
            .await
            .tenants
            .insert(tenant.id, tenant.clone());
        debug!(tenant_id = %tenant.id, license_limit, "Tenant inserted");
        tenant
    }

    /// Moves a session's expiry, e.g. into the past.
    pub async fn set_session_expiry(&self, session_id: Uuid, expires_at: DateTime<Utc>) -> bool {
        match self.tables.lock().await.sessions.get_mut(&session_id) {
            Some(session) => {
                session.expires_at = expires_at;
                true
            }
            None => false,
        }
    }

    /// Overwrites the cached `license_used` value without recounting.
    pub async fn set_license_used(&self, tenant_id: Uuid, used: i32) -> bool {
        match self.tables.lock().await.tenants.get_mut(&tenant_id) {
            Some(tenant) => {
                tenant.license_used = used;
                true
            }
            None => false,
        }
    }

    /// Checks the derived state against the session rows.
    ///
    /// Every user's back-reference must name an active session of that user
    /// (or be empty while the user has none), no user may hold two active
    /// sessions, and every tenant's `license_used` must equal its active
    /// session count.
    pub async fn check_consistency(&self) -> Result<(), String> {
        let tables = self.tables.lock().await;

        for user in tables.users.values() {
            let active: Vec<&Session> = tables
                .sessions
                .values()
                .filter(|s| s.user_id == user.id && s.is_active)
                .collect();

            if active.len() > 1 {
                return Err(format!("user {} has {} active sessions", user.id, active.len()));
            }

            match (user.current_session_id, active.first()) {
                (None, None) => {}
                (Some(current), Some(session)) if current == session.id => {}
                (current, session) => {
                    return Err(format!(
                        "user {} back-reference {:?} disagrees with active session {:?}",
                        user.id,
                        current,
                        session.map(|s| s.id)
                    ));
                }
            }
        }

        for tenant in tables.tenants.values() {
            let actual = tables.active_sessions_of_tenant(tenant.id);
            if tenant.license_used != actual {
                return Err(format!(
                    "tenant {} license_used {} but {} active sessions",
                    tenant.id, tenant.license_used, actual
                ));
            }
        }

        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.tables.lock().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .tables
            .lock()
            .await
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let mut tables = self.tables.lock().await;

        if !tables.tenants.contains_key(&data.tenant_id) {
            return Err(AppError::not_found("Tenant not found"));
        }
        if tables.users.values().any(|u| u.email == data.email) {
            return Err(AppError::duplicate_email());
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            tenant_id: data.tenant_id,
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            full_name: data.full_name.clone(),
            role: data.role,
            is_active: true,
            current_session_id: None,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn count_active_by_tenant(&self, tenant_id: Uuid) -> AppResult<i64> {
        Ok(self
            .tables
            .lock()
            .await
            .users
            .values()
            .filter(|u| u.tenant_id == tenant_id && u.is_active)
            .count() as i64)
    }

    async fn set_current_session(&self, user_id: Uuid, session_id: Uuid) -> AppResult<()> {
        if let Some(user) = self.tables.lock().await.users.get_mut(&user_id) {
            user.current_session_id = Some(session_id);
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn clear_current_session(
        &self,
        user_id: Uuid,
        session_id: Option<Uuid>,
    ) -> AppResult<()> {
        if let Some(user) = self.tables.lock().await.users.get_mut(&user_id) {
            let matches = session_id.is_none() || user.current_session_id == session_id;
            if matches {
                user.current_session_id = None;
                user.updated_at = Utc::now();
            }
        }
        Ok(())
    }

    async fn set_active(&self, user_id: Uuid, active: bool) -> AppResult<bool> {
        match self.tables.lock().await.users.get_mut(&user_id) {
            Some(user) => {
                user.is_active = active;
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, user_id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.lock().await;
        tables.sessions.retain(|_, s| s.user_id != user_id);
        Ok(tables.users.remove(&user_id).is_some())
    }
}

#[async_trait]
impl TenantRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Tenant>> {
        Ok(self.tables.lock().await.tenants.get(&id).cloned())
    }

    async fn recount_license_used(&self, id: Uuid) -> AppResult<Option<i32>> {
        let mut tables = self.tables.lock().await;
        let count = tables.active_sessions_of_tenant(id);
        Ok(tables.tenants.get_mut(&id).map(|tenant| {
            tenant.license_used = count;
            tenant.updated_at = Utc::now();
            count
        }))
    }

    async fn update_license_limit(&self, id: Uuid, limit: i32) -> AppResult<Option<Tenant>> {
        let mut tables = self.tables.lock().await;
        Ok(tables.tenants.get_mut(&id).and_then(|tenant| {
            if tenant.license_used > limit {
                return None;
            }
            tenant.license_limit = limit;
            tenant.updated_at = Utc::now();
            Some(tenant.clone())
        }))
    }
}

#[async_trait]
impl SessionRepository for MemoryStore {
    async fn create(&self, data: &CreateSession) -> AppResult<Session> {
        let mut tables = self.tables.lock().await;

        if !tables.users.contains_key(&data.user_id) {
            return Err(AppError::not_found("User not found"));
        }
        if tables
            .sessions
            .values()
            .any(|s| s.session_token == data.session_token)
        {
            return Err(AppError::database("Duplicate session token"));
        }

        let session = Session {
            id: data.id,
            user_id: data.user_id,
            session_token: data.session_token.clone(),
            ip_address: data.ip_address.clone(),
            user_agent: data.user_agent.clone(),
            is_active: true,
            last_activity: data.created_at,
            expires_at: data.expires_at,
            created_at: data.created_at,
            updated_at: data.created_at,
        };
        tables.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Session>> {
        Ok(self.tables.lock().await.sessions.get(&id).cloned())
    }

    async fn find_active_by_id(&self, id: Uuid) -> AppResult<Option<Session>> {
        Ok(self
            .tables
            .lock()
            .await
            .sessions
            .get(&id)
            .filter(|s| s.is_active)
            .cloned())
    }

    async fn find_active_by_token(&self, token: &str) -> AppResult<Option<Session>> {
        Ok(self
            .tables
            .lock()
            .await
            .sessions
            .values()
            .find(|s| s.is_active && s.session_token == token)
            .cloned())
    }

    async fn find_active_by_user(&self, user_id: Uuid) -> AppResult<Vec<Session>> {
        let tables = self.tables.lock().await;
        let mut sessions: Vec<Session> = tables
            .sessions
            .values()
            .filter(|s| s.is_active && s.user_id == user_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions)
    }

    async fn touch_activity(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<bool> {
        match self.tables.lock().await.sessions.get_mut(&id) {
            Some(session) if session.is_active => {
                session.last_activity = at;
                session.updated_at = at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn deactivate(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<Option<DeactivatedSession>> {
        let mut tables = self.tables.lock().await;
        Ok(tables.deactivate_where(at, |s| s.id == id).into_iter().next())
    }

    async fn deactivate_all_for_user(
        &self,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<Vec<DeactivatedSession>> {
        let mut tables = self.tables.lock().await;
        Ok(tables.deactivate_where(at, |s| s.user_id == user_id))
    }

    async fn deactivate_expired(&self, now: DateTime<Utc>) -> AppResult<Vec<DeactivatedSession>> {
        let mut tables = self.tables.lock().await;
        Ok(tables.deactivate_where(now, |s| s.expires_at < now))
    }

    async fn list_active_by_tenant(&self, tenant_id: Uuid) -> AppResult<Vec<ActiveSessionSummary>> {
        let tables = self.tables.lock().await;
        let mut summaries: Vec<ActiveSessionSummary> = tables
            .sessions
            .values()
            .filter(|s| s.is_active)
            .filter_map(|s| {
                let user = tables.users.get(&s.user_id)?;
                (user.tenant_id == tenant_id).then(|| ActiveSessionSummary {
                    session_id: s.id,
                    user_id: user.id,
                    email: user.email.clone(),
                    full_name: user.full_name.clone(),
                    last_activity: s.last_activity,
                    ip_address: s.ip_address.clone(),
                })
            })
            .collect();
        summaries.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
        Ok(summaries)
    }
}
