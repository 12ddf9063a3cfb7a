//! Repository traits and their PostgreSQL implementations.
//!
//! Every mutating method is a single conditional statement (or a single
//! transaction) so concurrent callers never perform an unguarded
//! read-modify-write across two round trips.

pub mod session;
pub mod tenant;
pub mod user;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use lexdesk_core::result::AppResult;
use lexdesk_entity::session::{ActiveSessionSummary, CreateSession, DeactivatedSession, Session};
use lexdesk_entity::tenant::Tenant;
use lexdesk_entity::user::{CreateUser, User};

pub use session::PgSessionRepository;
pub use tenant::PgTenantRepository;
pub use user::PgUserRepository;

/// User lookups and the user-side fields the session core writes.
#[async_trait]
pub trait UserRepository: Send + Sync + std::fmt::Debug {
    /// Find a user by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find a user by (lowercased) email, regardless of the active flag.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert a new user. Fails with `DuplicateEmail` on a taken address.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;

    /// Count active users of a tenant.
    async fn count_active_by_tenant(&self, tenant_id: Uuid) -> AppResult<i64>;

    /// Point the user's back-reference at `session_id`.
    async fn set_current_session(&self, user_id: Uuid, session_id: Uuid) -> AppResult<()>;

    /// Clear the user's back-reference.
    ///
    /// With `Some(session_id)` the pointer is only cleared while it still
    /// names that session, so a newer login is never unlinked.
    async fn clear_current_session(&self, user_id: Uuid, session_id: Option<Uuid>)
    -> AppResult<()>;

    /// Flip the account's active flag. Returns `false` if the user is missing.
    async fn set_active(&self, user_id: Uuid, active: bool) -> AppResult<bool>;

    /// Remove a user; their sessions go with them. Returns `false` if the
    /// user is missing.
    async fn delete(&self, user_id: Uuid) -> AppResult<bool>;
}

/// Tenant license state.
#[async_trait]
pub trait TenantRepository: Send + Sync + std::fmt::Debug {
    /// Find a tenant by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Tenant>>;

    /// Rewrite `license_used` with the exact count of the tenant's active
    /// sessions and return it. `None` if the tenant does not exist.
    async fn recount_license_used(&self, id: Uuid) -> AppResult<Option<i32>>;

    /// Set `license_limit`, only if it is not below `license_used`.
    ///
    /// Returns `None` when the tenant is missing or the guard rejected it.
    async fn update_license_limit(&self, id: Uuid, limit: i32) -> AppResult<Option<Tenant>>;
}

/// Session rows and their lifecycle transitions.
#[async_trait]
pub trait SessionRepository: Send + Sync + std::fmt::Debug {
    /// Insert a new active session.
    async fn create(&self, data: &CreateSession) -> AppResult<Session>;

    /// Find a session by ID in any state.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Session>>;

    /// Find a session by ID only if it is still active.
    async fn find_active_by_id(&self, id: Uuid) -> AppResult<Option<Session>>;

    /// Find an active session by its opaque token.
    async fn find_active_by_token(&self, token: &str) -> AppResult<Option<Session>>;

    /// All active sessions of a user (normally zero or one).
    async fn find_active_by_user(&self, user_id: Uuid) -> AppResult<Vec<Session>>;

    /// Refresh `last_activity` on an active session. Returns `false` if the
    /// session was no longer active.
    async fn touch_activity(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<bool>;

    /// Flip one session to inactive. Returns `None` if it was already
    /// inactive or missing.
    async fn deactivate(&self, id: Uuid, at: DateTime<Utc>)
    -> AppResult<Option<DeactivatedSession>>;

    /// Flip every active session of a user to inactive.
    async fn deactivate_all_for_user(
        &self,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<Vec<DeactivatedSession>>;

    /// Flip every active session with `expires_at < now` to inactive.
    async fn deactivate_expired(&self, now: DateTime<Utc>) -> AppResult<Vec<DeactivatedSession>>;

    /// Active sessions of a tenant joined with their users.
    async fn list_active_by_tenant(&self, tenant_id: Uuid) -> AppResult<Vec<ActiveSessionSummary>>;
}
