//! Session lifecycle manager: single-session and license policies.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use lexdesk_core::config::SessionConfig;
use lexdesk_core::error::AppError;
use lexdesk_core::result::AppResult;
use lexdesk_database::repositories::{SessionRepository, TenantRepository, UserRepository};
use lexdesk_entity::session::{CreateSession, DeactivatedSession, Session};
use lexdesk_entity::tenant::Tenant;
use lexdesk_entity::user::User;

use crate::context::{AuthContext, ClientInfo};
use crate::jwt::{JwtDecoder, JwtEncoder};
use crate::license::{LicenseCounter, TenantLocks};

use super::token::generate_session_token;

/// A freshly created session with both of its tokens.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    /// The stored session row.
    pub session: Session,
    /// Opaque session token.
    pub session_token: String,
    /// Signed bearer credential bound to the session.
    pub credential: String,
    /// Credential expiry.
    pub credential_expires_at: DateTime<Utc>,
}

/// The owner of a session resolved by its opaque token.
#[derive(Debug, Clone)]
pub struct SessionOwner {
    /// The session.
    pub session: Session,
    /// Its user.
    pub user: User,
    /// The user's tenant.
    pub tenant: Tenant,
}

/// Outcome of one expiry sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Sessions flipped to inactive.
    pub sessions: usize,
    /// Distinct tenants recounted.
    pub tenants: usize,
}

/// Orchestrates session rows and the license counter.
///
/// Per session the state machine is `ACTIVE -> (EXPIRED | DEACTIVATED)`;
/// inactive sessions are never reactivated.
#[derive(Clone)]
pub struct SessionManager {
    users: Arc<dyn UserRepository>,
    tenants: Arc<dyn TenantRepository>,
    sessions: Arc<dyn SessionRepository>,
    counter: LicenseCounter,
    locks: TenantLocks,
    encoder: Arc<JwtEncoder>,
    decoder: Arc<JwtDecoder>,
    session_ttl: Duration,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("session_ttl", &self.session_ttl)
            .finish()
    }
}

impl SessionManager {
    /// Creates a new session manager with all required dependencies.
    pub fn new(
        users: Arc<dyn UserRepository>,
        tenants: Arc<dyn TenantRepository>,
        sessions: Arc<dyn SessionRepository>,
        encoder: Arc<JwtEncoder>,
        decoder: Arc<JwtDecoder>,
        config: &SessionConfig,
    ) -> AppResult<Self> {
        let seconds = config.ttl_seconds()?;
        let session_ttl = Duration::try_seconds(seconds).ok_or_else(|| {
            AppError::configuration(format!("Session TTL of {seconds}s is out of range"))
        })?;

        let counter = LicenseCounter::new(Arc::clone(&tenants), Arc::clone(&sessions));
        Ok(Self {
            users,
            tenants,
            sessions,
            counter,
            locks: TenantLocks::new(),
            encoder,
            decoder,
            session_ttl,
        })
    }

    /// The license counter shared with this manager.
    pub fn counter(&self) -> &LicenseCounter {
        &self.counter
    }

    /// The per-tenant locks shared with this manager.
    pub fn tenant_locks(&self) -> &TenantLocks {
        &self.locks
    }

    /// Opens a session for `user` and signs a credential bound to it.
    ///
    /// Fails with `AccountDeactivated` if the account is inactive (or gone)
    /// once the tenant lock is held, with `ConflictActiveSession` if the user
    /// already holds a non-expired active session, and with
    /// `LicenseLimitReached` if every license of the tenant is in use. An
    /// active session that has already expired is deactivated first and
    /// does not block the login.
    pub async fn create_session(&self, user: &User, client: ClientInfo) -> AppResult<IssuedSession> {
        let _guard = self.locks.acquire(user.tenant_id).await;
        let now = Utc::now();

        // The caller's copy may predate a deactivation; decide on the stored row.
        let user = match self.users.find_by_id(user.id).await? {
            Some(current) if current.is_active => current,
            _ => {
                warn!(user_id = %user.id, "Login rejected: account deactivated");
                return Err(AppError::account_deactivated());
            }
        };
        let user = &user;

        for existing in self.sessions.find_active_by_user(user.id).await? {
            if !existing.is_expired_at(now) {
                warn!(
                    user_id = %user.id,
                    session_id = %existing.id,
                    "Login rejected: user already has an active session"
                );
                return Err(AppError::conflict_active_session());
            }
            debug!(session_id = %existing.id, "Reaping expired session before login");
            self.deactivate_locked(existing.id, now).await?;
        }

        let used = self.counter.recount(user.tenant_id).await?;
        let tenant = self.counter.tenant(user.tenant_id).await?;
        if used >= tenant.license_limit {
            warn!(
                user_id = %user.id,
                tenant_id = %tenant.id,
                license_used = used,
                license_limit = tenant.license_limit,
                "Login rejected: license limit reached"
            );
            return Err(AppError::license_limit_reached(tenant.license_limit));
        }

        let session_id = Uuid::new_v4();
        let (credential, credential_expires_at) =
            self.encoder.sign_for_session(user, session_id, now)?;
        let session_token = generate_session_token();

        let session = self
            .sessions
            .create(&CreateSession {
                id: session_id,
                user_id: user.id,
                session_token: session_token.clone(),
                ip_address: client.ip_address,
                user_agent: client.user_agent,
                created_at: now,
                expires_at: now + self.session_ttl,
            })
            .await?;

        self.users.set_current_session(user.id, session.id).await?;
        let used = self.counter.recount(user.tenant_id).await?;

        info!(
            user_id = %user.id,
            tenant_id = %user.tenant_id,
            session_id = %session.id,
            license_used = used,
            license_limit = tenant.license_limit,
            "Session created"
        );

        Ok(IssuedSession {
            session,
            session_token,
            credential,
            credential_expires_at,
        })
    }

    /// Resolves an opaque session token to its session, user and tenant.
    ///
    /// Returns `None` for unknown or inactive tokens. An expired session is
    /// deactivated and `None` returned; otherwise `last_activity` is touched.
    pub async fn validate_by_token(&self, session_token: &str) -> AppResult<Option<SessionOwner>> {
        let Some(session) = self.sessions.find_active_by_token(session_token).await? else {
            return Ok(None);
        };

        let now = Utc::now();
        if session.is_expired_at(now) {
            self.deactivate(session.id).await?;
            return Ok(None);
        }

        if !self.sessions.touch_activity(session.id, now).await? {
            return Ok(None);
        }

        let Some(user) = self.users.find_by_id(session.user_id).await? else {
            return Ok(None);
        };
        let tenant = self.counter.tenant(user.tenant_id).await?;

        Ok(Some(SessionOwner {
            session,
            user,
            tenant,
        }))
    }

    /// Verifies a bearer credential and the session it is bound to.
    ///
    /// Fails with `InvalidToken`, `SessionInactive` or `SessionExpired`. On
    /// the first validation after expiry the session is deactivated.
    pub async fn validate_by_credential(&self, credential: &str) -> AppResult<AuthContext> {
        let claims = self.decoder.verify(credential)?;

        let session = self
            .sessions
            .find_active_by_id(claims.sid)
            .await?
            .ok_or_else(AppError::session_inactive)?;

        if session.user_id != claims.sub {
            warn!(
                session_id = %session.id,
                claimed_user = %claims.sub,
                "Credential subject does not own its session"
            );
            return Err(AppError::session_inactive());
        }

        let now = Utc::now();
        if session.is_expired_at(now) {
            self.deactivate(session.id).await?;
            return Err(AppError::session_expired());
        }

        if !self.sessions.touch_activity(session.id, now).await? {
            return Err(AppError::session_inactive());
        }

        Ok(AuthContext::from(claims))
    }

    /// Deactivates one session. Succeeds when the session is already
    /// inactive or unknown.
    pub async fn deactivate(&self, session_id: Uuid) -> AppResult<()> {
        let Some(session) = self.sessions.find_by_id(session_id).await? else {
            return Ok(());
        };
        if !session.is_active {
            return Ok(());
        }
        let Some(user) = self.users.find_by_id(session.user_id).await? else {
            return Ok(());
        };

        let _guard = self.locks.acquire(user.tenant_id).await;
        self.deactivate_locked(session_id, Utc::now()).await?;
        Ok(())
    }

    /// Deactivates every active session of a user, clearing the
    /// back-reference and recounting once.
    ///
    /// Returns the number of sessions flipped.
    pub async fn deactivate_all_for_user(&self, user_id: Uuid) -> AppResult<usize> {
        let Some(user) = self.users.find_by_id(user_id).await? else {
            return Ok(0);
        };

        let _guard = self.locks.acquire(user.tenant_id).await;
        let flipped = self
            .sessions
            .deactivate_all_for_user(user_id, Utc::now())
            .await?;
        self.users.clear_current_session(user_id, None).await?;
        let used = self.counter.recount(user.tenant_id).await?;

        if !flipped.is_empty() {
            info!(
                user_id = %user_id,
                tenant_id = %user.tenant_id,
                count = flipped.len(),
                license_used = used,
                "All sessions of user deactivated"
            );
        }
        Ok(flipped.len())
    }

    /// Marks the account inactive and ends every session it holds.
    ///
    /// Both writes happen under the tenant lock, so a login racing this call
    /// either finishes first and has its session ended here, or observes the
    /// inactive account. Returns the number of sessions flipped.
    pub async fn deactivate_account(&self, user_id: Uuid) -> AppResult<usize> {
        let user = self.user(user_id).await?;

        let _guard = self.locks.acquire(user.tenant_id).await;
        if !self.users.set_active(user_id, false).await? {
            return Err(AppError::not_found("User not found"));
        }
        let flipped = self
            .sessions
            .deactivate_all_for_user(user_id, Utc::now())
            .await?;
        self.users.clear_current_session(user_id, None).await?;
        let used = self.counter.recount(user.tenant_id).await?;

        info!(
            user_id = %user_id,
            tenant_id = %user.tenant_id,
            count = flipped.len(),
            license_used = used,
            "Account deactivated and sessions ended"
        );
        Ok(flipped.len())
    }

    /// Deactivates every active session past its expiry and recounts each
    /// affected tenant once.
    pub async fn sweep_expired(&self) -> AppResult<SweepReport> {
        let flipped = self.sessions.deactivate_expired(Utc::now()).await?;
        if flipped.is_empty() {
            return Ok(SweepReport::default());
        }

        for entry in &flipped {
            self.users
                .clear_current_session(entry.user_id, Some(entry.session_id))
                .await?;
        }

        let tenants: BTreeSet<Uuid> = flipped.iter().map(|d| d.tenant_id).collect();
        for tenant_id in &tenants {
            let _guard = self.locks.acquire(*tenant_id).await;
            self.counter.recount(*tenant_id).await?;
        }

        let report = SweepReport {
            sessions: flipped.len(),
            tenants: tenants.len(),
        };
        info!(
            sessions = report.sessions,
            tenants = report.tenants,
            "Expired sessions swept"
        );
        Ok(report)
    }

    /// Looks up a user, failing with `NotFound`.
    pub async fn user(&self, user_id: Uuid) -> AppResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Flip, unlink and recount. The caller holds the tenant lock.
    async fn deactivate_locked(
        &self,
        session_id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<Option<DeactivatedSession>> {
        let Some(flipped) = self.sessions.deactivate(session_id, at).await? else {
            return Ok(None);
        };

        self.users
            .clear_current_session(flipped.user_id, Some(flipped.session_id))
            .await?;
        let used = self.counter.recount(flipped.tenant_id).await?;

        info!(
            session_id = %flipped.session_id,
            user_id = %flipped.user_id,
            tenant_id = %flipped.tenant_id,
            license_used = used,
            "Session deactivated"
        );
        Ok(Some(flipped))
    }
}
