//! Public authentication operations: login, logout, register and the
//! administrative session and license actions.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use lexdesk_core::error::{AppError, ErrorKind};
use lexdesk_core::result::AppResult;
use lexdesk_database::repositories::UserRepository;
use lexdesk_entity::tenant::Tenant;
use lexdesk_entity::user::{CreateUser, User, UserProfile, UserRole};

use crate::context::{AuthContext, ClientInfo};
use crate::license::LicenseInfo;
use crate::password::PasswordHasher;
use crate::session::SessionManager;

/// Registration fields.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    /// Login email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Full name.
    pub full_name: String,
    /// Requested role; defaults to staff.
    pub role: Option<UserRole>,
    /// Tenant to register into.
    pub tenant_id: Option<Uuid>,
}

/// Result of a successful login or registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthOutcome {
    /// Signed bearer credential.
    pub credential: String,
    /// Opaque session token.
    pub session_token: String,
    /// Session the credential is bound to.
    pub session_id: Uuid,
    /// Credential expiry.
    pub expires_at: DateTime<Utc>,
    /// Sanitized profile of the authenticated user.
    pub profile: UserProfile,
}

/// Composes password checks, user lookup and the session manager.
#[derive(Clone)]
pub struct AuthGateway {
    users: Arc<dyn UserRepository>,
    manager: Arc<SessionManager>,
    hasher: PasswordHasher,
    password_min_length: usize,
}

impl std::fmt::Debug for AuthGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGateway")
            .field("password_min_length", &self.password_min_length)
            .finish()
    }
}

impl AuthGateway {
    /// Creates a gateway over the session manager.
    pub fn new(
        users: Arc<dyn UserRepository>,
        manager: Arc<SessionManager>,
        password_min_length: usize,
    ) -> Self {
        Self {
            users,
            manager,
            hasher: PasswordHasher::new(),
            password_min_length,
        }
    }

    /// The underlying session manager.
    pub fn manager(&self) -> &Arc<SessionManager> {
        &self.manager
    }

    /// Authenticates by email and password and opens a session.
    ///
    /// Unknown email and wrong password both fail with `InvalidCredentials`.
    /// A deactivated account is only reported once the password matched.
    pub async fn login(&self, email: &str, password: &str, client: ClientInfo) -> AppResult<AuthOutcome> {
        let email = normalize_email(email);

        let Some(user) = self.users.find_by_email(&email).await? else {
            self.hasher.burn_verification(password);
            warn!("Login failed: invalid credentials");
            return Err(AppError::invalid_credentials());
        };

        if !self.hasher.verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "Login failed: invalid credentials");
            return Err(AppError::invalid_credentials());
        }

        if !user.is_active {
            warn!(user_id = %user.id, "Login failed: account deactivated");
            return Err(AppError::account_deactivated());
        }

        let issued = self.manager.create_session(&user, client).await?;
        info!(user_id = %user.id, session_id = %issued.session.id, "Login successful");

        Ok(AuthOutcome {
            credential: issued.credential,
            session_token: issued.session_token,
            session_id: issued.session.id,
            expires_at: issued.credential_expires_at,
            profile: user.profile(),
        })
    }

    /// Ends a session. Succeeds if it is already inactive.
    pub async fn logout(&self, session_id: Uuid) -> AppResult<()> {
        self.manager.deactivate(session_id).await?;
        info!(session_id = %session_id, "Logout");
        Ok(())
    }

    /// Creates an account and logs it in.
    ///
    /// The license check here compares the tenant's active **user** count
    /// with the limit; the session opened afterwards is subject to the usual
    /// active-session check. If that session cannot be opened the new
    /// account is removed again, so the caller can retry with the same email.
    pub async fn register(&self, input: RegisterInput, client: ClientInfo) -> AppResult<AuthOutcome> {
        let tenant_id = input.tenant_id.ok_or_else(AppError::tenant_required)?;
        let email = normalize_email(&input.email);
        let full_name = input.full_name.trim().to_string();

        if email.is_empty() || !email.contains('@') {
            return Err(AppError::validation("A valid email address is required"));
        }
        if full_name.is_empty() {
            return Err(AppError::validation("Full name is required"));
        }
        if input.password.chars().count() < self.password_min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                self.password_min_length
            )));
        }

        self.manager.counter().tenant(tenant_id).await?;
        let password_hash = self.hasher.hash_password(&input.password)?;

        let user = {
            let _guard = self.manager.tenant_locks().acquire(tenant_id).await;
            let tenant = self.manager.counter().tenant(tenant_id).await?;

            if self.users.find_by_email(&email).await?.is_some() {
                return Err(AppError::duplicate_email());
            }

            let active_users = self.users.count_active_by_tenant(tenant_id).await?;
            if active_users >= i64::from(tenant.license_limit) {
                warn!(
                    tenant_id = %tenant_id,
                    active_users,
                    license_limit = tenant.license_limit,
                    "Registration rejected: license limit reached"
                );
                return Err(AppError::license_limit_reached(tenant.license_limit));
            }

            self.users
                .create(&CreateUser {
                    tenant_id,
                    email,
                    password_hash,
                    full_name,
                    role: input.role.unwrap_or_default(),
                })
                .await?
        };
        info!(user_id = %user.id, tenant_id = %tenant_id, "User registered");

        let issued = match self.manager.create_session(&user, client).await {
            Ok(issued) => issued,
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "Registration rolled back: no session");
                if let Err(cleanup) = self.users.delete(user.id).await {
                    tracing::error!(
                        user_id = %user.id,
                        error = %cleanup,
                        "Failed to remove account after registration failure"
                    );
                }
                return Err(e);
            }
        };
        Ok(AuthOutcome {
            credential: issued.credential,
            session_token: issued.session_token,
            session_id: issued.session.id,
            expires_at: issued.credential_expires_at,
            profile: user.profile(),
        })
    }

    /// Ends every session of `target_user_id`. Both users must share a tenant.
    pub async fn force_logout(&self, acting_user_id: Uuid, target_user_id: Uuid) -> AppResult<usize> {
        let (acting, target) = self.same_tenant_pair(acting_user_id, target_user_id).await?;
        let count = self.manager.deactivate_all_for_user(target.id).await?;
        info!(
            acting_user_id = %acting.id,
            target_user_id = %target.id,
            count,
            "Force logout"
        );
        Ok(count)
    }

    /// Deactivates an account and ends its sessions.
    pub async fn deactivate_account(&self, acting_user_id: Uuid, target_user_id: Uuid) -> AppResult<()> {
        let (acting, target) = self.same_tenant_pair(acting_user_id, target_user_id).await?;
        let count = self.manager.deactivate_account(target.id).await?;
        info!(
            acting_user_id = %acting.id,
            target_user_id = %target.id,
            sessions = count,
            "Account deactivated"
        );
        Ok(())
    }

    /// License usage of a tenant with its active sessions.
    pub async fn get_license_info(&self, tenant_id: Uuid) -> AppResult<LicenseInfo> {
        self.manager.counter().license_info(tenant_id).await
    }

    /// Changes the license limit of the acting user's tenant.
    pub async fn set_license_limit(&self, acting_user_id: Uuid, tenant_id: Uuid, limit: i32) -> AppResult<Tenant> {
        let acting = self.manager.user(acting_user_id).await?;
        if acting.tenant_id != tenant_id {
            return Err(AppError::forbidden("Cannot change another tenant's license"));
        }

        let _guard = self.manager.tenant_locks().acquire(tenant_id).await;
        self.manager.counter().set_limit(tenant_id, limit).await
    }

    /// Sanitized profile of the authenticated user.
    pub async fn me(&self, ctx: &AuthContext) -> AppResult<UserProfile> {
        match self.manager.user(ctx.user_id).await {
            Ok(user) => Ok(user.profile()),
            Err(e) if e.kind == ErrorKind::NotFound => {
                Err(AppError::unauthorized("User no longer exists"))
            }
            Err(e) => Err(e),
        }
    }

    async fn same_tenant_pair(&self, acting_user_id: Uuid, target_user_id: Uuid) -> AppResult<(User, User)> {
        let acting = self.manager.user(acting_user_id).await?;
        let target = self.manager.user(target_user_id).await?;
        if !acting.same_tenant(&target) {
            warn!(
                acting_user_id = %acting.id,
                target_user_id = %target.id,
                "Cross-tenant action rejected"
            );
            return Err(AppError::forbidden("User belongs to another tenant"));
        }
        Ok((acting, target))
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
