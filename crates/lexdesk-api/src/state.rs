//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use lexdesk_auth::{AuthGateway, JwtDecoder, JwtEncoder, RequestAuthenticator, SessionManager};
use lexdesk_core::config::AppConfig;
use lexdesk_core::result::AppResult;
use lexdesk_database::DatabasePool;
use lexdesk_database::repositories::{SessionRepository, TenantRepository, UserRepository};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// PostgreSQL pool, absent when running on the in-memory store
    pub db_pool: Option<DatabasePool>,
    /// Session lifecycle manager
    pub session_manager: Arc<SessionManager>,
    /// Login, logout, register and admin operations
    pub gateway: Arc<AuthGateway>,
    /// Bearer credential guard
    pub authenticator: Arc<RequestAuthenticator>,
}

impl AppState {
    /// Wires the auth stack over the given repositories.
    ///
    /// Fails with `Configuration` when a configured lifetime is unusable.
    pub fn new(
        config: AppConfig,
        db_pool: Option<DatabasePool>,
        users: Arc<dyn UserRepository>,
        tenants: Arc<dyn TenantRepository>,
        sessions: Arc<dyn SessionRepository>,
    ) -> AppResult<Self> {
        let encoder = Arc::new(JwtEncoder::new(&config.auth)?);
        let decoder = Arc::new(JwtDecoder::new(&config.auth));

        let session_manager = Arc::new(SessionManager::new(
            Arc::clone(&users),
            tenants,
            sessions,
            encoder,
            decoder,
            &config.session,
        )?);
        let gateway = Arc::new(AuthGateway::new(
            users,
            Arc::clone(&session_manager),
            config.auth.password_min_length as usize,
        ));
        let authenticator = Arc::new(RequestAuthenticator::new(Arc::clone(&session_manager)));

        Ok(Self {
            config: Arc::new(config),
            db_pool,
            session_manager,
            gateway,
            authenticator,
        })
    }
}
