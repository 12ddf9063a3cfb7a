//! LexDesk Server: session and license management.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use lexdesk_api::AppState;
use lexdesk_core::config::{AppConfig, AuthConfig};
use lexdesk_core::error::AppError;
use lexdesk_database::repositories::{PgSessionRepository, PgTenantRepository, PgUserRepository};
use lexdesk_database::DatabasePool;
use lexdesk_worker::{CronScheduler, SessionSweepJob};

#[tokio::main]
async fn main() {
    let env = std::env::var("LEXDESK_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting LexDesk v{}", env!("CARGO_PKG_VERSION"));

    if config.auth.jwt_secret == AuthConfig::default().jwt_secret {
        tracing::warn!("auth.jwt_secret is the built-in default; set LEXDESK__AUTH__JWT_SECRET");
    }

    // ── Step 1: Database connection + migrations ─────────────────
    let db_pool = DatabasePool::connect(&config.database).await?;
    db_pool.migrate().await?;

    // ── Step 2: Repositories + auth stack ────────────────────────
    let users = Arc::new(PgUserRepository::new(db_pool.pool().clone()));
    let tenants = Arc::new(PgTenantRepository::new(db_pool.pool().clone()));
    let sessions = Arc::new(PgSessionRepository::new(db_pool.pool().clone()));

    let state = AppState::new(config.clone(), Some(db_pool.clone()), users, tenants, sessions)?;

    // ── Step 3: Shutdown channel & scheduler ─────────────────────
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let scheduler_handle = if config.worker.enabled {
        let mut scheduler = CronScheduler::new().await?;
        scheduler
            .register_session_sweep(
                &config.session.sweep_cron,
                SessionSweepJob::new(Arc::clone(&state.session_manager)),
            )
            .await?;
        scheduler.start().await?;

        Some(tokio::spawn(async move {
            let _ = shutdown_rx.changed().await;
            if let Err(e) = scheduler.shutdown().await {
                tracing::error!("Scheduler shutdown failed: {}", e);
            }
        }))
    } else {
        tracing::info!("Worker disabled; expired sessions are reaped on validation only");
        None
    };

    // ── Step 4: HTTP server ──────────────────────────────────────
    let app = lexdesk_api::build_app(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);

    lexdesk_api::serve(app, &addr, async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    })
    .await?;

    if let Some(handle) = scheduler_handle {
        let _ = handle.await;
    }
    db_pool.close().await;

    tracing::info!("LexDesk stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
