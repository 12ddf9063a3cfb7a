//! Embedded schema for tenants, users and sessions (`migrations/`).

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use lexdesk_core::error::{AppError, ErrorKind};

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Brings the schema up to date. Already-applied migrations are skipped.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(ErrorKind::Database, "Schema migration failed", e)
    })?;

    info!(migrations = MIGRATOR.iter().count(), "Schema up to date");
    Ok(())
}
