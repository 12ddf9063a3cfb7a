//! Tenant repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use lexdesk_core::error::{AppError, ErrorKind};
use lexdesk_core::result::AppResult;
use lexdesk_entity::tenant::Tenant;

use super::TenantRepository;

/// PostgreSQL-backed tenant repository.
#[derive(Debug, Clone)]
pub struct PgTenantRepository {
    pool: PgPool,
}

impl PgTenantRepository {
    /// Create a new tenant repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantRepository for PgTenantRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Tenant>> {
        sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find tenant", e))
    }

    async fn recount_license_used(&self, id: Uuid) -> AppResult<Option<i32>> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE tenants t SET license_used = ( \
                 SELECT COUNT(*)::INT FROM sessions s JOIN users u ON u.id = s.user_id \
                 WHERE u.tenant_id = t.id AND s.is_active \
             ), updated_at = NOW() \
             WHERE t.id = $1 \
             RETURNING t.license_used",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to recount license usage", e)
        })
    }

    async fn update_license_limit(&self, id: Uuid, limit: i32) -> AppResult<Option<Tenant>> {
        sqlx::query_as::<_, Tenant>(
            "UPDATE tenants SET license_limit = $2, updated_at = NOW() \
             WHERE id = $1 AND license_used <= $2 RETURNING *",
        )
        .bind(id)
        .bind(limit)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update license limit", e)
        })
    }
}
