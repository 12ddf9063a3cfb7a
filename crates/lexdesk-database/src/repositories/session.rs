//! Session repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use lexdesk_core::error::{AppError, ErrorKind};
use lexdesk_core::result::AppResult;
use lexdesk_entity::session::{ActiveSessionSummary, CreateSession, DeactivatedSession, Session};

use super::SessionRepository;

/// PostgreSQL-backed session repository.
#[derive(Debug, Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn create(&self, data: &CreateSession) -> AppResult<Session> {
        sqlx::query_as::<_, Session>(
            "INSERT INTO sessions (id, user_id, session_token, ip_address, user_agent, is_active, \
             last_activity, expires_at, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, TRUE, $6, $7, $6, $6) RETURNING *",
        )
        .bind(data.id)
        .bind(data.user_id)
        .bind(&data.session_token)
        .bind(&data.ip_address)
        .bind(&data.user_agent)
        .bind(data.created_at)
        .bind(data.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create session", e))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find session", e))
    }

    async fn find_active_by_id(&self, id: Uuid) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = $1 AND is_active")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find active session", e)
            })
    }

    async fn find_active_by_token(&self, token: &str) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE session_token = $1 AND is_active",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find session by token", e)
        })
    }

    async fn find_active_by_user(&self, user_id: Uuid) -> AppResult<Vec<Session>> {
        sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE user_id = $1 AND is_active ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find active sessions", e)
        })
    }

    async fn touch_activity(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE sessions SET last_activity = $2, updated_at = $2 WHERE id = $1 AND is_active",
        )
        .bind(id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update last activity", e)
        })?;
        Ok(result.rows_affected() > 0)
    }

    async fn deactivate(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<Option<DeactivatedSession>> {
        sqlx::query_as::<_, DeactivatedSession>(
            "UPDATE sessions s SET is_active = FALSE, updated_at = $2 \
             FROM users u \
             WHERE s.id = $1 AND s.is_active AND u.id = s.user_id \
             RETURNING s.id AS session_id, s.user_id, u.tenant_id",
        )
        .bind(id)
        .bind(at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to deactivate session", e))
    }

    async fn deactivate_all_for_user(
        &self,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<Vec<DeactivatedSession>> {
        sqlx::query_as::<_, DeactivatedSession>(
            "UPDATE sessions s SET is_active = FALSE, updated_at = $2 \
             FROM users u \
             WHERE s.user_id = $1 AND s.is_active AND u.id = s.user_id \
             RETURNING s.id AS session_id, s.user_id, u.tenant_id",
        )
        .bind(user_id)
        .bind(at)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to deactivate user sessions", e)
        })
    }

    async fn deactivate_expired(&self, now: DateTime<Utc>) -> AppResult<Vec<DeactivatedSession>> {
        sqlx::query_as::<_, DeactivatedSession>(
            "UPDATE sessions s SET is_active = FALSE, updated_at = $1 \
             FROM users u \
             WHERE s.is_active AND s.expires_at < $1 AND u.id = s.user_id \
             RETURNING s.id AS session_id, s.user_id, u.tenant_id",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to deactivate expired sessions", e)
        })
    }

    async fn list_active_by_tenant(&self, tenant_id: Uuid) -> AppResult<Vec<ActiveSessionSummary>> {
        sqlx::query_as::<_, ActiveSessionSummary>(
            "SELECT s.id AS session_id, s.user_id, u.email, u.full_name, s.last_activity, s.ip_address \
             FROM sessions s JOIN users u ON u.id = s.user_id \
             WHERE u.tenant_id = $1 AND s.is_active \
             ORDER BY s.last_activity DESC",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list tenant sessions", e)
        })
    }
}
