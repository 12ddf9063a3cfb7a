//! User repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use lexdesk_core::error::{AppError, ErrorKind};
use lexdesk_core::result::AppResult;
use lexdesk_entity::user::{CreateUser, User};

use super::UserRepository;

/// PostgreSQL-backed user repository.
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user", e))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by email", e)
            })
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (tenant_id, email, password_hash, full_name, role) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(data.tenant_id)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(&data.full_name)
        .bind(data.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return AppError::duplicate_email();
                }
            }
            AppError::with_source(ErrorKind::Database, "Failed to create user", e)
        })
    }

    async fn count_active_by_tenant(&self, tenant_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE tenant_id = $1 AND is_active",
        )
        .bind(tenant_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count active users", e))
    }

    async fn set_current_session(&self, user_id: Uuid, session_id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE users SET current_session_id = $2, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to set current session", e)
            })?;
        Ok(())
    }

    async fn clear_current_session(
        &self,
        user_id: Uuid,
        session_id: Option<Uuid>,
    ) -> AppResult<()> {
        let query = match session_id {
            Some(session_id) => sqlx::query(
                "UPDATE users SET current_session_id = NULL, updated_at = NOW() \
                 WHERE id = $1 AND current_session_id = $2",
            )
            .bind(user_id)
            .bind(session_id),
            None => sqlx::query(
                "UPDATE users SET current_session_id = NULL, updated_at = NOW() WHERE id = $1",
            )
            .bind(user_id),
        };

        query.execute(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to clear current session", e)
        })?;
        Ok(())
    }

    async fn set_active(&self, user_id: Uuid, active: bool) -> AppResult<bool> {
        let result =
            sqlx::query("UPDATE users SET is_active = $2, updated_at = NOW() WHERE id = $1")
                .bind(user_id)
                .bind(active)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to update user status", e)
                })?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete user", e))?;
        Ok(result.rows_affected() > 0)
    }
}
