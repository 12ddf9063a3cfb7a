//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::UserRole;

/// A user account belonging to exactly one tenant.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Login email, unique across the system.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Human-readable name.
    pub full_name: String,
    /// Role carried as an opaque claim.
    pub role: UserRole,
    /// Whether the account may log in.
    pub is_active: bool,
    /// The user's current active session, if any. Derived from the session
    /// rows; the session's own `is_active` flag is authoritative.
    pub current_session_id: Option<Uuid>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Returns the profile safe to hand to clients.
    pub fn profile(&self) -> UserProfile {
        UserProfile::from(self)
    }

    /// Whether both users live in the same tenant.
    pub fn same_tenant(&self, other: &User) -> bool {
        self.tenant_id == other.tenant_id
    }
}

/// Sanitized user profile. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User ID.
    pub id: Uuid,
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Email address.
    pub email: String,
    /// Full name.
    pub full_name: String,
    /// Role.
    pub role: UserRole,
    /// Whether the account is active.
    pub is_active: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            tenant_id: user.tenant_id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Email address.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Full name.
    pub full_name: String,
    /// Assigned role.
    pub role: UserRole,
}
