//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One authenticated login of one user.
///
/// Sessions are soft-deactivated: `is_active` flips to `false` on logout,
/// forced logout, expiry detection, or account deactivation, and never
/// flips back.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Unique session identifier, embedded in the bearer credential.
    pub id: Uuid,
    /// The user this session belongs to.
    pub user_id: Uuid,
    /// Opaque random token for lookups that bypass the bearer credential.
    #[serde(skip_serializing)]
    pub session_token: String,
    /// Client IP address at login.
    pub ip_address: Option<String>,
    /// Client User-Agent at login.
    pub user_agent: Option<String>,
    /// Whether the session still holds a license.
    pub is_active: bool,
    /// Last authenticated request or revalidation.
    pub last_activity: DateTime<Utc>,
    /// Absolute expiry (creation + TTL).
    pub expires_at: DateTime<Utc>,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// When the session row was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session passed its expiry at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Whether the session is active and not expired.
    pub fn is_live(&self) -> bool {
        self.is_active && !self.is_expired_at(Utc::now())
    }
}

/// Data required to create a new session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSession {
    /// Pre-generated session ID.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Opaque session token.
    pub session_token: String,
    /// Client IP address.
    pub ip_address: Option<String>,
    /// Client User-Agent.
    pub user_agent: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Expiry timestamp.
    pub expires_at: DateTime<Utc>,
}

/// A session flipped to inactive by a conditional update, with the tenant
/// whose license counter must be recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DeactivatedSession {
    /// The session that was deactivated.
    pub session_id: Uuid,
    /// Its owning user.
    pub user_id: Uuid,
    /// The user's tenant.
    pub tenant_id: Uuid,
}

/// Active session joined with its user, for the license overview.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActiveSessionSummary {
    /// Session ID.
    pub session_id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// User email.
    pub email: String,
    /// User full name.
    pub full_name: String,
    /// Last activity on the session.
    pub last_activity: DateTime<Utc>,
    /// Client IP address at login.
    pub ip_address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_expiry_is_strictly_past() {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            session_token: "t".to_string(),
            ip_address: None,
            user_agent: None,
            is_active: true,
            last_activity: now,
            expires_at: now,
            created_at: now - Duration::hours(24),
            updated_at: now,
        };
        assert!(!session.is_expired_at(now));
        assert!(session.is_expired_at(now + Duration::seconds(1)));
    }
}
