//! Claims carried by a bearer credential.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lexdesk_entity::user::{User, UserRole};

/// JWT claims payload embedded in every bearer credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID.
    pub sub: Uuid,
    /// User email.
    pub email: String,
    /// User role, carried opaquely.
    pub role: UserRole,
    /// Tenant ID.
    pub tid: Uuid,
    /// Session this credential is bound to.
    pub sid: Uuid,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Builds claims for `user` bound to `session_id`, valid for `ttl` from `issued_at`.
    pub fn for_session(user: &User, session_id: Uuid, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            tid: user.tenant_id,
            sid: session_id,
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }

    /// Returns the user ID from the subject claim.
    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the session ID.
    pub fn session_id(&self) -> Uuid {
        self.sid
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}
