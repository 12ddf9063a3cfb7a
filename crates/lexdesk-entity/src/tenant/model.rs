//! Tenant entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A customer organization. All other data is partitioned by tenant.
///
/// `license_used` is a cached count of the tenant's active sessions and is
/// always rewritten from the session rows, never adjusted by a delta.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tenant {
    /// Unique tenant identifier.
    pub id: Uuid,
    /// Organization name.
    pub name: String,
    /// Number of purchased concurrent licenses.
    pub license_limit: i32,
    /// Number of licenses currently held by active sessions.
    pub license_used: i32,
    /// When the tenant was created.
    pub created_at: DateTime<Utc>,
    /// When the tenant was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Tenant {
    /// Licenses still free for a new session.
    pub fn available_slots(&self) -> i32 {
        (self.license_limit - self.license_used).max(0)
    }

    /// Whether a new session may be opened.
    pub fn has_free_license(&self) -> bool {
        self.license_used < self.license_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant(limit: i32, used: i32) -> Tenant {
        Tenant {
            id: Uuid::new_v4(),
            name: "Firm".to_string(),
            license_limit: limit,
            license_used: used,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_available_slots() {
        assert_eq!(tenant(3, 1).available_slots(), 2);
        assert_eq!(tenant(2, 2).available_slots(), 0);
        assert!(tenant(2, 1).has_free_license());
        assert!(!tenant(2, 2).has_free_license());
    }
}
