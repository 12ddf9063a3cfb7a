//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lexdesk_auth::gateway::AuthOutcome;
use lexdesk_entity::user::UserProfile;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Login and registration response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Bearer credential.
    pub access_token: String,
    /// Opaque session token.
    pub session_token: String,
    /// Session bound to the credential.
    pub session_id: Uuid,
    /// Credential expiry.
    pub expires_at: DateTime<Utc>,
    /// Sanitized profile.
    pub user: UserProfile,
}

impl From<AuthOutcome> for AuthResponse {
    fn from(outcome: AuthOutcome) -> Self {
        Self {
            access_token: outcome.credential,
            session_token: outcome.session_token,
            session_id: outcome.session_id,
            expires_at: outcome.expires_at,
            user: outcome.profile,
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message text.
    pub message: String,
}

impl MessageResponse {
    /// Creates a message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Force logout result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForceLogoutResponse {
    /// Target user.
    pub user_id: Uuid,
    /// Sessions that were ended.
    pub sessions_ended: usize,
}

/// Tenant license state after an update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseLimitResponse {
    /// Tenant ID.
    pub tenant_id: Uuid,
    /// New limit.
    pub license_limit: i32,
    /// Licenses in use.
    pub license_used: i32,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Application version.
    pub version: String,
    /// Database status: `connected`, `unreachable`, or `memory`.
    pub database: String,
}
