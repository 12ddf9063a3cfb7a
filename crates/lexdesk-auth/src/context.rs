//! Identity and client metadata passed between the auth layers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lexdesk_entity::user::UserRole;

use crate::jwt::Claims;

/// The authenticated identity attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user.
    pub user_id: Uuid,
    /// User email at credential issuance.
    pub email: String,
    /// User role at credential issuance.
    pub role: UserRole,
    /// The user's tenant.
    pub tenant_id: Uuid,
    /// Session the credential is bound to.
    pub session_id: Uuid,
}

impl From<Claims> for AuthContext {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
            tenant_id: claims.tid,
            session_id: claims.sid,
        }
    }
}

/// Client metadata recorded on a new session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    /// Client IP address.
    pub ip_address: Option<String>,
    /// Client User-Agent header.
    pub user_agent: Option<String>,
}

impl ClientInfo {
    /// Creates client info from optional parts.
    pub fn new(ip_address: Option<String>, user_agent: Option<String>) -> Self {
        Self {
            ip_address,
            user_agent,
        }
    }
}
