//! Credential signing configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Bearer credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Credential lifetime in hours.
    #[serde(default = "default_credential_ttl")]
    pub credential_ttl_hours: u64,
    /// Clock-skew leeway applied when verifying expiry, in seconds.
    #[serde(default = "default_leeway")]
    pub jwt_leeway_seconds: u64,
    /// Minimum password length accepted at registration.
    #[serde(default = "default_password_min")]
    pub password_min_length: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            credential_ttl_hours: default_credential_ttl(),
            jwt_leeway_seconds: default_leeway(),
            password_min_length: default_password_min(),
        }
    }
}

impl AuthConfig {
    /// Credential lifetime in seconds.
    pub fn credential_ttl_seconds(&self) -> Result<i64, AppError> {
        super::ttl_hours_to_seconds("auth.credential_ttl_hours", self.credential_ttl_hours)
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_credential_ttl() -> u64 {
    24
}

fn default_leeway() -> u64 {
    5
}

fn default_password_min() -> u64 {
    8
}
