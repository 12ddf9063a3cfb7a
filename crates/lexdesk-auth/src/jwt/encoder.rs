//! Credential creation with configurable signing and TTL.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use lexdesk_core::config::AuthConfig;
use lexdesk_core::error::AppError;
use lexdesk_entity::user::User;

use super::claims::Claims;

/// Creates signed HS256 bearer credentials.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Credential lifetime.
    ttl: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder").field("ttl", &self.ttl).finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    ///
    /// Fails with `Configuration` when the credential TTL is out of range.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let seconds = config.credential_ttl_seconds()?;
        let ttl = Duration::try_seconds(seconds).ok_or_else(|| {
            AppError::configuration(format!("Credential TTL of {seconds}s is out of range"))
        })?;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl,
        })
    }

    /// Signs a claims bundle.
    pub fn sign(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode credential: {e}")))
    }

    /// Signs a credential for `user` bound to `session_id`, issued at `now`.
    pub fn sign_for_session(
        &self,
        user: &User,
        session_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let claims = Claims::for_session(user, session_id, now, self.ttl);
        let token = self.sign(&claims)?;
        Ok((token, claims.expires_at()))
    }
}
