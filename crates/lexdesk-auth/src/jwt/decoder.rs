//! Credential verification.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use lexdesk_core::config::AuthConfig;
use lexdesk_core::error::AppError;

use super::claims::Claims;

/// Validates bearer credentials. Stateless: revocation is handled by the
/// session record the credential points at.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.jwt_leeway_seconds;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Verifies signature and expiry, returning the claims.
    ///
    /// Every failure maps to `InvalidToken`.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::invalid_token("Credential has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::invalid_token("Invalid credential signature")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::invalid_token("Invalid credential format")
                    }
                    _ => AppError::invalid_token(format!("Credential validation failed: {e}")),
                }
            })?;

        Ok(token_data.claims)
    }
}
