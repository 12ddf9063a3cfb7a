//! Unified application error types for LexDesk.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the `?` operator. The business taxonomy of the
//! session and license subsystem is expressed as [`ErrorKind`] variants so
//! callers can match on the kind instead of parsing messages.

use std::fmt;

use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Unknown email or wrong password. The two causes are never distinguished.
    InvalidCredentials,
    /// Credentials were valid but the account has been deactivated.
    AccountDeactivated,
    /// The user already holds an active session.
    ConflictActiveSession,
    /// Every license of the tenant is in use.
    LicenseLimitReached,
    /// The operation needs a tenant context and none was supplied.
    TenantRequired,
    /// The email address is already registered.
    DuplicateEmail,
    /// No bearer credential was presented on a protected route.
    Unauthenticated,
    /// The presented credential was rejected. The cause is not disclosed.
    Unauthorized,
    /// Cross-tenant or otherwise disallowed action.
    Forbidden,
    /// The requested resource was not found.
    NotFound,
    /// Credential signature or format is invalid, or the credential expired.
    InvalidToken,
    /// The session named by a credential is no longer active.
    SessionInactive,
    /// The session named by a credential passed its expiry.
    SessionExpired,
    /// Input validation failed.
    Validation,
    /// A state conflict other than an active session (e.g. limit below usage).
    Conflict,
    /// An internal server error occurred.
    Internal,
    /// A database error occurred.
    Database,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
}

impl ErrorKind {
    /// Returns `true` for the kinds produced while checking a bearer credential.
    ///
    /// The request path collapses all of them into [`ErrorKind::Unauthorized`].
    pub fn is_credential_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidToken | Self::SessionInactive | Self::SessionExpired | Self::Unauthorized
        )
    }

    /// Returns `true` for failures that are not part of the business taxonomy.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Internal | Self::Database | Self::Configuration | Self::Serialization
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::AccountDeactivated => "ACCOUNT_DEACTIVATED",
            Self::ConflictActiveSession => "CONFLICT_ACTIVE_SESSION",
            Self::LicenseLimitReached => "LICENSE_LIMIT_REACHED",
            Self::TenantRequired => "TENANT_REQUIRED",
            Self::DuplicateEmail => "DUPLICATE_EMAIL",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::SessionInactive => "SESSION_INACTIVE",
            Self::SessionExpired => "SESSION_EXPIRED",
            Self::Validation => "VALIDATION",
            Self::Conflict => "CONFLICT",
            Self::Internal => "INTERNAL",
            Self::Database => "DATABASE",
            Self::Configuration => "CONFIGURATION",
            Self::Serialization => "SERIALIZATION",
        };
        f.write_str(code)
    }
}

/// The unified application error used throughout LexDesk.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional structured details for the client (e.g. the license limit).
    pub details: Option<serde_json::Value>,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
            source: Some(Box::new(source)),
        }
    }

    /// Attach structured details to the error.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Create an invalid-credentials error with the uniform login message.
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorKind::InvalidCredentials, "Invalid email or password")
    }

    /// Create an account-deactivated error.
    pub fn account_deactivated() -> Self {
        Self::new(
            ErrorKind::AccountDeactivated,
            "Account is deactivated. Contact your administrator.",
        )
    }

    /// Create an active-session conflict error.
    pub fn conflict_active_session() -> Self {
        Self::new(
            ErrorKind::ConflictActiveSession,
            "You already have an active session. Log out of the other session first.",
        )
    }

    /// Create a license-limit error carrying the tenant's limit.
    pub fn license_limit_reached(limit: i32) -> Self {
        Self::new(
            ErrorKind::LicenseLimitReached,
            format!("License limit reached: all {limit} licenses are in use"),
        )
        .with_details(serde_json::json!({ "license_limit": limit }))
    }

    /// Create a tenant-required error.
    pub fn tenant_required() -> Self {
        Self::new(ErrorKind::TenantRequired, "A tenant is required")
    }

    /// Create a duplicate-email error.
    pub fn duplicate_email() -> Self {
        Self::new(ErrorKind::DuplicateEmail, "Email address is already registered")
    }

    /// Create an unauthenticated error.
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthenticated, message)
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// Create a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an invalid-token error.
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidToken, message)
    }

    /// Create a session-inactive error.
    pub fn session_inactive() -> Self {
        Self::new(ErrorKind::SessionInactive, "Session is not active")
    }

    /// Create a session-expired error.
    pub fn session_expired() -> Self {
        Self::new(ErrorKind::SessionExpired, "Session has expired")
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            details: self.details.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_license_limit_carries_limit() {
        let err = AppError::license_limit_reached(5);
        assert_eq!(err.kind, ErrorKind::LicenseLimitReached);
        assert!(err.message.contains('5'));
        assert_eq!(err.details.unwrap()["license_limit"], 5);
    }

    #[test]
    fn test_credential_rejection_kinds() {
        assert!(ErrorKind::InvalidToken.is_credential_rejection());
        assert!(ErrorKind::SessionInactive.is_credential_rejection());
        assert!(ErrorKind::SessionExpired.is_credential_rejection());
        assert!(!ErrorKind::Database.is_credential_rejection());
        assert!(ErrorKind::Database.is_internal());
        assert!(!ErrorKind::Forbidden.is_internal());
    }

    #[test]
    fn test_display_uses_code() {
        let err = AppError::forbidden("nope");
        assert_eq!(err.to_string(), "FORBIDDEN: nope");
    }
}
