//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use lexdesk_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Optional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// HTTP-facing wrapper around [`AppError`].
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// Status code and public error code for a kind.
pub fn status_for(kind: ErrorKind) -> (StatusCode, &'static str) {
    match kind {
        ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        ErrorKind::TenantRequired => (StatusCode::BAD_REQUEST, "TENANT_REQUIRED"),
        ErrorKind::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
        ErrorKind::Unauthenticated => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
        ErrorKind::Unauthorized
        | ErrorKind::InvalidToken
        | ErrorKind::SessionInactive
        | ErrorKind::SessionExpired => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        ErrorKind::AccountDeactivated => (StatusCode::FORBIDDEN, "ACCOUNT_DEACTIVATED"),
        ErrorKind::LicenseLimitReached => (StatusCode::FORBIDDEN, "LICENSE_LIMIT_REACHED"),
        ErrorKind::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        ErrorKind::ConflictActiveSession => (StatusCode::CONFLICT, "CONFLICT_ACTIVE_SESSION"),
        ErrorKind::DuplicateEmail => (StatusCode::CONFLICT, "DUPLICATE_EMAIL"),
        ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
        ErrorKind::Internal
        | ErrorKind::Database
        | ErrorKind::Configuration
        | ErrorKind::Serialization => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let (status, error_code) = status_for(err.kind);

        let body = if err.kind.is_internal() {
            tracing::error!(kind = %err.kind, error = %err.message, source = ?err.source, "Internal server error");
            ApiErrorResponse {
                error: error_code.to_string(),
                message: "An internal error occurred".to_string(),
                details: None,
            }
        } else if err.kind.is_credential_rejection() {
            ApiErrorResponse {
                error: error_code.to_string(),
                message: "Invalid or expired credential".to_string(),
                details: None,
            }
        } else {
            ApiErrorResponse {
                error: error_code.to_string(),
                message: err.message,
                details: err.details,
            }
        };

        (status, Json(body)).into_response()
    }
}
