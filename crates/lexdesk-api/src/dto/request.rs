//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Self-registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email.
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    /// Password. Minimum length is enforced from configuration.
    #[validate(length(min = 1, max = 256))]
    pub password: String,
    /// Full name.
    #[validate(length(min = 1, max = 255))]
    pub full_name: String,
    /// Tenant to join.
    pub tenant_id: Option<Uuid>,
}

/// License limit update (admin).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SetLicenseLimitRequest {
    /// New limit.
    #[validate(range(min = 1, message = "License limit must be positive"))]
    pub license_limit: i32,
}
