//! `AuthUser` extractor: the identity attached by the auth middleware.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use lexdesk_auth::AuthContext;
use lexdesk_core::error::AppError;

use crate::error::ApiError;

/// Authenticated identity available in handlers behind the auth middleware.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthContext);

impl AuthUser {
    /// Returns the inner `AuthContext`.
    pub fn context(&self) -> &AuthContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = AuthContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| ApiError(AppError::unauthenticated("Authentication required")))
    }
}
