//! Per-request bearer credential authentication.

use std::sync::Arc;

use tracing::debug;

use lexdesk_core::error::AppError;
use lexdesk_core::result::AppResult;

use crate::context::AuthContext;
use crate::session::SessionManager;

/// Uniform message for every rejected credential.
const REJECTED: &str = "Invalid or expired credential";

/// Resolves an `Authorization` header value to an [`AuthContext`].
#[derive(Debug, Clone)]
pub struct RequestAuthenticator {
    manager: Arc<SessionManager>,
}

impl RequestAuthenticator {
    /// Creates an authenticator backed by the session manager.
    pub fn new(manager: Arc<SessionManager>) -> Self {
        Self { manager }
    }

    /// Authenticates a raw `Authorization` header value.
    ///
    /// A missing header fails with `Unauthenticated`. A malformed header and
    /// every credential or session failure collapse into one `Unauthorized`
    /// with the same message; storage failures pass through unchanged.
    pub async fn authenticate(&self, authorization: Option<&str>) -> AppResult<AuthContext> {
        let header = authorization
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or_else(|| AppError::unauthenticated("Authentication required"))?;

        let credential = bearer_credential(header).ok_or_else(|| AppError::unauthorized(REJECTED))?;

        match self.manager.validate_by_credential(credential).await {
            Ok(ctx) => Ok(ctx),
            Err(e) if e.kind.is_credential_rejection() => {
                debug!(reason = %e.kind, "Credential rejected");
                Err(AppError::unauthorized(REJECTED))
            }
            Err(e) => Err(e),
        }
    }
}

/// Extracts the credential from a `Bearer <token>` header value.
fn bearer_credential(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use lexdesk_core::ErrorKind;

    use crate::context::ClientInfo;
    use crate::testing::Fixture;

    use super::*;

    #[test]
    fn test_bearer_parsing() {
        assert_eq!(bearer_credential("Bearer abc"), Some("abc"));
        assert_eq!(bearer_credential("bearer   abc "), Some("abc"));
        assert_eq!(bearer_credential("Basic abc"), None);
        assert_eq!(bearer_credential("Bearer"), None);
        assert_eq!(bearer_credential("Bearer  "), None);
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthenticated() {
        let fx = Fixture::new(2).await;
        let guard = RequestAuthenticator::new(fx.manager.clone());

        assert_eq!(
            guard.authenticate(None).await.unwrap_err().kind,
            ErrorKind::Unauthenticated
        );
        assert_eq!(
            guard.authenticate(Some("  ")).await.unwrap_err().kind,
            ErrorKind::Unauthenticated
        );
    }

    #[tokio::test]
    async fn test_every_rejection_looks_the_same() {
        let fx = Fixture::new(2).await;
        let guard = RequestAuthenticator::new(fx.manager.clone());
        let user = fx.user("a@firm.test").await;
        let expired = fx.manager.create_session(&user, ClientInfo::default()).await.unwrap();
        fx.store
            .set_session_expiry(expired.session.id, Utc::now() - Duration::seconds(1))
            .await;

        let other = fx.user("b@firm.test").await;
        let logged_out = fx.manager.create_session(&other, ClientInfo::default()).await.unwrap();
        fx.manager.deactivate(logged_out.session.id).await.unwrap();

        let headers = [
            "Basic xyz".to_string(),
            "Bearer garbage".to_string(),
            format!("Bearer {}", expired.credential),
            format!("Bearer {}", logged_out.credential),
        ];

        for header in &headers {
            let err = guard.authenticate(Some(header.as_str())).await.unwrap_err();
            assert_eq!(err.kind, ErrorKind::Unauthorized, "header {header}");
            assert_eq!(err.message, REJECTED);
        }
    }

    #[tokio::test]
    async fn test_valid_credential_yields_identity_and_touches() {
        let fx = Fixture::new(2).await;
        let guard = RequestAuthenticator::new(fx.manager.clone());
        let user = fx.user("a@firm.test").await;
        let issued = fx.manager.create_session(&user, ClientInfo::default()).await.unwrap();

        let ctx = guard
            .authenticate(Some(format!("Bearer {}", issued.credential).as_str()))
            .await
            .unwrap();
        assert_eq!(ctx.user_id, user.id);
        assert_eq!(ctx.session_id, issued.session.id);
        assert_eq!(ctx.role, user.role);

        let session = fx.store_session(issued.session.id).await;
        assert!(session.last_activity >= issued.session.last_activity);
    }
}
