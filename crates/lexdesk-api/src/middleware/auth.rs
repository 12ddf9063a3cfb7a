//! Bearer credential middleware for protected routes.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticates the request and attaches its `AuthContext`.
///
/// Rejects with 401 before the handler runs; the `AuthUser` extractor then
/// reads the attached identity.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

    let ctx = state.authenticator.authenticate(header.as_deref()).await?;
    request.extensions_mut().insert(ctx);

    Ok(next.run(request).await)
}
