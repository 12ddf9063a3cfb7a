//! Auth handlers: login, register, logout, me.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use lexdesk_auth::gateway::RegisterInput;
use lexdesk_entity::user::UserProfile;

use crate::dto::request::{LoginRequest, RegisterRequest};
use crate::dto::response::{ApiResponse, AuthResponse, MessageResponse};
use crate::dto::validated;
use crate::error::ApiError;
use crate::extractors::{AuthUser, ClientMeta};
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    client: ClientMeta,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    let req = validated(req)?;
    let outcome = state
        .gateway
        .login(&req.email, &req.password, client.into_inner())
        .await?;

    Ok(Json(ApiResponse::ok(outcome.into())))
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    client: ClientMeta,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ApiError> {
    let req = validated(req)?;
    let input = RegisterInput {
        email: req.email,
        password: req.password,
        full_name: req.full_name,
        role: None,
        tenant_id: req.tenant_id,
    };
    let outcome = state.gateway.register(input, client.into_inner()).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(outcome.into()))))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.gateway.logout(auth.session_id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Logged out successfully",
    ))))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let profile = state.gateway.me(auth.context()).await?;
    Ok(Json(ApiResponse::ok(profile)))
}
