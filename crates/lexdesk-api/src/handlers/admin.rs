//! Admin handlers: forced logout and account deactivation.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use crate::dto::response::{ApiResponse, ForceLogoutResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/admin/users/{id}/force-logout
pub async fn force_logout(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<ForceLogoutResponse>>, ApiError> {
    let sessions_ended = state.gateway.force_logout(auth.user_id, user_id).await?;
    Ok(Json(ApiResponse::ok(ForceLogoutResponse {
        user_id,
        sessions_ended,
    })))
}

/// POST /api/admin/users/{id}/deactivate
pub async fn deactivate_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .gateway
        .deactivate_account(auth.user_id, user_id)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "User deactivated",
    ))))
}
