//! License handlers.

use axum::Json;
use axum::extract::State;

use lexdesk_auth::LicenseInfo;

use crate::dto::request::SetLicenseLimitRequest;
use crate::dto::response::{ApiResponse, LicenseLimitResponse};
use crate::dto::validated;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/license
pub async fn get_license(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<LicenseInfo>>, ApiError> {
    let info = state.gateway.get_license_info(auth.tenant_id).await?;
    Ok(Json(ApiResponse::ok(info)))
}

/// PUT /api/admin/license/limit
pub async fn set_license_limit(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<SetLicenseLimitRequest>,
) -> Result<Json<ApiResponse<LicenseLimitResponse>>, ApiError> {
    let req = validated(req)?;
    let tenant = state
        .gateway
        .set_license_limit(auth.user_id, auth.tenant_id, req.license_limit)
        .await?;

    Ok(Json(ApiResponse::ok(LicenseLimitResponse {
        tenant_id: tenant.id,
        license_limit: tenant.license_limit,
        license_used: tenant.license_used,
    })))
}
