//! License counter: the cached `license_used` value and its recomputation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use lexdesk_core::error::AppError;
use lexdesk_core::result::AppResult;
use lexdesk_database::repositories::{SessionRepository, TenantRepository};
use lexdesk_entity::session::ActiveSessionSummary;
use lexdesk_entity::tenant::Tenant;

/// License usage snapshot of one tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseInfo {
    /// Purchased concurrent licenses.
    pub license_limit: i32,
    /// Licenses held by active sessions.
    pub license_used: i32,
    /// Licenses still free.
    pub available: i32,
    /// The active sessions holding the licenses.
    pub active_sessions: Vec<ActiveSessionSummary>,
}

/// Keeps `license_used` equal to the number of active sessions.
///
/// The counter is always rewritten from the session rows in one statement,
/// never adjusted by a delta, so any drift is corrected on the next
/// recount of that tenant.
#[derive(Debug, Clone)]
pub struct LicenseCounter {
    tenants: Arc<dyn TenantRepository>,
    sessions: Arc<dyn SessionRepository>,
}

impl LicenseCounter {
    /// Creates a counter over the given repositories.
    pub fn new(tenants: Arc<dyn TenantRepository>, sessions: Arc<dyn SessionRepository>) -> Self {
        Self { tenants, sessions }
    }

    /// Writes the exact active-session count into `license_used` and returns it.
    pub async fn recount(&self, tenant_id: Uuid) -> AppResult<i32> {
        let used = self
            .tenants
            .recount_license_used(tenant_id)
            .await?
            .ok_or_else(|| AppError::not_found("Tenant not found"))?;
        tracing::debug!(tenant_id = %tenant_id, license_used = used, "License usage recounted");
        Ok(used)
    }

    /// Licenses still free for `tenant`.
    pub fn available_slots(tenant: &Tenant) -> i32 {
        tenant.available_slots()
    }

    /// Loads a tenant, failing with `NotFound` if it does not exist.
    pub async fn tenant(&self, tenant_id: Uuid) -> AppResult<Tenant> {
        self.tenants
            .find_by_id(tenant_id)
            .await?
            .ok_or_else(|| AppError::not_found("Tenant not found"))
    }

    /// Recounts and returns the tenant with its list of active sessions.
    pub async fn license_info(&self, tenant_id: Uuid) -> AppResult<LicenseInfo> {
        let license_used = self.recount(tenant_id).await?;
        let tenant = self.tenant(tenant_id).await?;
        let active_sessions = self.sessions.list_active_by_tenant(tenant_id).await?;

        Ok(LicenseInfo {
            license_limit: tenant.license_limit,
            license_used,
            available: (tenant.license_limit - license_used).max(0),
            active_sessions,
        })
    }

    /// Sets a new limit. The caller must hold the tenant's lock.
    ///
    /// Fails with `Validation` for a non-positive limit and with `Conflict`
    /// when the limit is below the freshly recounted usage.
    pub async fn set_limit(&self, tenant_id: Uuid, limit: i32) -> AppResult<Tenant> {
        if limit <= 0 {
            return Err(AppError::validation("License limit must be positive"));
        }

        let used = self.recount(tenant_id).await?;
        match self.tenants.update_license_limit(tenant_id, limit).await? {
            Some(tenant) => {
                info!(
                    tenant_id = %tenant_id,
                    license_limit = limit,
                    license_used = used,
                    "License limit updated"
                );
                Ok(tenant)
            }
            None => {
                warn!(
                    tenant_id = %tenant_id,
                    license_limit = limit,
                    license_used = used,
                    "License limit below current usage"
                );
                Err(AppError::conflict(format!(
                    "License limit {limit} is below the {used} licenses currently in use"
                ))
                .with_details(serde_json::json!({ "license_used": used })))
            }
        }
    }
}
