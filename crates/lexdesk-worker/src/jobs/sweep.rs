//! Expired-session sweep.

use std::sync::Arc;

use lexdesk_auth::{SessionManager, SweepReport};
use lexdesk_core::result::AppResult;

/// Deactivates expired sessions and releases their licenses.
#[derive(Debug, Clone)]
pub struct SessionSweepJob {
    manager: Arc<SessionManager>,
}

impl SessionSweepJob {
    /// Creates the job.
    pub fn new(manager: Arc<SessionManager>) -> Self {
        Self { manager }
    }

    /// Runs one sweep.
    pub async fn run(&self) -> AppResult<SweepReport> {
        let report = self.manager.sweep_expired().await?;
        if report.sessions > 0 {
            tracing::info!(
                sessions = report.sessions,
                tenants = report.tenants,
                "Session sweep released licenses"
            );
        } else {
            tracing::debug!("Session sweep found nothing to do");
        }
        Ok(report)
    }
}
