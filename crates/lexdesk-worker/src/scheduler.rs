//! Cron scheduler for periodic maintenance tasks.

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};

use lexdesk_core::error::AppError;

use crate::jobs::SessionSweepJob;

/// Cron-based scheduler for periodic background tasks
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new() -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self { scheduler })
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }

    /// Expired-session sweep on `cron` (six fields, with seconds)
    pub async fn register_session_sweep(
        &self,
        cron: &str,
        job: SessionSweepJob,
    ) -> Result<(), AppError> {
        let schedule = CronJob::new_async(cron, move |_uuid, _lock| {
            let job = job.clone();
            Box::pin(async move {
                if let Err(e) = job.run().await {
                    tracing::error!(error = %e, "Session sweep failed");
                }
            })
        })
        .map_err(|e| {
            AppError::configuration(format!("Invalid session sweep schedule '{cron}': {e}"))
        })?;

        self.scheduler.add(schedule).await.map_err(|e| {
            AppError::internal(format!("Failed to add session sweep schedule: {}", e))
        })?;

        tracing::info!(cron = %cron, "Registered: session_sweep");
        Ok(())
    }
}
