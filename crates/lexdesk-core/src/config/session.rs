//! Session lifecycle configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Session lifecycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Absolute session lifetime in hours, counted from creation.
    #[serde(default = "default_ttl")]
    pub ttl_hours: u64,
    /// Cron expression (with seconds) for the expired-session sweep.
    #[serde(default = "default_sweep_cron")]
    pub sweep_cron: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_hours: default_ttl(),
            sweep_cron: default_sweep_cron(),
        }
    }
}

impl SessionConfig {
    /// Session lifetime in seconds.
    pub fn ttl_seconds(&self) -> Result<i64, AppError> {
        super::ttl_hours_to_seconds("session.ttl_hours", self.ttl_hours)
    }
}

fn default_ttl() -> u64 {
    24
}

fn default_sweep_cron() -> String {
    "0 */15 * * * *".to_string()
}
