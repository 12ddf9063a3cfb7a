//! Background scheduler configuration.

use serde::{Deserialize, Serialize};

/// Background scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether scheduled maintenance runs in this process.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_true() -> bool {
    true
}
