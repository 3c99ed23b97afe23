#[cfg(feature = "cli")]
pub mod cli;

use crate::domain::ports::KeygenSettings;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Poll budget for the orchestrator, usable without the CLI layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollSettings {
    pub poll_iterations: u32,
    pub poll_timeout_ms: u64,
}

impl PollSettings {
    pub fn new(poll_iterations: u32, poll_timeout_ms: u64) -> Self {
        Self {
            poll_iterations,
            poll_timeout_ms,
        }
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            poll_iterations: 5,
            poll_timeout_ms: 1000,
        }
    }
}

impl KeygenSettings for PollSettings {
    fn poll_iterations(&self) -> u32 {
        self.poll_iterations
    }

    fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }
}
