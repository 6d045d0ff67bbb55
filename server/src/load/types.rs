//! Load harness types and error definitions

use std::time::Duration;
use thiserror::Error;

/// Errors raised while configuring or starting a load run
///
/// Request failures during a run are not errors; they are recorded in the
/// run statistics.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Invalid target host {host:?}: {reason}")]
    InvalidHost { host: String, reason: String },

    #[error("Invalid wait range: min {min:?} is greater than max {max:?}")]
    InvalidWaitRange { min: Duration, max: Duration },

    #[error("At least one user is required")]
    NoUsers,

    #[error("User behavior {0:?} has no runnable tasks")]
    NoTasks(String),

    #[error("Spawn rate must be a finite, non-negative number, got {0}")]
    InvalidSpawnRate(f64),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Result of a single instrumented request
#[derive(Debug, Clone)]
pub struct RequestOutcome {
    /// HTTP status, if a response was received
    pub status: Option<u16>,
    /// Time from send until the body was fully read
    pub latency: Duration,
    /// Failure description for transport errors and non-2xx responses
    pub error: Option<String>,
}

impl RequestOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
