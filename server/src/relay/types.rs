//! Relay error definitions

use thiserror::Error;

/// Errors that can occur while refreshing spins from upstream
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Spinitron access token is not configured (set SPIN_KEY)")]
    MissingAccessToken,

    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Upstream returned HTTP {0}")]
    UpstreamStatus(u16),

    #[error("Upstream returned invalid JSON: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

impl RelayError {
    /// Short machine-readable code used in error responses and metrics labels
    pub fn code(&self) -> &'static str {
        match self {
            RelayError::MissingAccessToken => "missing_access_token",
            RelayError::Upstream(_) => "upstream_error",
            RelayError::UpstreamStatus(_) => "upstream_status",
            RelayError::InvalidPayload(_) => "invalid_payload",
        }
    }
}
