//! Relay configuration
//!
//! Configuration is loaded from environment variables. Unset or unparsable
//! values fall back to the defaults below.

use std::env;
use std::time::Duration;

/// Default Spinitron spins endpoint
pub const DEFAULT_SPINITRON_URL: &str = "https://spinitron.com/api/spins/";

/// Main relay configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address
    pub host: String,
    /// Server port
    pub port: u16,

    /// Upstream configuration
    pub upstream: UpstreamConfig,
}

/// Spinitron upstream configuration
#[derive(Clone)]
pub struct UpstreamConfig {
    /// Base URL of the spins endpoint
    pub url: String,
    /// Spinitron access token (`SPIN_KEY`)
    pub access_token: Option<String>,
    /// Number of spins requested per refresh
    pub count: u32,
    /// Timeout for a single upstream request
    pub timeout: Duration,
    /// Background refresh interval, disabled when `None`
    pub refresh_interval: Option<Duration>,
}

// The access token stays out of logs.
impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("url", &self.url)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("count", &self.count)
            .field("timeout", &self.timeout)
            .field("refresh_interval", &self.refresh_interval)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 80,
            upstream: UpstreamConfig::default(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SPINITRON_URL.to_string(),
            access_token: None,
            count: 5,
            timeout: Duration::from_secs(10),
            refresh_interval: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // Server config
        if let Some(host) = lookup("HOST")
            && !host.is_empty()
        {
            config.host = host;
        }
        if let Some(port) = lookup("PORT")
            && let Ok(p) = port.parse()
        {
            config.port = p;
        }

        // Upstream config
        if let Some(url) = lookup("SPINITRON_URL")
            && !url.is_empty()
        {
            config.upstream.url = url;
        }
        if let Some(key) = lookup("SPIN_KEY")
            && !key.is_empty()
        {
            config.upstream.access_token = Some(key);
        }
        if let Some(val) = lookup("SPIN_COUNT")
            && let Ok(count) = val.parse()
        {
            config.upstream.count = count;
        }
        if let Some(val) = lookup("UPSTREAM_TIMEOUT_SECS")
            && let Ok(secs) = val.parse::<u64>()
        {
            config.upstream.timeout = Duration::from_secs(secs);
        }
        if let Some(val) = lookup("REFRESH_INTERVAL_SECS")
            && let Ok(secs) = val.parse::<u64>()
        {
            config.upstream.refresh_interval = (secs > 0).then(|| Duration::from_secs(secs));
        }

        config
    }
}
