//! Instrumented HTTP client handed to tasks

use reqwest::{Method, Url};
use std::time::{Duration, Instant};
use tracing::debug;

use super::stats::RequestStats;
use super::types::{LoadError, RequestOutcome};

/// HTTP client bound to the target host
///
/// Every request is timed and recorded in the shared [`RequestStats`]. Failures
/// are recorded rather than returned, so tasks never handle errors themselves.
#[derive(Clone)]
pub struct HttpSession {
    client: reqwest::Client,
    base_url: String,
    stats: RequestStats,
}

/// Validate and normalize a target host URL (no trailing slash)
pub fn parse_host(host: &str) -> Result<String, LoadError> {
    let invalid = |reason: &str| LoadError::InvalidHost {
        host: host.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(host).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("must not carry a query or fragment"));
    }

    Ok(host.trim_end_matches('/').to_string())
}

impl HttpSession {
    pub fn new(host: &str, timeout: Duration, stats: RequestStats) -> Result<Self, LoadError> {
        let base_url = parse_host(host)?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            stats,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn stats(&self) -> &RequestStats {
        &self.stats
    }

    /// Issue a GET to `path` on the target host
    pub async fn get(&self, path: &str) -> RequestOutcome {
        self.request(Method::GET, path).await
    }

    /// Issue a request and record its outcome
    pub async fn request(&self, method: Method, path: &str) -> RequestOutcome {
        let outcome = self.send(method.clone(), path).await;
        if let Some(ref error) = outcome.error {
            debug!("{} {} failed: {}", method, path, error);
        }
        self.stats.record(method.as_str(), path, &outcome);
        outcome
    }

    async fn send(&self, method: Method, path: &str) -> RequestOutcome {
        if !path.starts_with('/') {
            return RequestOutcome {
                status: None,
                latency: Duration::ZERO,
                error: Some(format!("path {:?} must start with '/'", path)),
            };
        }

        let url = format!("{}{}", self.base_url, path);
        let start = Instant::now();

        let resp = match self.client.request(method, &url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                return RequestOutcome {
                    status: None,
                    latency: start.elapsed(),
                    error: Some(e.to_string()),
                };
            }
        };

        let status = resp.status();
        let body = resp.bytes().await;
        let latency = start.elapsed();

        let error = match body {
            Err(e) => Some(e.to_string()),
            Ok(_) if !status.is_success() => Some(format!("HTTP {}", status.as_u16())),
            Ok(_) => None,
        };

        RequestOutcome {
            status: Some(status.as_u16()),
            latency,
            error,
        }
    }
}
