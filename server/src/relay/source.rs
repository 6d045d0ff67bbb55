//! Spin sources

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use super::types::RelayError;
use crate::config::UpstreamConfig;

/// Trait for anything that can produce the latest spins document
#[async_trait]
pub trait SpinSource: Send + Sync {
    /// Fetch the latest spins as a raw JSON document
    async fn fetch_spins(&self) -> Result<Value, RelayError>;
}

/// Spin source backed by the Spinitron HTTP API
pub struct SpinitronSource {
    client: reqwest::Client,
    url: String,
    access_token: Option<String>,
    count: u32,
}

impl SpinitronSource {
    pub fn new(config: &UpstreamConfig) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
            access_token: config.access_token.clone(),
            count: config.count,
        })
    }
}

#[async_trait]
impl SpinSource for SpinitronSource {
    async fn fetch_spins(&self) -> Result<Value, RelayError> {
        let token = self
            .access_token
            .as_deref()
            .ok_or(RelayError::MissingAccessToken)?;

        info!("Requesting {} spins from {}", self.count, self.url);

        let count = self.count.to_string();
        let resp = self
            .client
            .get(&self.url)
            .query(&[("access-token", token), ("count", count.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RelayError::UpstreamStatus(status.as_u16()));
        }

        let body = resp.bytes().await?;
        debug!("Received {} bytes from upstream", body.len());

        Ok(serde_json::from_slice(&body)?)
    }
}
