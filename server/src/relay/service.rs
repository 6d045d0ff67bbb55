//! Refresh orchestration between a spin source and the store

use std::sync::Arc;
use tracing::{info, warn};

use super::source::SpinSource;
use super::store::SpinStore;
use super::types::RelayError;

/// Pairs a spin source with the store it feeds
#[derive(Clone)]
pub struct RelayService {
    source: Arc<dyn SpinSource>,
    store: SpinStore,
}

impl RelayService {
    pub fn new(source: Arc<dyn SpinSource>, store: SpinStore) -> Self {
        Self { source, store }
    }

    pub fn store(&self) -> &SpinStore {
        &self.store
    }

    /// Fetch from upstream and replace the stored document
    ///
    /// On failure the previously stored document is kept.
    pub async fn refresh(&self) -> Result<(), RelayError> {
        match self.source.fetch_spins().await {
            Ok(document) => {
                self.store.replace(document).await;
                metrics::counter!("spinrelay_refresh_total", "outcome" => "ok").increment(1);
                info!("Spins refreshed");
                Ok(())
            }
            Err(e) => {
                metrics::counter!("spinrelay_refresh_total", "outcome" => e.code()).increment(1);
                warn!("Spin refresh failed: {}", e);
                Err(e)
            }
        }
    }
}
