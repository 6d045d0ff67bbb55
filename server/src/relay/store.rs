//! Shared in-memory copy of the latest upstream document

use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

#[derive(Debug)]
struct Snapshot {
    document: Value,
    refreshed_at: Option<Instant>,
}

/// Cheaply cloneable handle to the cached spins document
///
/// Starts out as JSON `null`. A refresh replaces the whole document.
#[derive(Debug, Clone)]
pub struct SpinStore {
    inner: Arc<RwLock<Snapshot>>,
}

impl SpinStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Snapshot {
                document: Value::Null,
                refreshed_at: None,
            })),
        }
    }

    /// Replace the stored document
    pub async fn replace(&self, document: Value) {
        let mut snapshot = self.inner.write().await;
        snapshot.document = document;
        snapshot.refreshed_at = Some(Instant::now());
    }

    /// Full stored document
    pub async fn document(&self) -> Value {
        self.inner.read().await.document.clone()
    }

    /// The `items` field of the stored document, or `null` when absent
    pub async fn items(&self) -> Value {
        let snapshot = self.inner.read().await;
        snapshot
            .document
            .get("items")
            .cloned()
            .unwrap_or(Value::Null)
    }

    /// Seconds since the last successful refresh
    pub async fn age_secs(&self) -> Option<u64> {
        self.inner
            .read()
            .await
            .refreshed_at
            .map(|t| t.elapsed().as_secs())
    }
}

impl Default for SpinStore {
    fn default() -> Self {
        Self::new()
    }
}
