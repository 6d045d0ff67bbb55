//! Common Test Utilities for Integration Tests
//!
//! Shared helpers used across integration test modules.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    extract::Request,
    http::{Method, StatusCode},
};
use serde_json::{Value, json};
use metrics_exporter_prometheus::PrometheusHandle;
use spinrelay::{
    RelayAppState, RelayError, RelayService, SpinSource, SpinStore, build_app, relay_routes,
};
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

/// Spin source that replays queued results, then repeats a fallback document
pub struct MockSpinSource {
    queued: Mutex<VecDeque<Result<Value, RelayError>>>,
    fallback: Value,
    calls: Mutex<usize>,
}

impl MockSpinSource {
    pub fn new(fallback: Value) -> Self {
        Self {
            queued: Mutex::new(VecDeque::new()),
            fallback,
            calls: Mutex::new(0),
        }
    }

    pub fn push(&self, result: Result<Value, RelayError>) {
        self.queued.lock().unwrap().push_back(result);
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl SpinSource for MockSpinSource {
    async fn fetch_spins(&self) -> Result<Value, RelayError> {
        *self.calls.lock().unwrap() += 1;
        self.queued
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(self.fallback.clone()))
    }
}

/// A Spinitron-shaped document with `n` spins
pub fn sample_spins(n: usize) -> Value {
    let items: Vec<Value> = (0..n)
        .map(|i| {
            json!({
                "id": 1000 + i,
                "artist": format!("Artist {}", i),
                "song": format!("Song {}", i),
            })
        })
        .collect();
    json!({ "items": items, "_meta": { "totalCount": n } })
}

/// Create a relay router backed by a mock source
pub fn create_test_app_with_source() -> (Router, Arc<MockSpinSource>, SpinStore) {
    let source = Arc::new(MockSpinSource::new(sample_spins(5)));
    let store = SpinStore::new();
    let relay = RelayService::new(source.clone(), store.clone());
    (relay_routes(RelayAppState { relay }), source, store)
}

/// Create a relay router with all routes configured
pub fn create_test_app() -> Router {
    create_test_app_with_source().0
}

/// Create the full application (relay plus observability routes)
pub fn create_full_app(prometheus: Option<PrometheusHandle>) -> (Router, SpinStore) {
    let source = Arc::new(MockSpinSource::new(sample_spins(5)));
    let store = SpinStore::new();
    let relay = RelayService::new(source, store.clone());
    (build_app(relay, prometheus), store)
}

/// Calls observed by a [`RecordingServer`]
#[derive(Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<(Method, String)>>>,
}

impl CallLog {
    pub fn calls(&self) -> Vec<(Method, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

/// In-process HTTP server that records every request it receives
pub struct RecordingServer {
    pub addr: SocketAddr,
    pub log: CallLog,
}

impl RecordingServer {
    /// Start a server answering every request with `status`
    pub async fn start(status: StatusCode) -> Self {
        let log = CallLog::default();
        let recorder = log.clone();

        let app = Router::new().fallback(move |req: Request| {
            let recorder = recorder.clone();
            async move {
                recorder
                    .calls
                    .lock()
                    .unwrap()
                    .push((req.method().clone(), req.uri().path().to_string()));
                (status, "[]")
            }
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, log }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}
