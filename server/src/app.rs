//! Relay application router
//!
//! Merges the relay API with the observability endpoints and the shared
//! tower-http layers.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::relay::{RelayAppState, RelayService, SpinStore, relay_routes};

/// State for `/metrics` and `/metrics/prometheus`
#[derive(Clone)]
pub struct ObservabilityState {
    pub store: SpinStore,
    pub started_at: Instant,
    pub prometheus: Option<PrometheusHandle>,
}

#[derive(Serialize)]
struct MetricsResponse {
    /// Server uptime in seconds
    uptime_seconds: u64,
    /// Server version
    version: &'static str,
    /// Seconds since spins were last refreshed
    last_refresh_age_seconds: Option<u64>,
}

async fn metrics(State(state): State<ObservabilityState>) -> Json<MetricsResponse> {
    Json(MetricsResponse {
        uptime_seconds: state.started_at.elapsed().as_secs(),
        version: env!("CARGO_PKG_VERSION"),
        last_refresh_age_seconds: state.store.age_secs().await,
    })
}

/// Endpoint to expose metrics in Prometheus format
async fn prometheus_metrics(State(state): State<ObservabilityState>) -> Response {
    match state.prometheus {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

/// Build the full relay application
pub fn build_app(relay: RelayService, prometheus: Option<PrometheusHandle>) -> Router {
    let observability = Router::new()
        .route("/metrics", get(metrics))
        .route("/metrics/prometheus", get(prometheus_metrics))
        .with_state(ObservabilityState {
            store: relay.store().clone(),
            started_at: Instant::now(),
            prometheus,
        });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Relay routes carry the 404 fallback, so they are merged last
    observability
        .merge(relay_routes(RelayAppState { relay }))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
