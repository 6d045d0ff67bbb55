//! HTTP route handlers for the relay API

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;

use super::service::RelayService;
use super::types::RelayError;

/// Content type `POST /update` must carry
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Application state for the relay routes
#[derive(Clone)]
pub struct RelayAppState {
    pub relay: RelayService,
}

/// Error response for the relay API
#[derive(Debug, Serialize)]
pub struct RelayErrorResponse {
    pub error: String,
    pub code: String,
}

impl From<RelayError> for RelayErrorResponse {
    fn from(e: RelayError) -> Self {
        Self {
            code: e.code().to_string(),
            error: e.to_string(),
        }
    }
}

impl IntoResponse for RelayErrorResponse {
    fn into_response(self) -> Response {
        let status = match self.code.as_str() {
            "missing_access_token" => StatusCode::SERVICE_UNAVAILABLE,
            "bad_request" => StatusCode::BAD_REQUEST,
            _ => StatusCode::BAD_GATEWAY,
        };
        (status, Json(self)).into_response()
    }
}

fn is_form_content(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}

/// POST /update - Refresh the cached spins from upstream
pub async fn update(
    State(state): State<RelayAppState>,
    headers: HeaderMap,
) -> Result<Response, RelayErrorResponse> {
    if !is_form_content(&headers) {
        tracing::debug!("Rejected /update without form content type");
        return Err(RelayErrorResponse {
            error: format!("Content-Type must be {}", FORM_CONTENT_TYPE),
            code: "bad_request".to_string(),
        });
    }

    state.relay.refresh().await.map_err(RelayErrorResponse::from)?;

    Ok((StatusCode::OK, "Fetching update.").into_response())
}

/// GET /get - Serve the `items` of the cached spins document
pub async fn get_spins(State(state): State<RelayAppState>) -> Json<serde_json::Value> {
    metrics::counter!("spinrelay_get_requests_total").increment(1);
    Json(state.relay.store().items().await)
}

/// GET /healthCheck
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

/// Fallback for every unmatched route
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}

/// Build relay API routes
pub fn relay_routes(state: RelayAppState) -> Router {
    Router::new()
        .route("/update", post(update))
        .route("/get", get(get_spins))
        .route("/healthCheck", get(health_check))
        .fallback(not_found)
        .with_state(state)
}
