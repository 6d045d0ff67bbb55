//! Integration Tests for the Spinrelay Server
//!
//! These tests drive the relay router end to end with `tower::ServiceExt`,
//! using a mock spin source in place of Spinitron.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;
use spinrelay::RelayError;
use tower::util::ServiceExt;

mod common;
use common::*;

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

fn update_request(content_type: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri("/update");
    if let Some(ct) = content_type {
        builder = builder.header("Content-Type", ct);
    }
    builder.body(Body::empty()).unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

// ============================================================================
// POST /update
// ============================================================================

mod update {
    use super::*;

    #[tokio::test]
    async fn test_update_with_form_content_type() {
        let (app, source, store) = create_test_app_with_source();

        let response = app
            .oneshot(update_request(Some("application/x-www-form-urlencoded")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, b"Fetching update.");
        assert_eq!(source.calls(), 1);
        assert_eq!(store.items().await, sample_spins(5)["items"]);
    }

    #[tokio::test]
    async fn test_update_content_type_is_case_insensitive() {
        let app = create_test_app();

        let response = app
            .oneshot(update_request(Some("Application/X-WWW-Form-URLEncoded")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_update_requires_form_content_type() {
        let (app, source, _) = create_test_app_with_source();

        let response = app.oneshot(update_request(None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_update_rejects_json_content_type() {
        let app = create_test_app();

        let response = app
            .oneshot(update_request(Some("application/json")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upstream_failure_returns_bad_gateway_and_keeps_data() {
        let (app, source, store) = create_test_app_with_source();
        store.replace(json!({"items": ["previous"]})).await;
        source.push(Err(RelayError::UpstreamStatus(500)));

        let response = app
            .oneshot(update_request(Some("application/x-www-form-urlencoded")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json["code"], "upstream_status");
        assert_eq!(store.items().await, json!(["previous"]));
    }

    #[tokio::test]
    async fn test_missing_access_token_returns_service_unavailable() {
        let (app, source, _) = create_test_app_with_source();
        source.push(Err(RelayError::MissingAccessToken));

        let response = app
            .oneshot(update_request(Some("application/x-www-form-urlencoded")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}

// ============================================================================
// GET routes
// ============================================================================

mod reads {
    use super::*;

    #[tokio::test]
    async fn test_get_before_any_refresh_is_null() {
        let app = create_test_app();

        let response = app.oneshot(get_request("/get")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(json.is_null());
    }

    #[tokio::test]
    async fn test_get_returns_items_only() {
        let (app, _, store) = create_test_app_with_source();
        store.replace(sample_spins(3)).await;

        let response = app.oneshot(get_request("/get")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json.as_array().map(|a| a.len()), Some(3));
        assert_eq!(json[0]["song"], "Song 0");
    }

    #[tokio::test]
    async fn test_update_then_get() {
        let (app, _, _) = create_test_app_with_source();

        let response = app
            .clone()
            .oneshot(update_request(Some("application/x-www-form-urlencoded")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(get_request("/get")).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json, sample_spins(5)["items"]);
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_test_app();

        let response = app.oneshot(get_request("/healthCheck")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, b"OK");
    }

    #[tokio::test]
    async fn test_root_not_found() {
        let app = create_test_app();

        let response = app.oneshot(get_request("/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_bytes(response).await, b"Not Found");
    }

    #[tokio::test]
    async fn test_unknown_path_not_found() {
        let app = create_test_app();

        let response = app.oneshot(get_request("/not-found")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

// ============================================================================
// Observability routes
// ============================================================================

mod observability {
    use super::*;
    use metrics_exporter_prometheus::PrometheusBuilder;

    #[tokio::test]
    async fn test_metrics_reports_version_and_refresh_age() {
        let (app, store) = create_full_app(None);

        let response = app.clone().oneshot(get_request("/metrics")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
        assert!(json["uptime_seconds"].is_u64());
        assert!(json["last_refresh_age_seconds"].is_null());

        store.replace(sample_spins(1)).await;
        let response = app.oneshot(get_request("/metrics")).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json["last_refresh_age_seconds"], 0);
    }

    #[tokio::test]
    async fn test_prometheus_endpoint_renders_with_handle() {
        let handle = PrometheusBuilder::new().build_recorder().handle();
        let (app, _) = create_full_app(Some(handle));

        let response = app
            .oneshot(get_request("/metrics/prometheus"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_prometheus_endpoint_without_recorder_is_not_found() {
        let (app, _) = create_full_app(None);

        let response = app
            .oneshot(get_request("/metrics/prometheus"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_full_app_keeps_relay_routes_and_fallback() {
        let (app, _) = create_full_app(None);

        let response = app.clone().oneshot(get_request("/healthCheck")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(get_request("/nowhere")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_bytes(response).await, b"Not Found");
    }
}
