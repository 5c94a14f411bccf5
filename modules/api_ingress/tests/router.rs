//! Router assembly: health, docs toggling, middleware limits and serving.

use axum::{
    body::{Body, Bytes},
    http::{header, Method, Request, StatusCode},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tower::util::ServiceExt;

use api_ingress::{serve_listener, ApiIngress, ApiIngressConfig};

fn module_routes() -> Router {
    Router::new()
        .route("/api/ping", get(|| async { "pong" }))
        .route("/api/echo", post(|body: Bytes| async move { body }))
}

fn ingress(cfg: ApiIngressConfig) -> ApiIngress {
    ApiIngress::new(cfg).with_openapi(json!({
        "openapi": "3.1.0",
        "info": { "title": "test", "version": "0.0.1" },
        "paths": {}
    }))
}

async fn get_status(app: Router, uri: &str) -> StatusCode {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
        .status()
}

#[tokio::test]
async fn health_and_module_routes_are_mounted() {
    let app = ingress(ApiIngressConfig::default()).build_router(module_routes());

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());

    assert_eq!(get_status(app, "/api/ping").await, StatusCode::OK);
}

#[tokio::test]
async fn openapi_served_only_when_docs_enabled() {
    let disabled = ingress(ApiIngressConfig::default()).build_router(module_routes());
    assert_eq!(
        get_status(disabled, "/openapi.json").await,
        StatusCode::NOT_FOUND
    );

    let enabled = ingress(ApiIngressConfig {
        enable_docs: true,
        ..Default::default()
    })
    .build_router(module_routes());

    let response = enabled
        .clone()
        .oneshot(
            Request::builder()
                .uri("/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let doc: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(doc["openapi"], "3.1.0");

    assert_eq!(get_status(enabled, "/docs").await, StatusCode::OK);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let app = ingress(ApiIngressConfig {
        body_limit_bytes: 16,
        ..Default::default()
    })
    .build_router(module_routes());

    let payload = vec![b'x'; 64];
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/echo")
                .header(header::CONTENT_LENGTH, payload.len())
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn cors_headers_follow_config() {
    let preflight = || {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/ping")
            .header(header::ORIGIN, "http://example.test")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .body(Body::empty())
            .unwrap()
    };

    let with_cors = ingress(ApiIngressConfig {
        cors_enabled: true,
        ..Default::default()
    })
    .build_router(module_routes());
    let response = with_cors.oneshot(preflight()).await.unwrap();
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));

    let without = ingress(ApiIngressConfig::default()).build_router(module_routes());
    let response = without.oneshot(preflight()).await.unwrap();
    assert!(!response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[tokio::test]
async fn serve_stops_on_shutdown_signal() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let router = ingress(ApiIngressConfig::default()).build_router(module_routes());
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(serve_listener(listener, router, async move {
        let _ = rx.await;
    }));

    tx.send(()).unwrap();
    let result = tokio::time::timeout(std::time::Duration::from_secs(5), server)
        .await
        .expect("server should stop after the shutdown signal")
        .unwrap();
    assert!(result.is_ok());
}
