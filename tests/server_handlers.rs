//! HTTP API tests driven through the router without binding a socket.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use tls_posture::{router, Analyzer, AnalyzerSettings, ClientCatalog};

fn app() -> axum::Router {
    let settings = AnalyzerSettings {
        connect_timeout: Duration::from_millis(500),
        handshake_timeout: Duration::from_millis(500),
        enumerate_ciphers: false,
        check_hsts: false,
        ..Default::default()
    };
    let analyzer = Analyzer::new(settings, ClientCatalog::default());
    router(Arc::new(analyzer))
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.expect("router never fails");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("body");
    let json = serde_json::from_slice(&bytes).expect("JSON body");
    (status, json)
}

fn post_json(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/ssl/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    listener.local_addr().expect("addr").port()
}

#[tokio::test]
async fn test_health_endpoint() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .expect("request");
    let (status, json) = send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_post_invalid_domain_is_400() {
    let (status, json) = send(post_json(r#"{"domain": "not a host"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().is_some_and(|e| !e.is_empty()));
}

#[tokio::test]
async fn test_post_missing_domain_is_400() {
    let (status, json) = send(post_json("{}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Domain is required");
}

#[tokio::test]
async fn test_post_malformed_json_is_400() {
    let (status, json) = send(post_json("{\"domain\": ")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"]
        .as_str()
        .is_some_and(|e| e.starts_with("Invalid request body")));
}

#[tokio::test]
async fn test_get_without_domain_is_400() {
    let request = Request::builder()
        .uri("/api/ssl/analyze")
        .body(Body::empty())
        .expect("request");
    let (status, json) = send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Domain is required");
}

#[tokio::test]
async fn test_unreachable_host_is_400() {
    // Dropped listener: the port refuses every connection.
    let port = closed_port();
    let request = Request::builder()
        .uri(format!("/api/ssl/analyze?domain=127.0.0.1:{port}"))
        .body(Body::empty())
        .expect("request");
    let (status, json) = send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().is_some_and(|e| e.contains("127.0.0.1")));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let request = Request::builder()
        .uri("/api/unknown")
        .body(Body::empty())
        .expect("request");
    let response = app().oneshot(request).await.expect("router never fails");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
