//! HTTP route tests using `tower::ServiceExt::oneshot`

use axum::body::{to_bytes, Body};
use axum::extract::connect_info::MockConnectInfo;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use pixelboard::backend::routes::create_router;
use pixelboard::backend::server::{build_state, AppState};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tempfile::TempDir;
use tower::ServiceExt;

use crate::common::test_config;

const PEER: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(203, 0, 113, 9)), 41000);

async fn app() -> (Router, AppState, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let state = build_state(test_config(&dir)).await.unwrap();
    let app = create_router(state.clone()).layer(MockConnectInfo(PEER));
    (app, state, dir)
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_page_load_binds_fingerprint_to_address() {
    let (app, state, _dir) = app().await;

    let response = app
        .oneshot(Request::get("/?hash=abc123").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains(r#"data-bound="true""#));
    assert_eq!(state.identity.consume_binding(PEER.ip()).as_deref(), Some("abc123"));
}

#[tokio::test]
async fn test_page_load_accepts_fingerprint_header() {
    let (app, state, _dir) = app().await;

    let response = app
        .oneshot(
            Request::get("/")
                .header("X-Fingerprint", "from-header")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(state.identity.consume_binding(PEER.ip()).as_deref(), Some("from-header"));
}

#[tokio::test]
async fn test_page_load_without_fingerprint_renders_unbound_shell() {
    let (app, state, _dir) = app().await;

    let response = app.oneshot(Request::get("/").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains(r#"data-bound="false""#));
    assert!(state.identity.bindings().is_empty());
}

#[tokio::test]
async fn test_oversized_fingerprint_is_rejected() {
    let (app, state, _dir) = app().await;
    let uri = format!("/?hash={}", "f".repeat(200));

    let response = app.oneshot(Request::get(uri).body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["status"], 400);
    assert!(state.identity.bindings().is_empty());
}

#[tokio::test]
async fn test_error_report_is_accepted() {
    let (app, _state, _dir) = app().await;

    let response = app
        .oneshot(
            Request::post("/error")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("error=socket+closed+unexpectedly"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_error_report_without_field_is_rejected() {
    let (app, _state, _dir) = app().await;

    let response = app
        .oneshot(
            Request::post("/error")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("message=nope"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_stats_reports_canvas_dimensions() {
    let (app, _state, _dir) = app().await;

    let response = app
        .oneshot(Request::get("/api/stats").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(
        body,
        serde_json::json!({"width": 10, "height": 10, "chunkSize": 5, "sessions": 0})
    );
}

#[tokio::test]
async fn test_static_files_are_served() {
    let (app, _state, dir) = app().await;
    std::fs::create_dir_all(dir.path().join("public")).unwrap();
    std::fs::write(dir.path().join("public").join("hello.txt"), "hello").unwrap();

    let response = app
        .oneshot(Request::get("/static/hello.txt").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "hello");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (app, _state, _dir) = app().await;

    let response = app
        .oneshot(Request::get("/does-not-exist").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_realtime_route_requires_upgrade() {
    let (app, _state, _dir) = app().await;

    let response = app.oneshot(Request::get("/ws").body(Body::empty()).unwrap()).await.unwrap();

    assert!(response.status().is_client_error());
}
