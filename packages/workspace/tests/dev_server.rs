//! Dev file-patch endpoint over a temporary config directory
//!
//! This tests:
//! - GET returns file content, 404 for missing files, 400 without a filename
//! - POST writes inside the directory and answers `{success: true}`
//! - escapes are refused with 403 in both directions
//! - malformed bodies are 500 with an error payload

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use navboard_workspace::{server, ConfigDirSync};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app(dir: &std::path::Path) -> Router {
    server::router(Arc::new(ConfigDirSync::new(dir)))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(server::WRITE_CONFIG_ROUTE)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

#[tokio::test]
async fn test_read_existing_and_missing() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("sidebar.ts"), "export default []").unwrap();

    let (status, body) = send(
        app(dir.path()),
        get("/__api/write-config?filename=sidebar.ts&t=1700000000"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, json!({ "content": "export default []" }));

    let (status, _) = send(app(dir.path()), get("/__api/write-config?filename=nope.ts")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(app(dir.path()), get("/__api/write-config")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_write_inside_directory() {
    let dir = tempfile::tempdir().unwrap();
    let request = post(json!({ "filename": "page1.ts", "content": "export {}" }).to_string());

    let (status, body) = send(app(dir.path()), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({ "success": true })
    );
    assert_eq!(
        std::fs::read_to_string(dir.path().join("page1.ts")).unwrap(),
        "export {}"
    );
}

#[tokio::test]
async fn test_escapes_are_forbidden() {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join("config");
    std::fs::create_dir(&config_dir).unwrap();
    std::fs::write(dir.path().join("secret.txt"), "hidden").unwrap();

    let (status, _) = send(
        app(&config_dir),
        get("/__api/write-config?filename=../secret.txt"),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let request = post(json!({ "filename": "../evil.ts", "content": "x" }).to_string());
    let (status, _) = send(app(&config_dir), request).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(!dir.path().join("evil.ts").exists());
}

#[tokio::test]
async fn test_bad_requests() {
    let dir = tempfile::tempdir().unwrap();

    let request = post(json!({ "filename": "page1.ts" }).to_string());
    let (status, _) = send(app(dir.path()), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(app(dir.path()), post("{ not json")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(serde_json::from_str::<Value>(&body).unwrap()["error"].is_string());
}
