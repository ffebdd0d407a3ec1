//! Dev file-patch endpoint.
//!
//! ```text
//! GET  /__api/write-config?filename=sidebar.ts  → 200 {"content": "..."} | 400 | 403 | 404
//! POST /__api/write-config {filename, content}  → 200 {"success": true}  | 400 | 403 | 500
//! ```
//!
//! Every filename goes through the source adapter, which owns confinement.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use crate::errors::SyncError;
use crate::source_sync::SourceSyncAdapter;

pub const WRITE_CONFIG_ROUTE: &str = "/__api/write-config";

#[derive(Clone)]
struct DevState {
    sources: Arc<dyn SourceSyncAdapter>,
}

#[derive(Debug, Deserialize)]
struct ReadQuery {
    filename: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WriteRequest {
    filename: Option<String>,
    content: Option<String>,
}

pub fn router(sources: Arc<dyn SourceSyncAdapter>) -> Router {
    Router::new()
        .route(WRITE_CONFIG_ROUTE, get(read_config).post(write_config))
        .with_state(DevState { sources })
        .layer(CorsLayer::permissive())
}

/// Bind `addr` and serve the endpoint until the process stops
pub async fn serve(addr: &str, sources: Arc<dyn SourceSyncAdapter>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("[DevServer] Listening on http://{}{}", addr, WRITE_CONFIG_ROUTE);
    axum::serve(listener, router(sources)).await
}

async fn read_config(State(state): State<DevState>, Query(query): Query<ReadQuery>) -> Response {
    let Some(filename) = query.filename.filter(|f| !f.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "Missing filename").into_response();
    };

    match state.sources.read(&filename).await {
        Ok(Some(content)) => (StatusCode::OK, Json(json!({ "content": content }))).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "File not found").into_response(),
        Err(SyncError::Forbidden(_)) => {
            warn!("[DevServer] Refused read of {}", filename);
            (StatusCode::FORBIDDEN, "Access denied").into_response()
        }
        Err(err) => internal_error(err),
    }
}

async fn write_config(State(state): State<DevState>, body: Bytes) -> Response {
    let request: WriteRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => return internal_error(err),
    };

    let (Some(filename), Some(content)) = (
        request.filename.filter(|f| !f.is_empty()),
        request.content.filter(|c| !c.is_empty()),
    ) else {
        return (StatusCode::BAD_REQUEST, "Missing filename or content").into_response();
    };

    match state.sources.write(&filename, &content).await {
        Ok(()) => {
            info!("[DevServer] Updated {}", filename);
            (StatusCode::OK, Json(json!({ "success": true }))).into_response()
        }
        Err(SyncError::Forbidden(_)) => {
            warn!("[DevServer] Refused write of {}", filename);
            (
                StatusCode::FORBIDDEN,
                "Access denied: can only write inside the config directory",
            )
                .into_response()
        }
        Err(err) => internal_error(err),
    }
}

fn internal_error(err: impl std::fmt::Display) -> Response {
    error!("[DevServer] Error: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": err.to_string() })),
    )
        .into_response()
}
