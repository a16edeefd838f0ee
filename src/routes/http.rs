// GET handlers: version, mount topology

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use super::AppState;
use crate::models::MountInfo;
use crate::version::{DESCRIPTION, NAME, VERSION};

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
        "description": DESCRIPTION,
    }))
}

/// One row of `GET /api/topology`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TopologyEntry {
    key: String,
    #[serde(flatten)]
    mount: MountInfo,
}

/// GET /api/topology — every cached mount, sorted by device key.
pub(super) async fn topology_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mounts: Vec<TopologyEntry> = state
        .topology
        .snapshot()
        .into_iter()
        .map(|(key, mount)| TopologyEntry { key, mount })
        .collect();
    axum::Json(mounts)
}

/// GET /api/topology/default-path
pub(super) async fn default_path_handler(State(state): State<AppState>) -> impl IntoResponse {
    axum::Json(serde_json::json!({ "path": state.topology.default_path() }))
}

/// GET /api/topology/{device} — one mount; the root mount is `%2F`.
pub(super) async fn mount_handler(
    State(state): State<AppState>,
    Path(device): Path<String>,
) -> Response {
    match state.topology.lookup(&device) {
        Some(info) => axum::Json(info).into_response(),
        None => {
            let body = serde_json::json!({ "error": "unknown device", "device": device });
            (StatusCode::NOT_FOUND, axum::Json(body)).into_response()
        }
    }
}
