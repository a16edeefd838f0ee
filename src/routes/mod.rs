// HTTP + WebSocket routes

mod http;
mod ws;

use axum::{Router, routing::get};
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};

use crate::models::RatesSnapshot;
use crate::topology::TopologyCache;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) rates_tx: broadcast::Sender<RatesSnapshot>,
    pub(crate) topology: Arc<TopologyCache>,
    pub(crate) ws_rates_connections: Arc<AtomicUsize>,
}

pub fn app(
    rates_tx: broadcast::Sender<RatesSnapshot>,
    topology: Arc<TopologyCache>,
    ws_rates_connections: Arc<AtomicUsize>,
) -> Router {
    let state = AppState {
        rates_tx,
        topology,
        ws_rates_connections,
    };
    Router::new()
        .route("/", get(|| async { "osprobe telemetry agent" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/topology", get(http::topology_handler)) // GET /api/topology
        .route(
            "/api/topology/default-path",
            get(http::default_path_handler),
        ) // GET /api/topology/default-path
        .route("/api/topology/{device}", get(http::mount_handler)) // GET /api/topology/{device}
        .route("/ws/rates", get(ws::ws_rates)) // WS /ws/rates
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
