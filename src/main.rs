use anyhow::Result;
use osprobe::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize};
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;
    tracing::info!(
        agent = version::NAME,
        version = version::VERSION,
        "Starting agent"
    );

    let (tx, _) =
        broadcast::channel::<models::RatesSnapshot>(app_config.publishing.broadcast_capacity);

    let sysinfo_repo = Arc::new(sysinfo_repo::SysinfoRepo::new());
    let topology = Arc::new(topology::TopologyCache::new());
    match worker::refresh_topology(&sysinfo_repo, &topology).await {
        Ok(n) => tracing::info!(
            mounts = n,
            default_path = %topology.default_path(),
            "Initial mount topology loaded"
        ),
        Err(e) => tracing::warn!(
            error = %e,
            operation = "refresh_topology",
            "Initial mount topology failed; serving fallback path until next refresh"
        ),
    }

    let ws_rates_connections = Arc::new(AtomicUsize::new(0));
    let snapshots_published_total = Arc::new(AtomicU64::new(0));
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let worker_handle = worker::spawn(
        worker::WorkerDeps {
            sysinfo_repo: sysinfo_repo.clone(),
            topology: topology.clone(),
            tx: tx.clone(),
            ws_rates_connections: ws_rates_connections.clone(),
            snapshots_published_total,
            shutdown_rx,
        },
        worker::WorkerConfig {
            sample_interval_ms: app_config.monitoring.sample_interval_ms,
            stats_log_interval_secs: app_config.monitoring.stats_log_interval_secs,
            topology_refresh_secs: app_config.monitoring.topology_refresh_secs,
            network_ignore: app_config.network.ignore_policy(),
            disk_ignore: app_config
                .disk
                .enabled
                .then(|| app_config.disk.ignore_policy()),
        },
    );

    let app = routes::app(tx, topology, ws_rates_connections);
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = async {
            #[cfg(unix)]
            {
                use tokio::signal::unix::{SignalKind, signal};
                let mut sigterm = match signal(SignalKind::terminate()) {
                    Ok(s) => s,
                    Err(_) => {
                        let _ = tokio::signal::ctrl_c().await;
                        return;
                    }
                };
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            #[cfg(not(unix))]
            {
                let _ = tokio::signal::ctrl_c().await;
            }
        } => {
            tracing::info!("Received shutdown signal");
            let _ = shutdown_tx.send(());
            let _ = worker_handle.await;
        }
    }

    Ok(())
}
