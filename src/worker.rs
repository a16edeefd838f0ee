// Background collection driver.
// Each sample tick fetches raw counters, derives rates and broadcasts them;
// a slower tick re-enumerates mounts into the topology cache.

use crate::derive::{IgnorePolicy, RateEngine, SnapshotSet};
use crate::models::{DiskCounters, InterfaceCounters, RatesSnapshot};
use crate::sysinfo_repo::SysinfoRepo;
use crate::topology::TopologyCache;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::broadcast;
use tokio::time::{Duration, Instant, interval, interval_at};
use tracing::Instrument;

pub const NETWORK_DOMAIN: &str = "network";
pub const DISK_DOMAIN: &str = "disk";

/// Rate limit for "no receivers" message (avoid logging every tick when no one is on /ws/rates)
const NO_RECEIVERS_WARN_INTERVAL: Duration = Duration::from_secs(60);

/// Owns one rate engine per counter domain. Only the worker task drives it.
pub struct RateCollector {
    network: RateEngine<InterfaceCounters>,
    disk: Option<RateEngine<DiskCounters>>,
}

impl RateCollector {
    /// `disk_ignore = None` disables the disk domain.
    pub fn new(network_ignore: IgnorePolicy, disk_ignore: Option<IgnorePolicy>) -> Self {
        Self {
            network: RateEngine::new(network_ignore),
            disk: disk_ignore.map(RateEngine::new),
        }
    }

    pub fn disk_enabled(&self) -> bool {
        self.disk.is_some()
    }

    /// Derives one tick's rates. Interfaces and disks are sorted by name.
    pub fn derive(
        &mut self,
        network: SnapshotSet<InterfaceCounters>,
        disks: Option<SnapshotSet<DiskCounters>>,
    ) -> RatesSnapshot {
        let timestamp = u64::try_from(network.captured_at.timestamp_millis()).unwrap_or(0);
        let mut interfaces = self.network.derive_rates(NETWORK_DOMAIN, network);
        interfaces.sort_by(|a, b| a.name.cmp(&b.name));

        let mut disk_rates = match (self.disk.as_mut(), disks) {
            (Some(engine), Some(set)) => engine.derive_rates(DISK_DOMAIN, set),
            _ => Vec::new(),
        };
        disk_rates.sort_by(|a, b| a.name.cmp(&b.name));

        RatesSnapshot {
            timestamp,
            interfaces,
            disks: disk_rates,
        }
    }

    /// Fetches raw counters and derives rates. A failed disk fetch only drops disk rates.
    pub async fn collect(&mut self, repo: &SysinfoRepo) -> anyhow::Result<RatesSnapshot> {
        let network = repo.get_network_counters().await?;
        let disks = if self.disk_enabled() {
            match repo.get_disk_counters().await {
                Ok(d) => Some(d),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        operation = "get_disk_counters",
                        "disk counters failed"
                    );
                    None
                }
            }
        } else {
            None
        };
        Ok(self.derive(network, disks))
    }
}

/// Re-enumerates mounts and swaps them into `cache` in one write. Returns the mount count.
pub async fn refresh_topology(repo: &SysinfoRepo, cache: &TopologyCache) -> anyhow::Result<usize> {
    let mounts = repo.list_mounts().await?;
    let n = mounts.len();
    cache.replace_all(mounts);
    tracing::debug!(
        operation = "refresh_topology",
        mounts = n,
        default_path = %cache.default_path(),
        "Topology refreshed"
    );
    Ok(n)
}

/// Repos, shared state, channels, and shutdown for the worker.
pub struct WorkerDeps {
    pub sysinfo_repo: Arc<SysinfoRepo>,
    pub topology: Arc<TopologyCache>,
    pub tx: broadcast::Sender<RatesSnapshot>,
    pub ws_rates_connections: Arc<AtomicUsize>,
    pub snapshots_published_total: Arc<AtomicU64>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

/// Worker timing and derivation config.
pub struct WorkerConfig {
    pub sample_interval_ms: u64,
    /// How often to log agent stats (real seconds).
    pub stats_log_interval_secs: u64,
    /// How often to re-enumerate mounts (real seconds).
    pub topology_refresh_secs: u64,
    pub network_ignore: IgnorePolicy,
    /// `None` disables disk rates.
    pub disk_ignore: Option<IgnorePolicy>,
}

pub fn spawn(deps: WorkerDeps, config: WorkerConfig) -> tokio::task::JoinHandle<()> {
    let WorkerDeps {
        sysinfo_repo,
        topology,
        tx,
        ws_rates_connections,
        snapshots_published_total,
        mut shutdown_rx,
    } = deps;
    let WorkerConfig {
        sample_interval_ms,
        stats_log_interval_secs,
        topology_refresh_secs,
        network_ignore,
        disk_ignore,
    } = config;

    let stats_log_interval = Duration::from_secs(stats_log_interval_secs);
    let topology_interval = Duration::from_secs(topology_refresh_secs);

    let worker_span = tracing::span!(tracing::Level::DEBUG, "worker", sample_interval_ms);

    tokio::spawn(
        async move {
            let mut collector = RateCollector::new(network_ignore, disk_ignore);

            let mut tick = interval(Duration::from_millis(sample_interval_ms));
            tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            let mut stats_log_tick = interval(stats_log_interval);
            stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // startup already enumerated mounts; first refresh is one period out
            let first_refresh = Instant::now() + topology_interval;
            let mut topology_tick = interval_at(first_refresh, topology_interval);
            topology_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            let mut topology_refreshes_total: u64 = 0;
            let mut last_no_receivers_warn: Option<Instant> = None;

            loop {
                tokio::select! {
                    _ = tick.tick() => {
                        let snapshot = match collector.collect(&sysinfo_repo).await {
                            Ok(s) => s,
                            Err(e) => {
                                tracing::warn!(
                                    error = %e,
                                    operation = "get_network_counters",
                                    "network counters failed"
                                );
                                continue;
                            }
                        };
                        tracing::trace!(
                            interfaces = snapshot.interfaces.len(),
                            disks = snapshot.disks.len(),
                            "rates derived"
                        );
                        if tx.send(snapshot).is_err() {
                            let should_warn = last_no_receivers_warn
                                .is_none_or(|t| t.elapsed() >= NO_RECEIVERS_WARN_INTERVAL);
                            if should_warn {
                                tracing::debug!(
                                    operation = "broadcast_rates",
                                    "No WebSocket clients; broadcast channel has no receivers"
                                );
                                last_no_receivers_warn = Some(Instant::now());
                            }
                        } else {
                            snapshots_published_total.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                    _ = topology_tick.tick() => {
                        match refresh_topology(&sysinfo_repo, &topology).await {
                            Ok(_) => topology_refreshes_total += 1,
                            Err(e) => {
                                tracing::warn!(
                                    error = %e,
                                    operation = "refresh_topology",
                                    "Failed to refresh mount topology"
                                );
                            }
                        }
                    }
                    _ = stats_log_tick.tick() => {
                        tracing::info!(
                            ws_rates_clients = ws_rates_connections.load(Ordering::Relaxed),
                            snapshots_published_total =
                                snapshots_published_total.load(Ordering::Relaxed),
                            topology_refreshes_total,
                            mounts = topology.len(),
                            default_path = %topology.default_path(),
                            "agent stats"
                        );
                    }
                    _ = &mut shutdown_rx => {
                        tracing::debug!("Worker shutting down");
                        break;
                    }
                }
            }
        }
        .instrument(worker_span),
    )
}
