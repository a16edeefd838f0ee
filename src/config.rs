use serde::Deserialize;

use crate::derive::{DEFAULT_DISK_IGNORE_PREFIXES, DEFAULT_NETWORK_IGNORE_PREFIXES, IgnorePolicy};

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub publishing: PublishingConfig,
    pub monitoring: MonitoringConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub disk: DiskConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishingConfig {
    /// Max number of rate snapshots buffered for /ws/rates; slower clients lag and skip.
    pub broadcast_capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    pub sample_interval_ms: u64,
    /// How often to log agent stats at INFO level.
    pub stats_log_interval_secs: u64,
    /// How often to re-enumerate mounts into the topology cache.
    #[serde(default = "default_topology_refresh_secs")]
    pub topology_refresh_secs: u64,
}

fn default_topology_refresh_secs() -> u64 {
    300
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    /// Interface name prefixes that never produce rates.
    #[serde(default = "default_network_ignore_prefixes")]
    pub ignore_prefixes: Vec<String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            ignore_prefixes: default_network_ignore_prefixes(),
        }
    }
}

fn default_network_ignore_prefixes() -> Vec<String> {
    DEFAULT_NETWORK_IGNORE_PREFIXES
        .iter()
        .map(|p| p.to_string())
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiskConfig {
    #[serde(default = "default_disk_enabled")]
    pub enabled: bool,
    /// Block device name prefixes (without /dev/) that never produce rates.
    #[serde(default = "default_disk_ignore_prefixes")]
    pub ignore_prefixes: Vec<String>,
}

impl Default for DiskConfig {
    fn default() -> Self {
        Self {
            enabled: default_disk_enabled(),
            ignore_prefixes: default_disk_ignore_prefixes(),
        }
    }
}

fn default_disk_enabled() -> bool {
    true
}

fn default_disk_ignore_prefixes() -> Vec<String> {
    DEFAULT_DISK_IGNORE_PREFIXES
        .iter()
        .map(|p| p.to_string())
        .collect()
}

impl NetworkConfig {
    pub fn ignore_policy(&self) -> IgnorePolicy {
        IgnorePolicy::new(self.ignore_prefixes.iter().cloned())
    }
}

impl DiskConfig {
    pub fn ignore_policy(&self) -> IgnorePolicy {
        IgnorePolicy::new(self.ignore_prefixes.iter().cloned())
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.server.host.is_empty(),
            "server.host must be non-empty"
        );
        anyhow::ensure!(
            self.publishing.broadcast_capacity > 0,
            "publishing.broadcast_capacity must be > 0, got {}",
            self.publishing.broadcast_capacity
        );
        anyhow::ensure!(
            self.monitoring.sample_interval_ms > 0,
            "monitoring.sample_interval_ms must be > 0, got {}",
            self.monitoring.sample_interval_ms
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        anyhow::ensure!(
            self.monitoring.topology_refresh_secs > 0,
            "monitoring.topology_refresh_secs must be > 0, got {}",
            self.monitoring.topology_refresh_secs
        );
        anyhow::ensure!(
            self.network.ignore_prefixes.iter().all(|p| !p.is_empty()),
            "network.ignore_prefixes must not contain empty prefixes"
        );
        anyhow::ensure!(
            self.disk.ignore_prefixes.iter().all(|p| !p.is_empty()),
            "disk.ignore_prefixes must not contain empty prefixes"
        );
        Ok(())
    }
}
