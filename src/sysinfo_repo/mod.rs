// Raw counter fetchers and mount enumeration via sysinfo

mod linux;

use crate::derive::SnapshotSet;
use crate::models::{DiskCounters, InterfaceCounters, LinkInfo, MountInfo};
use chrono::Utc;
use std::sync::Arc;
use sysinfo::{Disks, Networks};
use tracing::instrument;

pub struct SysinfoRepo {
    disks: Arc<std::sync::Mutex<Disks>>,
    networks: Arc<std::sync::Mutex<Networks>>,
}

impl Default for SysinfoRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoRepo {
    pub fn new() -> Self {
        let disks = Disks::new_with_refreshed_list();
        let networks = Networks::new_with_refreshed_list();
        Self {
            disks: Arc::new(std::sync::Mutex::new(disks)),
            networks: Arc::new(std::sync::Mutex::new(networks)),
        }
    }

    /// Absolute counters for every interface, keyed by interface name.
    #[instrument(
        skip(self),
        fields(repo = "sysinfo", operation = "get_network_counters")
    )]
    pub async fn get_network_counters(&self) -> anyhow::Result<SnapshotSet<InterfaceCounters>> {
        let networks = self.networks.clone();
        tokio::task::spawn_blocking(move || {
            let mut networks_guard = networks
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo networks lock poisoned: {}", e))?;
            networks_guard.refresh(true);
            let captured_at = Utc::now();
            let samples = networks_guard.list().iter().map(|(name, data)| {
                let counters = InterfaceCounters {
                    rx_bytes: data.total_received(),
                    rx_packets: data.total_packets_received(),
                    rx_errors: data.total_errors_on_received(),
                    rx_drops: linux::get_interface_statistic(name, "rx_dropped"),
                    tx_bytes: data.total_transmitted(),
                    tx_packets: data.total_packets_transmitted(),
                    tx_errors: data.total_errors_on_transmitted(),
                    tx_drops: linux::get_interface_statistic(name, "tx_dropped"),
                    link: LinkInfo {
                        mac_address: data.mac_address().to_string(),
                        speed: linux::get_interface_speed(name),
                        mtu: linux::get_interface_mtu(name),
                    },
                };
                (name.clone(), counters)
            });
            Ok(SnapshotSet::from_pairs(captured_at, samples))
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    /// Cumulative read/write bytes per block device, keyed by device name without /dev/.
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "get_disk_counters"))]
    pub async fn get_disk_counters(&self) -> anyhow::Result<SnapshotSet<DiskCounters>> {
        let disks = self.disks.clone();
        tokio::task::spawn_blocking(move || {
            let mut disks_guard = disks
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo disks lock poisoned: {}", e))?;
            disks_guard.refresh(true);
            let captured_at = Utc::now();
            let samples = disks_guard.list().iter().map(|d| {
                let usage = d.usage();
                (
                    linux::device_key(&d.name().to_string_lossy()),
                    DiskCounters {
                        read_bytes: usage.total_read_bytes,
                        written_bytes: usage.total_written_bytes,
                    },
                )
            });
            Ok(SnapshotSet::from_pairs(captured_at, samples))
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    /// Enumerates mounted filesystems as `(device key, MountInfo)`.
    /// The root filesystem is keyed by "/" instead of its device.
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "list_mounts"))]
    pub async fn list_mounts(&self) -> anyhow::Result<Vec<(String, MountInfo)>> {
        tokio::task::spawn_blocking(|| {
            let disks = Disks::new_with_refreshed_list();
            let mounts = disks
                .list()
                .iter()
                .map(|d| {
                    let device = d.name().to_string_lossy().into_owned();
                    let mount_point = d.mount_point().to_string_lossy().into_owned();
                    let key = linux::mount_key(&device, &mount_point);
                    (
                        key,
                        MountInfo {
                            device,
                            mount_point,
                            fs_type: d.file_system().to_string_lossy().into_owned(),
                        },
                    )
                })
                .collect();
            Ok(mounts)
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }
}
