// Domain models

mod network;
mod storage;

pub use network::{InterfaceCounters, InterfaceRates, LinkInfo};
pub use storage::{DiskCounters, DiskRates, MountInfo};

use serde::{Deserialize, Serialize};

/// Rates derived in one collection tick; published to `/ws/rates`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatesSnapshot {
    /// Capture time, milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub interfaces: Vec<InterfaceRates>,
    pub disks: Vec<DiskRates>,
}
