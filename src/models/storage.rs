// Storage models: mount topology and disk I/O counters

use serde::{Deserialize, Serialize};

use crate::derive::CounterSample;
use crate::derive::arith::{delta, rate};

/// One mounted filesystem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MountInfo {
    pub device: String,
    pub mount_point: String,
    pub fs_type: String,
}

/// Cumulative bytes read from / written to one block device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiskCounters {
    pub read_bytes: u64,
    pub written_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskRates {
    pub name: String,
    pub read_bytes_per_sec: u64,
    pub written_bytes_per_sec: u64,
}

impl CounterSample for DiskCounters {
    type Rates = DiskRates;

    fn rates_since(&self, id: &str, previous: &Self, elapsed_secs: f64) -> DiskRates {
        DiskRates {
            name: id.to_string(),
            read_bytes_per_sec: rate(delta(self.read_bytes, previous.read_bytes), elapsed_secs),
            written_bytes_per_sec: rate(
                delta(self.written_bytes, previous.written_bytes),
                elapsed_secs,
            ),
        }
    }
}
