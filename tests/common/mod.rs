// Shared test helpers

#![allow(dead_code)]

use chrono::{DateTime, TimeDelta, Utc};
use osprobe::config::AppConfig;
use osprobe::models::*;

pub const TEST_CONFIG: &str = r#"
[server]
port = 8081
host = "0.0.0.0"

[publishing]
broadcast_capacity = 10

[monitoring]
sample_interval_ms = 1000
stats_log_interval_secs = 60
"#;

pub fn test_app_config() -> AppConfig {
    AppConfig::load_from_str(TEST_CONFIG).unwrap()
}

pub fn t0() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

pub fn at(secs: i64) -> DateTime<Utc> {
    t0() + TimeDelta::seconds(secs)
}

/// Interface counters where every counter has the same value.
pub fn iface(value: u64) -> InterfaceCounters {
    InterfaceCounters {
        rx_bytes: value,
        rx_packets: value,
        rx_errors: value,
        rx_drops: value,
        tx_bytes: value,
        tx_packets: value,
        tx_errors: value,
        tx_drops: value,
        link: LinkInfo {
            mac_address: "00:11:22:33:44:55".into(),
            speed: 1_000_000_000,
            mtu: 1500,
        },
    }
}

pub fn mount(device: &str, mount_point: &str) -> MountInfo {
    MountInfo {
        device: device.into(),
        mount_point: mount_point.into(),
        fs_type: "ext4".into(),
    }
}

pub fn minimal_rates(timestamp: u64) -> RatesSnapshot {
    RatesSnapshot {
        timestamp,
        interfaces: vec![],
        disks: vec![],
    }
}
