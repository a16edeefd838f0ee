// Network interface models: raw cumulative counters and derived per-second rates

use serde::{Deserialize, Serialize};

use crate::derive::CounterSample;
use crate::derive::arith::{delta, percent, rate};

/// Static link properties; copied into derived output, never differenced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkInfo {
    pub mac_address: String,
    /// Link speed in bits per second; 0 when unknown.
    pub speed: u64,
    pub mtu: u64,
}

/// Absolute interface counters as reported by the kernel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceCounters {
    pub rx_bytes: u64,
    pub rx_packets: u64,
    pub rx_errors: u64,
    pub rx_drops: u64,
    pub tx_bytes: u64,
    pub tx_packets: u64,
    pub tx_errors: u64,
    pub tx_drops: u64,
    pub link: LinkInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceRates {
    pub name: String,
    pub mac_address: String,
    pub speed: u64,
    pub mtu: u64,
    pub rx_bytes_per_sec: u64,
    pub rx_packets_per_sec: u64,
    pub rx_errors_per_sec: u64,
    pub rx_drops_per_sec: u64,
    pub tx_bytes_per_sec: u64,
    pub tx_packets_per_sec: u64,
    pub tx_errors_per_sec: u64,
    pub tx_drops_per_sec: u64,
    /// Combined rx+tx bit rate as a percentage of link speed (0 when speed is unknown).
    pub utilization_percent: f64,
}

impl CounterSample for InterfaceCounters {
    type Rates = InterfaceRates;

    fn rates_since(&self, id: &str, previous: &Self, elapsed_secs: f64) -> InterfaceRates {
        let per_sec = |curr: u64, prev: u64| rate(delta(curr, prev), elapsed_secs);
        let rx_bytes_per_sec = per_sec(self.rx_bytes, previous.rx_bytes);
        let tx_bytes_per_sec = per_sec(self.tx_bytes, previous.tx_bytes);
        let bits_per_sec = (rx_bytes_per_sec as f64 + tx_bytes_per_sec as f64) * 8.0;
        InterfaceRates {
            name: id.to_string(),
            mac_address: self.link.mac_address.clone(),
            speed: self.link.speed,
            mtu: self.link.mtu,
            rx_bytes_per_sec,
            rx_packets_per_sec: per_sec(self.rx_packets, previous.rx_packets),
            rx_errors_per_sec: per_sec(self.rx_errors, previous.rx_errors),
            rx_drops_per_sec: per_sec(self.rx_drops, previous.rx_drops),
            tx_bytes_per_sec,
            tx_packets_per_sec: per_sec(self.tx_packets, previous.tx_packets),
            tx_errors_per_sec: per_sec(self.tx_errors, previous.tx_errors),
            tx_drops_per_sec: per_sec(self.tx_drops, previous.tx_drops),
            utilization_percent: percent(bits_per_sec, self.link.speed as f64),
        }
    }
}
