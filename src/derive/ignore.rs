// Entity filtering by identifier prefix.

/// Loopback, virtual bridges, VPN/tunnel links and container plumbing.
pub const DEFAULT_NETWORK_IGNORE_PREFIXES: &[&str] = &[
    "lo", "docker", "br-", "virbr", "bridge", "veth", "vnet", "tun", "tap", "wg", "utun", "ipsec",
    "cni", "flannel", "cali", "vxlan", "podman", "lxc", "lxd",
];

/// Loop devices and RAM-backed block devices.
pub const DEFAULT_DISK_IGNORE_PREFIXES: &[&str] = &["loop", "ram", "zram"];

/// Ordered list of identifier prefixes whose entities are never reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnorePolicy {
    prefixes: Vec<String>,
}

impl IgnorePolicy {
    pub fn new<I, P>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn network_defaults() -> Self {
        Self::new(DEFAULT_NETWORK_IGNORE_PREFIXES.iter().copied())
    }

    pub fn disk_defaults() -> Self {
        Self::new(DEFAULT_DISK_IGNORE_PREFIXES.iter().copied())
    }

    /// First prefix that classifies `id` as ignored, in configured order.
    pub fn matched_prefix(&self, id: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .map(String::as_str)
            .find(|p| id.starts_with(p))
    }

    pub fn matches(&self, id: &str) -> bool {
        self.matched_prefix(id).is_some()
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}
