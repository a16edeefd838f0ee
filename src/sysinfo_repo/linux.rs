// Linux-specific helpers: /sys/class/net link properties, drop counters, device keys.

use crate::topology::ROOT_KEY;

/// Read network interface link speed from /sys/class/net/<interface>/speed (Linux).
/// Returns speed in bits per second, or 0 if unavailable.
pub(super) fn get_interface_speed(interface_name: &str) -> u64 {
    #[cfg(target_os = "linux")]
    {
        let path = format!("/sys/class/net/{}/speed", interface_name);
        if let Ok(content) = std::fs::read_to_string(&path) {
            return parse_speed_mbps(&content);
        }
    }
    #[cfg(not(target_os = "linux"))]
    let _ = interface_name;
    0
}

/// Read MTU from /sys/class/net/<interface>/mtu (Linux), 0 if unavailable.
pub(super) fn get_interface_mtu(interface_name: &str) -> u64 {
    read_net_value(interface_name, "mtu")
}

/// Read a counter from /sys/class/net/<interface>/statistics/<name> (e.g. rx_dropped).
pub(super) fn get_interface_statistic(interface_name: &str, name: &str) -> u64 {
    read_net_value(interface_name, &format!("statistics/{}", name))
}

fn read_net_value(interface_name: &str, file: &str) -> u64 {
    #[cfg(target_os = "linux")]
    {
        let path = format!("/sys/class/net/{}/{}", interface_name, file);
        if let Ok(content) = std::fs::read_to_string(&path) {
            return parse_u64(&content);
        }
    }
    #[cfg(not(target_os = "linux"))]
    let _ = (interface_name, file);
    0
}

/// Link speed file holds Mb/s; "-1" means no carrier.
fn parse_speed_mbps(content: &str) -> u64 {
    match content.trim().parse::<i64>() {
        Ok(mbps) if mbps > 0 => (mbps as u64).saturating_mul(1_000_000),
        _ => 0,
    }
}

fn parse_u64(content: &str) -> u64 {
    content.trim().parse::<u64>().unwrap_or(0)
}

/// Block device key without the /dev/ prefix ("/dev/sda1" -> "sda1").
pub(super) fn device_key(name: &str) -> String {
    let key = name.strip_prefix("/dev/").unwrap_or(name);
    if key.is_empty() {
        name.to_string()
    } else {
        key.to_string()
    }
}

/// Topology key for a mount: the root filesystem is always "/", anything
/// else is keyed by its device.
pub(super) fn mount_key(device: &str, mount_point: &str) -> String {
    if mount_point == ROOT_KEY {
        ROOT_KEY.to_string()
    } else {
        device_key(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_is_converted_to_bits() {
        assert_eq!(parse_speed_mbps("1000\n"), 1_000_000_000);
        assert_eq!(parse_speed_mbps("-1\n"), 0);
        assert_eq!(parse_speed_mbps(""), 0);
        assert_eq!(parse_speed_mbps("garbage"), 0);
    }

    #[test]
    fn counters_parse_or_zero() {
        assert_eq!(parse_u64("1500\n"), 1500);
        assert_eq!(parse_u64("x"), 0);
    }

    #[test]
    fn device_key_strips_dev_prefix() {
        assert_eq!(device_key("/dev/sda1"), "sda1");
        assert_eq!(device_key("/dev/mapper/vg-root"), "mapper/vg-root");
        assert_eq!(device_key("overlay"), "overlay");
        assert_eq!(device_key("/dev/"), "/dev/");
    }

    #[test]
    fn root_mount_is_keyed_by_slash() {
        assert_eq!(mount_key("/dev/nvme0n1p2", "/"), "/");
        assert_eq!(mount_key("overlay", "/"), "/");
    }

    #[test]
    fn other_mounts_are_keyed_by_device() {
        assert_eq!(mount_key("/dev/sdb1", "/mnt/data"), "sdb1");
        assert_eq!(mount_key("/dev/nvme0n1p1", "/boot/efi"), "nvme0n1p1");
        assert_eq!(mount_key("tmpfs", "/tmp"), "tmpfs");
    }
}
