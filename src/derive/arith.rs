// Counter arithmetic: wrap-safe deltas, per-second rates, percentages.

use chrono::{DateTime, Utc};

/// Growth of a monotonically increasing counter between two samples.
///
/// A counter that went backwards was reset (interface replaced, driver reloaded,
/// 32-bit rollover) and reports `0` instead of underflowing.
pub fn delta(current: u64, previous: u64) -> u64 {
    current.checked_sub(previous).unwrap_or(0)
}

/// Per-second rate of `delta` over `elapsed_secs`, rounded to the nearest integer.
/// Returns `0` for a zero or negative interval.
pub fn rate(delta: u64, elapsed_secs: f64) -> u64 {
    if elapsed_secs <= 0.0 || elapsed_secs.is_nan() {
        return 0;
    }
    (delta as f64 / elapsed_secs).round() as u64
}

/// `used` as a percentage of `total`; `0.0` when `total` is zero.
/// Not clamped: over-committed resources legitimately exceed 100.
pub fn percent(used: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    100.0 * used / total
}

/// Signed seconds from `previous` to `now`. Negative when the wall clock moved backwards.
pub fn elapsed_secs(previous: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let span = now.signed_duration_since(previous);
    match span.num_microseconds() {
        Some(us) => us as f64 / 1_000_000.0,
        None => span.num_milliseconds() as f64 / 1_000.0,
    }
}
