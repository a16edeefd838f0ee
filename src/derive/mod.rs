// Incremental metric derivation: counter arithmetic, previous-snapshot store, rate engine.

pub mod arith;
mod engine;
mod ignore;
mod snapshot;

pub use engine::RateEngine;
pub use ignore::{DEFAULT_DISK_IGNORE_PREFIXES, DEFAULT_NETWORK_IGNORE_PREFIXES, IgnorePolicy};
pub use snapshot::{SnapshotSet, SnapshotStore};

/// One entity's cumulative counters at one instant.
///
/// Implementors derive per-second rates against an earlier sample of the same
/// entity, normally with [`arith::rate`] over [`arith::delta`] per counter.
/// Descriptive fields are copied from `self`, never derived.
pub trait CounterSample {
    type Rates;

    fn rates_since(&self, id: &str, previous: &Self, elapsed_secs: f64) -> Self::Rates;
}
