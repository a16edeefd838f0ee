// Rate derivation state machine (unseeded / seeded) over a SnapshotStore.

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use super::arith::elapsed_secs;
use super::{CounterSample, IgnorePolicy, SnapshotSet, SnapshotStore};

/// Turns successive raw counter snapshots into per-second rates.
///
/// The first snapshot of a domain only seeds the baseline. Later snapshots
/// yield one `S::Rates` per entity present in both the baseline and the new
/// snapshot, minus ignored entities. A non-positive interval since the baseline
/// discards it and yields nothing.
///
/// `derive_rates` takes `&mut self`: at most one derivation per engine runs at
/// a time. Share an engine between tasks only behind a lock.
///
/// Baselines are kept per domain but the ignore policy is per engine, so one
/// engine serves one entity naming scheme (interfaces, block devices). Domains
/// that need different prefixes get their own engine.
#[derive(Debug)]
pub struct RateEngine<S> {
    store: SnapshotStore<S>,
    ignore: IgnorePolicy,
}

impl<S: CounterSample> RateEngine<S> {
    pub fn new(ignore: IgnorePolicy) -> Self {
        Self {
            store: SnapshotStore::new(),
            ignore,
        }
    }

    pub fn ignore_policy(&self) -> &IgnorePolicy {
        &self.ignore
    }

    pub fn store(&self) -> &SnapshotStore<S> {
        &self.store
    }

    pub fn is_seeded(&self, domain: &str) -> bool {
        self.store.is_seeded(domain)
    }

    /// Forgets the baseline for `domain`.
    pub fn reset(&mut self, domain: &str) {
        self.store.reset(domain);
    }

    /// Convenience for callers holding raw samples and a clock reading.
    pub fn derive_at(
        &mut self,
        domain: &str,
        samples: impl IntoIterator<Item = (String, S)>,
        now: DateTime<Utc>,
    ) -> Vec<S::Rates> {
        self.derive_rates(domain, SnapshotSet::from_pairs(now, samples))
    }

    /// Derives rates for `current` against the stored baseline, then makes
    /// `current` the new baseline.
    pub fn derive_rates(&mut self, domain: &str, current: SnapshotSet<S>) -> Vec<S::Rates> {
        let Some(previous) = self.store.previous(domain) else {
            debug!(
                domain,
                entities = current.len(),
                "seeding baseline; no rates this cycle"
            );
            self.store.replace(domain, current);
            return Vec::new();
        };

        let elapsed = elapsed_secs(previous.captured_at, current.captured_at);
        if elapsed <= 0.0 {
            debug!(
                domain,
                elapsed_secs = elapsed,
                "non-positive interval since baseline; discarding it"
            );
            self.store.reset(domain);
            return Vec::new();
        }

        let mut rates = Vec::with_capacity(current.len());
        for (id, sample) in &current.samples {
            if let Some(prefix) = self.ignore.matched_prefix(id) {
                trace!(domain, entity = %id, prefix, "ignored");
                continue;
            }
            let Some(prev) = previous.samples.get(id) else {
                continue;
            };
            rates.push(sample.rates_since(id, prev, elapsed));
        }

        self.store.replace(domain, current);
        rates
    }
}
