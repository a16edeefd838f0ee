// Previous-sample bookkeeping: one SnapshotSet retained per collection domain.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Raw samples for every entity of one domain, captured at one instant.
#[derive(Debug, Clone)]
pub struct SnapshotSet<S> {
    pub captured_at: DateTime<Utc>,
    pub samples: HashMap<String, S>,
}

impl<S> SnapshotSet<S> {
    pub fn new(captured_at: DateTime<Utc>, samples: HashMap<String, S>) -> Self {
        Self {
            captured_at,
            samples,
        }
    }

    /// Builds a set from `(entity id, sample)` pairs. A repeated id keeps the last sample.
    pub fn from_pairs(
        captured_at: DateTime<Utc>,
        pairs: impl IntoIterator<Item = (String, S)>,
    ) -> Self {
        Self::new(captured_at, pairs.into_iter().collect())
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Holds the previous SnapshotSet for each domain ("network", "disk", ...).
///
/// A domain with no entry is unseeded. Not synchronized: callers serialize
/// access per domain, which `&mut self` on every mutator enforces.
#[derive(Debug)]
pub struct SnapshotStore<S> {
    previous: HashMap<String, SnapshotSet<S>>,
}

impl<S> Default for SnapshotStore<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> SnapshotStore<S> {
    pub fn new() -> Self {
        Self {
            previous: HashMap::new(),
        }
    }

    pub fn previous(&self, domain: &str) -> Option<&SnapshotSet<S>> {
        self.previous.get(domain)
    }

    pub fn is_seeded(&self, domain: &str) -> bool {
        self.previous.contains_key(domain)
    }

    /// Stores `current` as the domain's baseline, returning the one it displaced.
    pub fn replace(&mut self, domain: &str, current: SnapshotSet<S>) -> Option<SnapshotSet<S>> {
        self.previous.insert(domain.to_string(), current)
    }

    /// Drops the domain's baseline; the next sample seeds it again.
    pub fn reset(&mut self, domain: &str) -> Option<SnapshotSet<S>> {
        self.previous.remove(domain)
    }

    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.previous.keys().map(String::as_str)
    }
}
