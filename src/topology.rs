// Shared device -> mount mapping, read by collectors and routes and refreshed by the worker.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::MountInfo;

/// Key under which the root filesystem is stored.
pub const ROOT_KEY: &str = "/";

/// Returned by [`TopologyCache::default_path`] when nothing is known.
pub const FALLBACK_PATH: &str = ".";

/// Device identifier -> mount mapping behind a reader/writer lock.
///
/// Lookups share the read lock; `put` and `replace_all` take the write lock for
/// one map operation, so readers see either the old or the new mapping.
#[derive(Debug, Default)]
pub struct TopologyCache {
    mounts: RwLock<HashMap<String, MountInfo>>,
}

impl TopologyCache {
    pub fn new() -> Self {
        Self::default()
    }

    // A writer that panicked mid-call can only have skipped a whole insert/swap;
    // the map itself is never half-written, so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, MountInfo>> {
        self.mounts.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, MountInfo>> {
        self.mounts.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn lookup(&self, device: &str) -> Option<MountInfo> {
        self.read().get(device).cloned()
    }

    /// Inserts or replaces one entry.
    pub fn put(&self, device: impl Into<String>, info: MountInfo) {
        self.write().insert(device.into(), info);
    }

    /// Swaps in a complete topology under a single write lock.
    pub fn replace_all(&self, mounts: impl IntoIterator<Item = (String, MountInfo)>) {
        let next: HashMap<String, MountInfo> = mounts.into_iter().collect();
        *self.write() = next;
    }

    /// Mount path to report against when a caller needs "the" filesystem.
    ///
    /// The root mount if known, otherwise some mounted path (which one is
    /// unspecified when several exist), otherwise `"."`.
    pub fn default_path(&self) -> String {
        let mounts = self.read();
        if let Some(root) = mounts.get(ROOT_KEY) {
            return root.mount_point.clone();
        }
        mounts
            .values()
            .next()
            .map(|m| m.mount_point.clone())
            .unwrap_or_else(|| FALLBACK_PATH.to_string())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Copy of the whole mapping, sorted by device key.
    pub fn snapshot(&self) -> Vec<(String, MountInfo)> {
        let mut entries: Vec<(String, MountInfo)> = self
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}
