//! In-memory snapshot store, for tests and one-shot runs

use std::collections::HashMap;
use std::sync::RwLock;

use common::snapshot::Snapshot;

use crate::{SnapshotStore, StoreError};

#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    snapshots: RwLock<HashMap<String, Snapshot>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `snapshot` under `key`
    pub fn with_snapshot(key: impl Into<String>, snapshot: Snapshot) -> Self {
        let store = Self::new();
        store
            .snapshots
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.into(), snapshot);
        store
    }

    pub fn len(&self) -> usize {
        self.snapshots
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self, key: &str) -> Result<Snapshot, StoreError> {
        self.snapshots
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn save(&self, key: &str, snapshot: &Snapshot) -> Result<(), StoreError> {
        self.snapshots
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), snapshot.clone());
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self
            .snapshots
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_round_trip_and_overwrite() {
        let store = MemorySnapshotStore::new();
        assert!(store.is_empty());
        assert!(!store.exists("k").unwrap());

        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let first = Snapshot::new("a", "b", at, at, vec![]);
        store.save("k", &first).unwrap();
        assert_eq!(store.load("k").unwrap(), first);

        let fetched = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        let later = Snapshot::new("a", "b", at, fetched, vec![]);
        store.save("k", &later).unwrap();
        assert_eq!(store.load("k").unwrap(), later);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_load_missing() {
        let store = MemorySnapshotStore::new();
        assert!(matches!(store.load("k"), Err(StoreError::NotFound(_))));
    }
}
