//! Snapshot store backed by JSON files in a directory

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use common::snapshot::Snapshot;
use tracing::{debug, info};

use crate::{SnapshotStore, StoreError};

/// Stores each snapshot as `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FsSnapshotStore {
    dir: PathBuf,
}

impl FsSnapshotStore {
    /// Create a store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys become file names, keep them to a safe alphabet
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", file_name))
    }
}

impl SnapshotStore for FsSnapshotStore {
    fn load(&self, key: &str) -> Result<Snapshot, StoreError> {
        let path = self.path_for(key);
        debug!("Loading snapshot from {}", path.display());

        let bytes = match fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(key.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_slice(&bytes)?)
    }

    fn save(&self, key: &str, snapshot: &Snapshot) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);

        // Write to a sibling temp file first so a crash never leaves half a snapshot
        let tmp = path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            serde_json::to_writer(&mut file, snapshot)?;
            file.flush()?;
        }
        fs::rename(&tmp, &path)?;

        info!(
            "Saved snapshot with {} PRs to {}",
            snapshot.meta.count_prs,
            path.display()
        );
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.path_for(key).is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn snapshot() -> Snapshot {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        Snapshot::new("PostHog", "posthog", at, at, vec![])
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsSnapshotStore::new(dir.path().join("cache"));

        assert!(!store.exists("PostHog__posthog_prs_90d").unwrap());
        store.save("PostHog__posthog_prs_90d", &snapshot()).unwrap();
        assert!(store.exists("PostHog__posthog_prs_90d").unwrap());
        assert!(dir.path().join("cache/PostHog__posthog_prs_90d.json").is_file());

        let loaded = store.load("PostHog__posthog_prs_90d").unwrap();
        assert_eq!(loaded, snapshot());
    }

    #[test]
    fn test_missing_key_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsSnapshotStore::new(dir.path());
        assert!(matches!(store.load("nope"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_corrupt_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsSnapshotStore::new(dir.path());
        fs::write(dir.path().join("broken.json"), b"{not json").unwrap();
        assert!(matches!(store.load("broken"), Err(StoreError::Decode(_))));
    }

    #[test]
    fn test_keys_are_sanitized() {
        let store = FsSnapshotStore::new("/tmp/x");
        assert_eq!(
            store.path_for("../etc/passwd"),
            PathBuf::from("/tmp/x/.._etc_passwd.json")
        );
    }
}
