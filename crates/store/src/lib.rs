//! Snapshot persistence
//!
//! The provider never touches the disk directly. It talks to a
//! [`SnapshotStore`], which maps a cache key to one [`Snapshot`].

use common::snapshot::Snapshot;
use thiserror::Error;

pub mod fs;
pub mod memory;

pub use fs::FsSnapshotStore;
pub use memory::MemorySnapshotStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("No snapshot stored under '{0}'")]
    NotFound(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Corrupt snapshot: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<StoreError> for common::Error {
    fn from(err: StoreError) -> Self {
        common::Error::Cache(err.to_string())
    }
}

/// Key -> snapshot storage
pub trait SnapshotStore: Send + Sync {
    /// Load the snapshot stored under `key`
    fn load(&self, key: &str) -> Result<Snapshot, StoreError>;

    /// Store `snapshot` under `key`, replacing any previous one
    fn save(&self, key: &str, snapshot: &Snapshot) -> Result<(), StoreError>;

    /// Whether anything is stored under `key`
    fn exists(&self, key: &str) -> Result<bool, StoreError>;
}
