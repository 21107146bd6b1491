//! Error types

use thiserror::Error;

/// Main error type for the impact report
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid configuration, e.g. no GitHub token
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network or HTTP failure while talking to GitHub
    #[error("Transport error: {0}")]
    Transport(String),

    /// Offline mode was requested but nothing is cached under the key
    #[error("Offline mode is enabled but no cached snapshot exists for '{0}'")]
    OfflineUnavailable(String),

    /// The API answered with something we cannot use
    #[error("Unexpected response shape: {0}")]
    DataShape(String),

    #[error("Snapshot cache error: {0}")]
    Cache(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
