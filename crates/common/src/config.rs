//! Application configuration

use std::env;
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: Option<String>,
    pub owner: String,
    pub repo: String,
    /// Serve only from the snapshot cache, never touch the network
    pub offline_mode: bool,
    pub cache_dir: PathBuf,
    /// Merge cutoff window in days
    pub lookback_days: u32,
    /// PRs requested per GraphQL page
    pub page_size: u32,
    pub request_timeout_secs: u64,
    pub host: String,
    pub port: u16,
    /// Force a network refresh when the server starts
    pub refresh_on_start: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_token: None,
            owner: "PostHog".to_string(),
            repo: "posthog".to_string(),
            offline_mode: false,
            cache_dir: PathBuf::from("cache"),
            lookback_days: 90,
            page_size: 50,
            request_timeout_secs: 45,
            host: "0.0.0.0".to_string(),
            port: 3000,
            refresh_on_start: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Missing or unparseable
    /// values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            github_token: lookup("GITHUB_TOKEN").filter(|t| !t.trim().is_empty()),
            owner: lookup("GITHUB_OWNER").unwrap_or(defaults.owner),
            repo: lookup("GITHUB_REPO").unwrap_or(defaults.repo),
            offline_mode: lookup("OFFLINE_MODE").map(|v| v == "1").unwrap_or(false),
            cache_dir: lookup("CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            lookback_days: lookup("LOOKBACK_DAYS")
                .and_then(|d| d.parse().ok())
                .unwrap_or(defaults.lookback_days),
            page_size: lookup("PAGE_SIZE")
                .and_then(|p| p.parse::<u32>().ok())
                .filter(|p| *p > 0)
                .unwrap_or(defaults.page_size),
            request_timeout_secs: lookup("REQUEST_TIMEOUT_SECS")
                .and_then(|t| t.parse().ok())
                .unwrap_or(defaults.request_timeout_secs),
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            refresh_on_start: lookup("REFRESH_ON_START")
                .map(|v| v == "1")
                .unwrap_or(false),
        }
    }
}
