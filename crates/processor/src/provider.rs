//! Raw data provider: merged PRs from GitHub, cached as snapshots
//!
//! Pagination stops early once the last PR of a page was merged before the
//! cutoff. This relies on GitHub returning pages newest-first; the ordering
//! is not verified here, so an out-of-order page can silently truncate the
//! snapshot.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use common::snapshot::{RawPullRequest, Snapshot};
use common::{Config, Error, Result};
use github::PullRequestSource;
use store::SnapshotStore;
use tracing::{debug, info, warn};

use crate::normalize::parse_timestamp;

/// Settings for a [`SnapshotProvider`]
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub owner: String,
    pub repo: String,
    pub lookback_days: u32,
    pub page_size: u32,
    /// Hard stop for pagination
    pub max_pages: u32,
    /// Serve from the store only
    pub offline_mode: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            owner: "PostHog".to_string(),
            repo: "posthog".to_string(),
            lookback_days: 90,
            page_size: 50,
            max_pages: 200,
            offline_mode: false,
        }
    }
}

impl From<&Config> for ProviderConfig {
    fn from(config: &Config) -> Self {
        Self {
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            lookback_days: config.lookback_days,
            page_size: config.page_size,
            offline_mode: config.offline_mode,
            ..Self::default()
        }
    }
}

impl ProviderConfig {
    pub fn cache_key(&self) -> String {
        format!("{}__{}_prs_{}d", self.owner, self.repo, self.lookback_days)
    }
}

/// Start of the lookback window, truncated to whole seconds
pub fn merge_cutoff(now: DateTime<Utc>, lookback_days: u32) -> DateTime<Utc> {
    (now - Duration::days(lookback_days as i64)).trunc_subsecs(0)
}

/// Fetches snapshots from a [`PullRequestSource`], caching them in a
/// [`SnapshotStore`]
pub struct SnapshotProvider<S, T> {
    source: S,
    store: T,
    config: ProviderConfig,
}

impl<S: PullRequestSource, T: SnapshotStore> SnapshotProvider<S, T> {
    pub fn new(source: S, store: T, config: ProviderConfig) -> Self {
        Self {
            source,
            store,
            config,
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn store(&self) -> &T {
        &self.store
    }

    /// Return a snapshot of PRs merged in the lookback window.
    ///
    /// A cached snapshot is used unless `force_refresh` is set. In offline
    /// mode the cache is the only option, with or without `force_refresh`.
    pub async fn fetch(&self, force_refresh: bool) -> Result<Snapshot> {
        self.fetch_at(force_refresh, Utc::now()).await
    }

    /// Same as [`fetch`](Self::fetch) with an explicit clock
    pub async fn fetch_at(&self, force_refresh: bool, now: DateTime<Utc>) -> Result<Snapshot> {
        let key = self.config.cache_key();

        if self.config.offline_mode {
            if self.store.exists(&key)? {
                info!("Offline mode: using cached snapshot {}", key);
                return Ok(self.store.load(&key)?);
            }
            return Err(Error::OfflineUnavailable(key));
        }

        if !force_refresh && self.store.exists(&key)? {
            info!("Using cached snapshot {}", key);
            return Ok(self.store.load(&key)?);
        }

        self.source.check_credentials()?;

        let merged_after = merge_cutoff(now, self.config.lookback_days);
        let pull_requests = self.fetch_merged_since(merged_after).await?;

        let snapshot = Snapshot::new(
            self.config.owner.clone(),
            self.config.repo.clone(),
            merged_after,
            now.trunc_subsecs(0),
            pull_requests,
        );
        self.store.save(&key, &snapshot)?;

        Ok(snapshot)
    }

    async fn fetch_merged_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<RawPullRequest>> {
        let owner = self.config.owner.as_str();
        let repo = self.config.repo.as_str();

        let mut kept = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0u32;

        loop {
            pages += 1;
            info!("Fetching merged PRs page {} for {}/{}", pages, owner, repo);

            let page = self
                .source
                .fetch_merged_page(owner, repo, self.config.page_size, cursor.as_deref())
                .await?;

            let last_merged = page
                .nodes
                .last()
                .map(|pr| parse_timestamp(pr.merged_at.as_deref()));

            // The API filter is by state only, re-check the merge date here
            for pr in page.nodes {
                match parse_timestamp(pr.merged_at.as_deref()) {
                    Some(merged) if merged >= cutoff => kept.push(pr),
                    _ => debug!("Skipping PR #{} merged before cutoff", pr.number),
                }
            }

            if let Some(last) = last_merged {
                if last.map_or(true, |merged| merged < cutoff) {
                    debug!("Reached PRs older than cutoff, stopping pagination");
                    break;
                }
            }

            if !page.has_next_page {
                break;
            }

            if pages >= self.config.max_pages {
                warn!("Hit pagination limit of {} pages", self.config.max_pages);
                break;
            }

            cursor = match page.end_cursor {
                Some(c) => Some(c),
                None => {
                    return Err(Error::DataShape(
                        "hasNextPage is true but endCursor is missing".to_string(),
                    ))
                }
            };
        }

        info!("Fetched {} merged PRs for {}/{}", kept.len(), owner, repo);
        Ok(kept)
    }
}
