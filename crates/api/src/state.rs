//! Application state

use std::sync::Arc;

use common::Result;
use github::GitHubClient;
use processor::{Report, SnapshotProvider};
use store::FsSnapshotStore;
use tokio::sync::RwLock;
use tracing::info;

pub type Provider = SnapshotProvider<GitHubClient, FsSnapshotStore>;

/// Shared application state
pub struct AppState {
    pub provider: Provider,
    report: RwLock<Arc<Report>>,
}

impl AppState {
    pub fn new(provider: Provider, report: Report) -> Self {
        Self {
            provider,
            report: RwLock::new(Arc::new(report)),
        }
    }

    /// The current report. The lock is released before the caller does
    /// any work with it.
    pub async fn report(&self) -> Arc<Report> {
        self.report.read().await.clone()
    }

    /// Fetch a fresh snapshot, rescore it and swap it in
    pub async fn refresh(&self) -> Result<Arc<Report>> {
        let snapshot = self.provider.fetch(true).await?;
        let report = Arc::new(Report::build(&snapshot));

        *self.report.write().await = report.clone();
        info!(
            "Report refreshed: {} PRs, {} engineers",
            report.summary.prs_analyzed,
            report.rows.len()
        );

        Ok(report)
    }
}
