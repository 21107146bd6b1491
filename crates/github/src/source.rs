//! Page source abstraction
//!
//! The provider pages through merged PRs via this trait so tests can script
//! pages without a network.

use std::future::Future;

use common::snapshot::RawPullRequest;

use crate::client::ClientError;

/// One page of merged pull requests, newest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PullRequestPage {
    pub nodes: Vec<RawPullRequest>,
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

/// Something that can list merged pull requests page by page
pub trait PullRequestSource: Send + Sync {
    /// Fail fast if the source cannot authenticate. Called before any page
    /// is requested.
    fn check_credentials(&self) -> Result<(), ClientError>;

    /// Fetch one page of merged PRs. `cursor` is the previous page's
    /// `end_cursor`, `None` for the first page.
    fn fetch_merged_page(
        &self,
        owner: &str,
        repo: &str,
        page_size: u32,
        cursor: Option<&str>,
    ) -> impl Future<Output = Result<PullRequestPage, ClientError>> + Send;
}
