//! GitHub GraphQL client for fetching merged PRs and their reviews

pub mod client;
pub mod source;

pub use client::{ClientError, GitHubClient};
pub use source::{PullRequestPage, PullRequestSource};
