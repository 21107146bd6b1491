//! Raw snapshot format
//!
//! A snapshot is the cached, point-in-time capture of merged pull requests
//! and their reviews. Field names mirror the GitHub GraphQL response so the
//! nodes can be stored exactly as they were fetched. Everything GitHub may
//! null out is an `Option`; the normalizer decides the defaults.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cached snapshot document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub meta: SnapshotMeta,
    #[serde(default)]
    pub pull_requests: Vec<RawPullRequest>,
}

/// Metadata describing how a snapshot was taken
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMeta {
    pub owner: String,
    pub repo: String,
    /// Merge cutoff; only PRs merged at or after this are included
    pub merged_after: DateTime<Utc>,
    pub fetched_at: DateTime<Utc>,
    pub count_prs: usize,
}

/// Pull request node as returned by the GraphQL API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPullRequest {
    pub number: u64,
    pub title: Option<String>,
    pub url: Option<String>,
    pub created_at: Option<String>,
    pub merged_at: Option<String>,
    pub additions: Option<u64>,
    pub deletions: Option<u64>,
    pub changed_files: Option<u64>,
    pub author: Option<RawActor>,
    pub reviews: Option<RawReviewConnection>,
}

/// `author { login }` (null for deleted accounts)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawActor {
    pub login: Option<String>,
}

/// `reviews(first: N) { nodes { ... } }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawReviewConnection {
    pub nodes: Option<Vec<RawReview>>,
}

/// Review node as returned by the GraphQL API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReview {
    pub author: Option<RawActor>,
    pub state: Option<String>,
    pub created_at: Option<String>,
}

impl RawActor {
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: Some(login.into()),
        }
    }
}

impl Snapshot {
    /// Build a snapshot from fetched nodes, filling in the count
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        merged_after: DateTime<Utc>,
        fetched_at: DateTime<Utc>,
        pull_requests: Vec<RawPullRequest>,
    ) -> Self {
        Self {
            meta: SnapshotMeta {
                owner: owner.into(),
                repo: repo.into(),
                merged_after,
                fetched_at,
                count_prs: pull_requests.len(),
            },
            pull_requests,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_graphql_shaped_document() {
        let json = r#"{
            "meta": {
                "owner": "PostHog",
                "repo": "posthog",
                "merged_after": "2026-01-01T00:00:00Z",
                "fetched_at": "2026-04-01T12:00:00Z",
                "count_prs": 1
            },
            "pull_requests": [{
                "number": 42,
                "title": "Fix flaky test",
                "url": "https://github.com/PostHog/posthog/pull/42",
                "createdAt": "2026-03-01T10:00:00Z",
                "mergedAt": "2026-03-02T10:00:00Z",
                "additions": 10,
                "deletions": null,
                "changedFiles": 2,
                "author": null,
                "reviews": {"nodes": [{"author": {"login": "bob"}, "state": "APPROVED", "createdAt": "2026-03-01T12:00:00Z"}]}
            }]
        }"#;

        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.meta.count_prs, 1);
        let pr = &snapshot.pull_requests[0];
        assert_eq!(pr.number, 42);
        assert_eq!(pr.deletions, None);
        assert!(pr.author.is_none());
        let reviews = pr.reviews.as_ref().unwrap().nodes.as_ref().unwrap();
        assert_eq!(reviews[0].author.as_ref().unwrap().login.as_deref(), Some("bob"));
    }

    #[test]
    fn test_meta_timestamps_serialize_as_utc_iso() {
        let at = "2026-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let snapshot = Snapshot::new("o", "r", at, at, vec![]);
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["meta"]["merged_after"], "2026-01-01T00:00:00Z");
        assert_eq!(json["meta"]["count_prs"], 0);
    }
}
