//! Snapshot -> flat PR and review records

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use common::models::{
    PullRequestRecord, ReviewEventRecord, ReviewState, SnapshotSummary, UNKNOWN_LOGIN,
};
use common::snapshot::{RawActor, RawPullRequest, Snapshot};
use tracing::debug;

/// Parse an ISO-8601 timestamp. Anything unparseable is treated as missing.
pub fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = value?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(e) => {
            debug!("Ignoring unparseable timestamp {:?}: {}", raw, e);
            None
        }
    }
}

/// Login of an actor, or `"unknown"` when the actor, its login, or the login
/// text is missing
pub fn login_or_unknown(actor: Option<&RawActor>) -> String {
    match actor.and_then(|a| a.login.as_deref()) {
        Some(login) if !login.is_empty() => login.to_string(),
        Some(_) => UNKNOWN_LOGIN.to_string(),
        None => UNKNOWN_LOGIN.to_string(),
    }
}

fn pr_record(pr: &RawPullRequest) -> PullRequestRecord {
    PullRequestRecord {
        number: pr.number,
        title: pr.title.clone(),
        url: pr.url.clone(),
        author_login: login_or_unknown(pr.author.as_ref()),
        created_at: parse_timestamp(pr.created_at.as_deref()),
        merged_at: parse_timestamp(pr.merged_at.as_deref()),
        additions: pr.additions.unwrap_or(0),
        deletions: pr.deletions.unwrap_or(0),
        changed_files: pr.changed_files.unwrap_or(0),
    }
}

/// One record per pull request in the snapshot
pub fn build_pr_records(snapshot: &Snapshot) -> Vec<PullRequestRecord> {
    snapshot.pull_requests.iter().map(pr_record).collect()
}

/// One record per review event, across all pull requests in the snapshot
pub fn build_review_records(snapshot: &Snapshot) -> Vec<ReviewEventRecord> {
    let mut records = Vec::new();

    for pr in &snapshot.pull_requests {
        let nodes = match pr.reviews.as_ref().and_then(|r| r.nodes.as_ref()) {
            Some(nodes) => nodes,
            None => continue,
        };

        let pr_author_login = login_or_unknown(pr.author.as_ref());
        let pr_merged_at = parse_timestamp(pr.merged_at.as_deref());

        for review in nodes {
            let review_state = review.state.as_deref().map(ReviewState::from_github);
            if let Some(state @ ReviewState::Other(_)) = &review_state {
                debug!("Unrecognized review state {} on PR #{}", state.as_str(), pr.number);
            }

            records.push(ReviewEventRecord {
                pr_number: pr.number,
                pr_url: pr.url.clone(),
                pr_author_login: pr_author_login.clone(),
                reviewer_login: login_or_unknown(review.author.as_ref()),
                review_state,
                review_created_at: parse_timestamp(review.created_at.as_deref()),
                pr_merged_at,
            });
        }
    }

    records
}

/// Headline counts for the report header
pub fn summarize(
    snapshot: &Snapshot,
    prs: &[PullRequestRecord],
    reviews: &[ReviewEventRecord],
) -> SnapshotSummary {
    let unique_authors: HashSet<&str> = prs.iter().map(|p| p.author_login.as_str()).collect();
    let unique_reviewers: HashSet<&str> =
        reviews.iter().map(|r| r.reviewer_login.as_str()).collect();

    SnapshotSummary {
        owner: snapshot.meta.owner.clone(),
        repo: snapshot.meta.repo.clone(),
        merged_after: snapshot.meta.merged_after,
        fetched_at: snapshot.meta.fetched_at,
        prs_analyzed: prs.len(),
        unique_authors: unique_authors.len(),
        unique_reviewers: unique_reviewers.len(),
    }
}
