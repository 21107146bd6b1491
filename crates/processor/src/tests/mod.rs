//! End-to-end tests over a small PostHog-shaped snapshot fixture
//!
//! The fixture has two PRs by alice, one each by bob and carol, and one with
//! a deleted author and broken fields. bob reviews PR 101 twice, dave only
//! ever reviews, and one review on PR 105 has no author.

use common::models::Weights;
use common::snapshot::Snapshot;

use crate::normalize::{build_pr_records, build_review_records, summarize};
use crate::report::Report;
use crate::scoring::{find_engineer, score};

const SMALL_SNAPSHOT: &str = include_str!("fixtures/small_snapshot.json");

pub(crate) fn small_snapshot() -> Snapshot {
    serde_json::from_str(SMALL_SNAPSHOT).expect("Invalid fixture JSON")
}

#[test]
fn test_fixture_record_counts() {
    let snapshot = small_snapshot();
    let prs = build_pr_records(&snapshot);
    let reviews = build_review_records(&snapshot);

    assert_eq!(prs.len(), 5);
    assert_eq!(reviews.len(), 8);

    let summary = summarize(&snapshot, &prs, &reviews);
    assert_eq!(summary.prs_analyzed, 5);
    assert_eq!(summary.unique_authors, 4); // alice, bob, carol, unknown
    assert_eq!(summary.unique_reviewers, 5); // alice, bob, carol, dave, unknown
    assert_eq!(summary.owner, "PostHog");
}

#[test]
fn test_fixture_aggregates() {
    let snapshot = small_snapshot();
    let rows = score(&build_pr_records(&snapshot), &build_review_records(&snapshot));
    assert_eq!(rows.len(), 5);

    let alice = find_engineer(&rows, "alice").unwrap();
    assert_eq!(alice.aggregates.merged_pr_count, 2);
    assert!((alice.aggregates.median_cycle_time_hours - 14.0).abs() < 1e-9);
    assert!((alice.aggregates.avg_changed_files - 3.5).abs() < 1e-9);
    assert_eq!(alice.aggregates.reviews_authored, 2);
    assert_eq!(alice.aggregates.prs_reviewed_that_merged, 1);

    let bob = find_engineer(&rows, "bob").unwrap();
    assert_eq!(bob.aggregates.merged_pr_count, 1);
    assert!((bob.aggregates.median_cycle_time_hours - 2.5).abs() < 1e-9);
    assert_eq!(bob.aggregates.reviews_authored, 3);
    assert_eq!(bob.aggregates.prs_reviewed_that_merged, 2);

    let dave = find_engineer(&rows, "dave").unwrap();
    assert_eq!(dave.aggregates.merged_pr_count, 0);
    assert_eq!(dave.aggregates.avg_pr_size_log, 0.0);
    assert_eq!(dave.aggregates.reviews_authored, 1);
    assert!(dave.z.z_merged_pr_count.is_finite());

    // PR 104 has no author and no created_at, so no cycle time
    let unknown = find_engineer(&rows, "unknown").unwrap();
    assert_eq!(unknown.aggregates.merged_pr_count, 1);
    assert_eq!(unknown.aggregates.median_cycle_time_hours, 0.0);
    assert!((unknown.aggregates.avg_pr_size_log - 6f64.ln()).abs() < 1e-12);
    assert_eq!(unknown.aggregates.reviews_authored, 1);
}

#[test]
fn test_fixture_report_ranks_every_engineer() {
    let report = Report::build(&small_snapshot());
    assert!(!report.is_empty());

    for weights in [
        Weights::DEFAULT,
        Weights::new(1.0, 0.0, 0.0),
        Weights::new(0.0, 1.0, 0.0),
        Weights::new(0.0, 0.0, 1.0),
        Weights::new(0.2, 0.9, 0.4),
    ] {
        let ranked = report.ranked(weights);
        let mut ranks: Vec<u32> = ranked.iter().map(|r| r.rank).collect();
        ranks.sort_unstable();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);

        for pair in ranked.windows(2) {
            assert!(pair[0].impact_score >= pair[1].impact_score);
            assert_eq!(pair[0].rank + 1, pair[1].rank);
        }
    }
}

#[test]
fn test_fixture_z_columns_are_centered() {
    let report = Report::build(&small_snapshot());
    let n = report.rows.len() as f64;
    let mean_z_reviews: f64 = report
        .rows
        .iter()
        .map(|r| r.z.z_reviews_authored)
        .sum::<f64>()
        / n;
    assert!(mean_z_reviews.abs() < 1e-9);
}
