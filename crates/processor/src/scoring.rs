//! Engineer impact scoring
//!
//! Scoring runs in two phases:
//!
//! 1. [`score`] aggregates PR and review records per engineer, z-scores every
//!    aggregate column across the engineer set and folds the z-scores into
//!    three sub-scores (shipping, collaboration, speed).
//! 2. [`combine`] turns the sub-scores into an impact score with
//!    caller-supplied weights and ranks the engineers.
//!
//! Phase 1 is the expensive part and runs once per snapshot. Phase 2 is a
//! weighted sum and a sort, cheap enough to rerun on every weight change.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashSet};

use common::models::{
    EngineerAggregates, EngineerScoreRow, PullRequestRecord, ReviewEventRecord,
    WeightedContributions, Weights, ZScores,
};

use crate::stats;

// Fixed sub-score composition
const SHIPPING_PR_COUNT: f64 = 0.5;
const SHIPPING_PR_SIZE: f64 = 0.3;
const SHIPPING_CHANGED_FILES: f64 = 0.2;
const COLLAB_REVIEWS: f64 = 0.6;
const COLLAB_MERGED_PRS: f64 = 0.4;

#[derive(Default)]
struct ShippingTally {
    merged_prs: u32,
    size_log_sum: f64,
    changed_files_sum: f64,
    cycle_times: Vec<f64>,
}

#[derive(Default)]
struct ReviewTally {
    reviews: u32,
    merged_prs: HashSet<u64>,
}

/// Per-engineer raw aggregates, in ascending login order.
///
/// The engineer set is every PR author plus every reviewer. Anyone missing
/// from one side gets zeros for that side's aggregates.
pub fn aggregate(
    prs: &[PullRequestRecord],
    reviews: &[ReviewEventRecord],
) -> Vec<(String, EngineerAggregates)> {
    let mut shipping: BTreeMap<&str, ShippingTally> = BTreeMap::new();
    for pr in prs {
        let tally = shipping.entry(pr.author_login.as_str()).or_default();
        tally.merged_prs += 1;
        tally.size_log_sum += pr.size_log();
        tally.changed_files_sum += pr.changed_files as f64;
        if let Some(hours) = pr.cycle_time_hours() {
            tally.cycle_times.push(hours);
        }
    }

    let mut reviewing: BTreeMap<&str, ReviewTally> = BTreeMap::new();
    for review in reviews {
        let tally = reviewing.entry(review.reviewer_login.as_str()).or_default();
        tally.reviews += 1;
        // Several review rounds on one PR count once
        if review.is_merged_pr() {
            tally.merged_prs.insert(review.pr_number);
        }
    }

    let logins: BTreeSet<&str> = shipping
        .keys()
        .chain(reviewing.keys())
        .copied()
        .collect();

    logins
        .into_iter()
        .map(|login| {
            let mut agg = EngineerAggregates::default();

            if let Some(tally) = shipping.get(login) {
                let n = tally.merged_prs as f64;
                agg.merged_pr_count = tally.merged_prs;
                agg.avg_pr_size_log = tally.size_log_sum / n;
                agg.avg_changed_files = tally.changed_files_sum / n;
                agg.median_cycle_time_hours = stats::median(&tally.cycle_times).unwrap_or(0.0);
            }

            if let Some(tally) = reviewing.get(login) {
                agg.reviews_authored = tally.reviews;
                agg.prs_reviewed_that_merged = tally.merged_prs.len() as u32;
            }

            (login.to_string(), agg)
        })
        .collect()
}

fn zscore_column<F>(engineers: &[(String, EngineerAggregates)], value: F) -> Vec<f64>
where
    F: Fn(&EngineerAggregates) -> f64,
{
    let column: Vec<f64> = engineers.iter().map(|(_, a)| value(a)).collect();
    stats::zscore(&column)
}

/// Negate a z-score without producing `-0.0`
fn invert(z: f64) -> f64 {
    if z == 0.0 {
        0.0
    } else {
        -z
    }
}

/// Score every engineer in the records.
///
/// Rows come back combined with the default weights and ranked. Empty input
/// yields an empty set.
pub fn score(prs: &[PullRequestRecord], reviews: &[ReviewEventRecord]) -> Vec<EngineerScoreRow> {
    let engineers = aggregate(prs, reviews);
    if engineers.is_empty() {
        return Vec::new();
    }

    let z_merged_pr_count = zscore_column(&engineers, |a| a.merged_pr_count as f64);
    let z_avg_pr_size_log = zscore_column(&engineers, |a| a.avg_pr_size_log);
    let z_avg_changed_files = zscore_column(&engineers, |a| a.avg_changed_files);
    let z_reviews_authored = zscore_column(&engineers, |a| a.reviews_authored as f64);
    let z_prs_reviewed_that_merged =
        zscore_column(&engineers, |a| a.prs_reviewed_that_merged as f64);
    // Lower cycle time is better
    let z_speed: Vec<f64> = zscore_column(&engineers, |a| a.median_cycle_time_hours)
        .into_iter()
        .map(invert)
        .collect();

    let rows: Vec<EngineerScoreRow> = engineers
        .into_iter()
        .enumerate()
        .map(|(i, (login, aggregates))| {
            let z = ZScores {
                z_merged_pr_count: z_merged_pr_count[i],
                z_avg_pr_size_log: z_avg_pr_size_log[i],
                z_avg_changed_files: z_avg_changed_files[i],
                z_reviews_authored: z_reviews_authored[i],
                z_prs_reviewed_that_merged: z_prs_reviewed_that_merged[i],
                z_speed: z_speed[i],
            };

            let shipping_score = SHIPPING_PR_COUNT * z.z_merged_pr_count
                + SHIPPING_PR_SIZE * z.z_avg_pr_size_log
                + SHIPPING_CHANGED_FILES * z.z_avg_changed_files;
            let collaboration_score = COLLAB_REVIEWS * z.z_reviews_authored
                + COLLAB_MERGED_PRS * z.z_prs_reviewed_that_merged;
            let speed_score = z.z_speed;

            EngineerScoreRow {
                engineer_login: login,
                aggregates,
                z,
                shipping_score,
                collaboration_score,
                speed_score,
                weighted: WeightedContributions::default(),
                impact_score: 0.0,
                rank: 0,
            }
        })
        .collect();

    combine(&rows, Weights::DEFAULT)
}

/// Weight the sub-scores, sort by impact and assign ranks.
///
/// Weights are normalized to sum to 1 (all zero means the defaults). The sort
/// is stable: engineers with equal impact keep their relative input order.
pub fn combine(rows: &[EngineerScoreRow], weights: Weights) -> Vec<EngineerScoreRow> {
    let w = weights.normalized();

    let mut ranked: Vec<EngineerScoreRow> = rows
        .iter()
        .cloned()
        .map(|mut row| {
            row.weighted = WeightedContributions {
                w_shipping: w.shipping * row.shipping_score,
                w_collaboration: w.collaboration * row.collaboration_score,
                w_speed: w.speed * row.speed_score,
            };
            row.impact_score =
                row.weighted.w_shipping + row.weighted.w_collaboration + row.weighted.w_speed;
            row
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.impact_score
            .partial_cmp(&a.impact_score)
            .unwrap_or(Ordering::Equal)
    });

    for (i, row) in ranked.iter_mut().enumerate() {
        row.rank = i as u32 + 1;
    }

    ranked
}

/// The first `k` rows of a ranked set
pub fn top_engineers(rows: &[EngineerScoreRow], k: usize) -> &[EngineerScoreRow] {
    &rows[..k.min(rows.len())]
}

/// Look up one engineer by login
pub fn find_engineer<'a>(
    rows: &'a [EngineerScoreRow],
    login: &str,
) -> Option<&'a EngineerScoreRow> {
    rows.iter().find(|r| r.engineer_login == login)
}
