//! A scored snapshot, ready to be recombined and rendered

use common::models::{EngineerScoreRow, SnapshotSummary, Weights};
use common::snapshot::Snapshot;
use serde::Serialize;
use tracing::info;

use crate::{normalize, scoring};

/// Everything the report needs from one snapshot. Built once per snapshot;
/// weight changes only go through [`Report::ranked`].
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub summary: SnapshotSummary,
    /// Rows ranked under the default weights
    pub rows: Vec<EngineerScoreRow>,
}

impl Report {
    pub fn build(snapshot: &Snapshot) -> Self {
        let prs = normalize::build_pr_records(snapshot);
        let reviews = normalize::build_review_records(snapshot);
        let summary = normalize::summarize(snapshot, &prs, &reviews);
        let rows = scoring::score(&prs, &reviews);

        info!(
            "Scored {} engineers from {} PRs and {} reviews",
            rows.len(),
            prs.len(),
            reviews.len()
        );

        Self { summary, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows recombined and ranked under `weights`
    pub fn ranked(&self, weights: Weights) -> Vec<EngineerScoreRow> {
        scoring::combine(&self.rows, weights)
    }
}
