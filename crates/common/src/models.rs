//! Domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Login used when GitHub gives us no author (deleted accounts, ghosts)
pub const UNKNOWN_LOGIN: &str = "unknown";

/// One merged pull request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequestRecord {
    pub number: u64,
    pub title: Option<String>,
    pub url: Option<String>,
    pub author_login: String,
    pub created_at: Option<DateTime<Utc>>,
    pub merged_at: Option<DateTime<Utc>>,
    pub additions: u64,
    pub deletions: u64,
    pub changed_files: u64,
}

impl PullRequestRecord {
    /// Lines added plus lines deleted
    pub fn size_raw(&self) -> u64 {
        self.additions.saturating_add(self.deletions)
    }

    /// `ln(1 + size_raw)`, compresses the heavy tail of PR sizes
    pub fn size_log(&self) -> f64 {
        (self.size_raw() as f64).ln_1p()
    }

    /// Hours from creation to merge, if both timestamps are known
    pub fn cycle_time_hours(&self) -> Option<f64> {
        match (self.created_at, self.merged_at) {
            (Some(created), Some(merged)) => {
                Some((merged - created).num_milliseconds() as f64 / 3_600_000.0)
            }
            _ => None,
        }
    }
}

/// One review action on a pull request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewEventRecord {
    pub pr_number: u64,
    pub pr_url: Option<String>,
    pub pr_author_login: String,
    pub reviewer_login: String,
    pub review_state: Option<ReviewState>,
    pub review_created_at: Option<DateTime<Utc>>,
    pub pr_merged_at: Option<DateTime<Utc>>,
}

impl ReviewEventRecord {
    /// True iff the owning PR has a valid merge timestamp
    pub fn is_merged_pr(&self) -> bool {
        self.pr_merged_at.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    Approved,
    ChangesRequested,
    Commented,
    Dismissed,
    Pending,
    #[serde(untagged)]
    Other(String),
}

impl ReviewState {
    /// Parse the GraphQL `PullRequestReviewState` value
    pub fn from_github(state: &str) -> Self {
        match state {
            "APPROVED" => Self::Approved,
            "CHANGES_REQUESTED" => Self::ChangesRequested,
            "COMMENTED" => Self::Commented,
            "DISMISSED" => Self::Dismissed,
            "PENDING" => Self::Pending,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Approved => "APPROVED",
            Self::ChangesRequested => "CHANGES_REQUESTED",
            Self::Commented => "COMMENTED",
            Self::Dismissed => "DISMISSED",
            Self::Pending => "PENDING",
            Self::Other(s) => s,
        }
    }
}

/// Caller-supplied weights for the three sub-scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub shipping: f64,
    pub collaboration: f64,
    pub speed: f64,
}

impl Weights {
    pub const DEFAULT: Weights = Weights {
        shipping: 0.55,
        collaboration: 0.30,
        speed: 0.15,
    };

    pub fn new(shipping: f64, collaboration: f64, speed: f64) -> Self {
        Self {
            shipping,
            collaboration,
            speed,
        }
    }

    /// Rescale so the weights sum to 1.
    ///
    /// Negative and non-finite inputs count as 0. If nothing is left the
    /// default weights are used instead.
    pub fn normalized(self) -> Self {
        fn clean(w: f64) -> f64 {
            if w.is_finite() && w > 0.0 {
                w
            } else {
                0.0
            }
        }

        let shipping = clean(self.shipping);
        let collaboration = clean(self.collaboration);
        let speed = clean(self.speed);
        let largest = shipping.max(collaboration).max(speed);

        if largest == 0.0 {
            return Self::DEFAULT.normalized();
        }

        // Scale into [0, 1] first so the sum cannot overflow
        let scaled = Self::new(shipping / largest, collaboration / largest, speed / largest);
        let total = scaled.sum();

        Self {
            shipping: scaled.shipping / total,
            collaboration: scaled.collaboration / total,
            speed: scaled.speed / total,
        }
    }

    pub fn sum(&self) -> f64 {
        self.shipping + self.collaboration + self.speed
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Raw per-engineer aggregates, 0 when the engineer has no qualifying records
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineerAggregates {
    pub merged_pr_count: u32,
    pub avg_pr_size_log: f64,
    pub avg_changed_files: f64,
    pub median_cycle_time_hours: f64,
    pub reviews_authored: u32,
    pub prs_reviewed_that_merged: u32,
}

/// Population z-scores of the aggregates. `z_speed` is the negated z-score of
/// the median cycle time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ZScores {
    pub z_merged_pr_count: f64,
    pub z_avg_pr_size_log: f64,
    pub z_avg_changed_files: f64,
    pub z_reviews_authored: f64,
    pub z_prs_reviewed_that_merged: f64,
    pub z_speed: f64,
}

/// Sub-scores multiplied by their normalized weights
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeightedContributions {
    pub w_shipping: f64,
    pub w_collaboration: f64,
    pub w_speed: f64,
}

/// One engineer's scores within a single computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineerScoreRow {
    pub engineer_login: String,
    #[serde(flatten)]
    pub aggregates: EngineerAggregates,
    #[serde(flatten)]
    pub z: ZScores,
    pub shipping_score: f64,
    pub collaboration_score: f64,
    pub speed_score: f64,
    #[serde(flatten)]
    pub weighted: WeightedContributions,
    pub impact_score: f64,
    /// 1-based position after ranking
    pub rank: u32,
}

/// Headline numbers about a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotSummary {
    pub owner: String,
    pub repo: String,
    pub merged_after: DateTime<Utc>,
    pub fetched_at: DateTime<Utc>,
    pub prs_analyzed: usize,
    pub unique_authors: usize,
    pub unique_reviewers: usize,
}
