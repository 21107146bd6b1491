#[cfg(test)]
mod tests {
    use crate::normalize::*;
    use chrono::{TimeZone, Utc};
    use common::models::{ReviewState, UNKNOWN_LOGIN};
    use common::snapshot::{RawActor, RawPullRequest, RawReview, RawReviewConnection, Snapshot};

    fn make_pr(number: u64, author: Option<&str>) -> RawPullRequest {
        RawPullRequest {
            number,
            title: Some(format!("PR {}", number)),
            url: Some(format!("https://github.com/o/r/pull/{}", number)),
            created_at: Some("2026-02-01T10:00:00Z".to_string()),
            merged_at: Some("2026-02-01T16:00:00Z".to_string()),
            additions: Some(10),
            deletions: Some(2),
            changed_files: Some(3),
            author: author.map(RawActor::new),
            reviews: None,
        }
    }

    fn make_review(login: Option<&str>, state: &str) -> RawReview {
        RawReview {
            author: login.map(RawActor::new),
            state: Some(state.to_string()),
            created_at: Some("2026-02-01T12:00:00Z".to_string()),
        }
    }

    fn snapshot_of(prs: Vec<RawPullRequest>) -> Snapshot {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        Snapshot::new("o", "r", at, at, prs)
    }

    // parse_timestamp tests
    #[test]
    fn test_parse_timestamp_valid() {
        assert_eq!(
            parse_timestamp(Some("2026-02-01T10:00:00Z")),
            Some(Utc.with_ymd_and_hms(2026, 2, 1, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_timestamp_offset_is_converted_to_utc() {
        assert_eq!(
            parse_timestamp(Some("2026-02-01T12:00:00+02:00")),
            Some(Utc.with_ymd_and_hms(2026, 2, 1, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_timestamp_missing_or_garbage() {
        assert_eq!(parse_timestamp(None), None);
        assert_eq!(parse_timestamp(Some("")), None);
        assert_eq!(parse_timestamp(Some("yesterday")), None);
    }

    // login_or_unknown tests
    #[test]
    fn test_login_or_unknown() {
        assert_eq!(login_or_unknown(Some(&RawActor::new("alice"))), "alice");
        assert_eq!(login_or_unknown(Some(&RawActor::new(""))), UNKNOWN_LOGIN);
        assert_eq!(login_or_unknown(Some(&RawActor { login: None })), UNKNOWN_LOGIN);
        assert_eq!(login_or_unknown(None), UNKNOWN_LOGIN);
    }

    // build_pr_records tests
    #[test]
    fn test_pr_record_fields() {
        let records = build_pr_records(&snapshot_of(vec![make_pr(7, Some("alice"))]));
        assert_eq!(records.len(), 1);

        let pr = &records[0];
        assert_eq!(pr.number, 7);
        assert_eq!(pr.author_login, "alice");
        assert_eq!(pr.size_raw(), 12);
        assert!((pr.size_log() - 13f64.ln()).abs() < 1e-12);
        assert_eq!(pr.changed_files, 3);
        assert!((pr.cycle_time_hours().unwrap() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_pr_record_defaults() {
        let mut raw = make_pr(8, None);
        raw.additions = None;
        raw.deletions = None;
        raw.changed_files = None;
        raw.merged_at = Some("garbage".to_string());

        let records = build_pr_records(&snapshot_of(vec![raw]));
        let pr = &records[0];
        assert_eq!(pr.author_login, UNKNOWN_LOGIN);
        assert_eq!(pr.size_raw(), 0);
        assert_eq!(pr.size_log(), 0.0);
        assert_eq!(pr.changed_files, 0);
        assert_eq!(pr.merged_at, None);
        assert_eq!(pr.cycle_time_hours(), None);
    }

    #[test]
    fn test_empty_snapshot_gives_empty_tables() {
        let snapshot = snapshot_of(vec![]);
        assert!(build_pr_records(&snapshot).is_empty());
        assert!(build_review_records(&snapshot).is_empty());
    }

    // build_review_records tests
    #[test]
    fn test_review_records_link_back_to_pr() {
        let mut pr = make_pr(9, Some("alice"));
        pr.reviews = Some(RawReviewConnection {
            nodes: Some(vec![
                make_review(Some("bob"), "APPROVED"),
                make_review(None, "COMMENTED"),
            ]),
        });

        let reviews = build_review_records(&snapshot_of(vec![pr]));
        assert_eq!(reviews.len(), 2);

        assert_eq!(reviews[0].pr_number, 9);
        assert_eq!(reviews[0].pr_author_login, "alice");
        assert_eq!(reviews[0].reviewer_login, "bob");
        assert_eq!(reviews[0].review_state, Some(ReviewState::Approved));
        assert!(reviews[0].is_merged_pr());

        assert_eq!(reviews[1].reviewer_login, UNKNOWN_LOGIN);
        assert_eq!(reviews[1].review_state, Some(ReviewState::Commented));
    }

    #[test]
    fn test_unrecognized_review_state_is_kept() {
        let mut pr = make_pr(13, Some("alice"));
        pr.reviews = Some(RawReviewConnection {
            nodes: Some(vec![make_review(Some("bob"), "SOMETHING_NEW")]),
        });

        let reviews = build_review_records(&snapshot_of(vec![pr]));
        let state = reviews[0].review_state.as_ref().unwrap();
        assert_eq!(state, &ReviewState::Other("SOMETHING_NEW".to_string()));
        assert_eq!(state.as_str(), "SOMETHING_NEW");
    }

    #[test]
    fn test_review_on_pr_without_merge_time_is_not_merged() {
        let mut pr = make_pr(10, Some("alice"));
        pr.merged_at = None;
        pr.reviews = Some(RawReviewConnection {
            nodes: Some(vec![make_review(Some("bob"), "APPROVED")]),
        });

        let reviews = build_review_records(&snapshot_of(vec![pr]));
        assert!(!reviews[0].is_merged_pr());
    }

    #[test]
    fn test_null_review_connections_yield_no_rows() {
        let mut null_nodes = make_pr(11, Some("alice"));
        null_nodes.reviews = Some(RawReviewConnection { nodes: None });
        let no_reviews = make_pr(12, Some("bob"));

        let reviews = build_review_records(&snapshot_of(vec![null_nodes, no_reviews]));
        assert!(reviews.is_empty());
    }
}
