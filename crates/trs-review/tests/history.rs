//! Tests for the append-only submission history.

use trs_model::{
    CellValue, GridStructure, Submission, SubmissionId, SubmissionStatus, TagSet, TemplateId,
    UserId,
};
use trs_review::{
    ReviewDecision, ReviewError, ReviewRequest, ReviewWorkflow, SubmissionHistory,
};

fn grid(label: &str) -> GridStructure {
    GridStructure::new(
        vec![vec![CellValue::text(label)]],
        vec![vec![TagSet::from_tags(["operator"]).unwrap()]],
        Vec::new(),
    )
    .expect("valid grid")
}

fn template() -> TemplateId {
    TemplateId::new(11)
}

fn reject_current(history: &mut SubmissionHistory) {
    ReviewWorkflow::default()
        .decide(
            history,
            ReviewRequest {
                decision: ReviewDecision::Rejected,
                reviewer: UserId::new("u-reviewer").unwrap(),
                comment: Some("needs another pass".to_string()),
            },
        )
        .expect("reject current");
}

/// Drive a history to `count` versions, rejecting every round but the last.
fn history_with_versions(count: u32) -> SubmissionHistory {
    let mut history = SubmissionHistory::new(template());
    for version in 1..=count {
        if version > 1 {
            reject_current(&mut history);
        }
        history
            .start_new(SubmissionId::new(u64::from(version)), grid("cell"))
            .expect("append");
    }
    history
}

#[test]
fn start_new_assigns_version_one() {
    let mut history = SubmissionHistory::new(template());
    let submission = history
        .start_new(SubmissionId::new(1), grid("first"))
        .expect("append");
    assert_eq!(submission.version, 1);
    assert_eq!(submission.status, SubmissionStatus::Pending);
    assert_eq!(history.max_version(), 1);
}

#[test]
fn second_pending_submission_is_refused() {
    let mut history = SubmissionHistory::new(template());
    history
        .start_new(SubmissionId::new(1), grid("first"))
        .expect("append");
    let err = history
        .start_new(SubmissionId::new(2), grid("second"))
        .unwrap_err();
    assert!(matches!(
        err,
        ReviewError::ConcurrentPendingSubmission { .. }
    ));
    assert_eq!(history.len(), 1);
}

#[test]
fn current_on_empty_history_fails() {
    let history = SubmissionHistory::new(template());
    assert!(matches!(
        history.current(),
        Err(ReviewError::EmptyHistory { .. })
    ));
}

#[test]
fn current_tracks_the_highest_version() {
    let history = history_with_versions(3);
    let current = history.current().expect("current");
    assert_eq!(current.version, 3);
    assert!(current.is_pending());
}

#[test]
fn version_labels_count_from_the_oldest() {
    let history = history_with_versions(3);
    let labels: Vec<String> = history
        .newest_first()
        .map(|submission| history.version_label(submission))
        .collect();
    insta::assert_snapshot!(labels.join(", "), @"Current, v2, v1");
}

#[test]
fn labels_stay_stable_as_versions_are_appended() {
    let mut history = history_with_versions(2);
    let oldest_id = history.submissions()[0].id;
    let oldest_before = history.submissions()[0].clone();
    assert_eq!(history.version_label(&oldest_before), "v1");

    reject_current(&mut history);
    history
        .start_new(SubmissionId::new(3), grid("third"))
        .expect("append");

    let oldest = history
        .submissions()
        .iter()
        .find(|s| s.id == oldest_id)
        .expect("oldest still present");
    assert_eq!(history.version_label(oldest), "v1");
}

#[test]
fn page_windows_are_newest_first_with_total() {
    let history = history_with_versions(5);
    let page = history.page(1, 2);
    assert_eq!(page.total, 5);
    assert_eq!(page.offset, 1);
    let versions: Vec<u32> = page.entries.iter().map(|e| e.submission.version).collect();
    assert_eq!(versions, vec![4, 3]);
    let labels: Vec<&str> = page.entries.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, vec!["v4", "v3"]);
}

#[test]
fn page_is_restartable_and_bounded() {
    let history = history_with_versions(3);
    let first = history.page(0, 2);
    let again = history.page(0, 2);
    assert_eq!(first, again);

    let past_end = history.page(10, 5);
    assert_eq!(past_end.total, 3);
    assert!(past_end.entries.is_empty());
}

#[test]
fn history_pages_serialize_for_transport() {
    let history = history_with_versions(2);
    let page = history.page(0, 10);
    let json = serde_json::to_string(&page).expect("serialize page");
    assert!(json.contains("\"total\":2"));
    assert!(json.contains("\"label\":\"Current\""));
}

#[test]
fn rebuilding_from_submissions_round_trips() {
    let history = history_with_versions(3);
    let submissions: Vec<Submission> = history.submissions().to_vec();
    let rebuilt = SubmissionHistory::from_submissions(template(), submissions)
        .expect("valid submissions");
    assert_eq!(rebuilt, history);
}

#[test]
fn rebuilding_rejects_out_of_order_versions() {
    let history = history_with_versions(2);
    let mut submissions: Vec<Submission> = history.submissions().to_vec();
    submissions.swap(0, 1);
    let err = SubmissionHistory::from_submissions(template(), submissions).unwrap_err();
    assert!(matches!(err, ReviewError::CorruptHistory { .. }));
}

#[test]
fn rebuilding_rejects_stale_pending_versions() {
    let history = history_with_versions(2);
    let mut submissions: Vec<Submission> = history.submissions().to_vec();
    // Re-open the rejected first version without touching the newest.
    submissions[0].status = SubmissionStatus::Pending;
    submissions[0].reviewer = None;
    submissions[0].review_comment = None;
    submissions[0].reviewed_at = None;
    let err = SubmissionHistory::from_submissions(template(), submissions).unwrap_err();
    assert!(matches!(err, ReviewError::CorruptHistory { .. }));
}

#[test]
fn rebuilding_rejects_commentless_rejections() {
    let history = history_with_versions(2);
    let mut submissions: Vec<Submission> = history.submissions().to_vec();
    submissions[0].review_comment = None;
    let err = SubmissionHistory::from_submissions(template(), submissions).unwrap_err();
    assert!(matches!(err, ReviewError::CorruptHistory { .. }));
}
