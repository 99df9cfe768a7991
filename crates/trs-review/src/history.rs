#![deny(unsafe_code)]

//! Append-only submission history for one template.
//!
//! Submissions are stored ascending by version and displayed newest-first.
//! Versions are derived from position at append time and never reassigned;
//! the "current" submission is the one with the highest version.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use trs_model::{GridStructure, Submission, SubmissionId, SubmissionStatus, TemplateId};

use crate::error::{ReviewError, Result};

/// Ordered, append-only collection of a template's submissions.
///
/// Deliberately not deserializable: persisted submissions re-enter through
/// [`SubmissionHistory::from_submissions`], which revalidates them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionHistory {
    template_id: TemplateId,
    /// Ascending by version; the last element is the current submission.
    submissions: Vec<Submission>,
}

impl SubmissionHistory {
    pub fn new(template_id: TemplateId) -> Self {
        Self {
            template_id,
            submissions: Vec::new(),
        }
    }

    /// Rebuild a history from persisted submissions, revalidating the
    /// invariants the engine normally enforces at append time.
    pub fn from_submissions(
        template_id: TemplateId,
        submissions: Vec<Submission>,
    ) -> Result<Self> {
        let corrupt = |detail: String| ReviewError::CorruptHistory {
            template: template_id,
            detail,
        };
        let last_index = submissions.len().saturating_sub(1);
        for (index, submission) in submissions.iter().enumerate() {
            if submission.template_id != template_id {
                return Err(corrupt(format!(
                    "submission {} belongs to template {}",
                    submission.id, submission.template_id
                )));
            }
            let expected_version = index as u32 + 1;
            if submission.version != expected_version {
                return Err(corrupt(format!(
                    "submission {} has version {}, expected {}",
                    submission.id, submission.version, expected_version
                )));
            }
            match submission.status {
                SubmissionStatus::Pending => {
                    if index != last_index {
                        return Err(corrupt(format!(
                            "pending submission {} is not the newest version",
                            submission.id
                        )));
                    }
                    if submission.reviewer.is_some()
                        || submission.review_comment.is_some()
                        || submission.reviewed_at.is_some()
                    {
                        return Err(corrupt(format!(
                            "pending submission {} carries review metadata",
                            submission.id
                        )));
                    }
                }
                SubmissionStatus::Approved | SubmissionStatus::Rejected => {
                    if submission.reviewer.is_none() || submission.reviewed_at.is_none() {
                        return Err(corrupt(format!(
                            "reviewed submission {} is missing reviewer metadata",
                            submission.id
                        )));
                    }
                    if submission.status == SubmissionStatus::Rejected
                        && submission
                            .review_comment
                            .as_deref()
                            .is_none_or(|comment| comment.trim().is_empty())
                    {
                        return Err(corrupt(format!(
                            "rejected submission {} has no review comment",
                            submission.id
                        )));
                    }
                }
            }
        }
        Ok(Self {
            template_id,
            submissions,
        })
    }

    pub fn template_id(&self) -> TemplateId {
        self.template_id
    }

    pub fn len(&self) -> usize {
        self.submissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.submissions.is_empty()
    }

    /// Highest version in the history, 0 when empty.
    pub fn max_version(&self) -> u32 {
        self.submissions.last().map_or(0, |s| s.version)
    }

    /// The submission with the highest version.
    pub fn current(&self) -> Result<&Submission> {
        self.submissions
            .last()
            .ok_or(ReviewError::EmptyHistory {
                template: self.template_id,
            })
    }

    pub(crate) fn current_mut(&mut self) -> Result<&mut Submission> {
        self.submissions
            .last_mut()
            .ok_or(ReviewError::EmptyHistory {
                template: self.template_id,
            })
    }

    /// Any submission still in review.
    pub fn pending(&self) -> Option<&Submission> {
        self.submissions.iter().find(|s| s.is_pending())
    }

    /// Submissions ascending by version.
    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    /// Lazy, restartable newest-first view.
    pub fn newest_first(&self) -> impl Iterator<Item = &Submission> {
        self.submissions.iter().rev()
    }

    /// Append a fresh pending submission with `version = max_version + 1`.
    ///
    /// The check and the append run on the same borrow; callers serialize
    /// access per template, so check-then-append is atomic.
    pub fn start_new(
        &mut self,
        id: SubmissionId,
        structure: GridStructure,
    ) -> Result<&Submission> {
        if let Some(pending) = self.pending() {
            return Err(ReviewError::ConcurrentPendingSubmission {
                template: self.template_id,
                pending: pending.id,
            });
        }
        let version = self.max_version() + 1;
        tracing::info!(
            template = %self.template_id,
            submission = %id,
            version,
            "submission entered review"
        );
        let index = self.submissions.len();
        self.submissions.push(Submission::pending(
            id,
            self.template_id,
            version,
            structure,
            Utc::now(),
        ));
        Ok(&self.submissions[index])
    }

    /// Human-readable label: `"Current"` for the newest version, `v<N>`
    /// otherwise.
    ///
    /// `N` counts from the oldest end of the newest-first view, so labels
    /// of older versions stay stable as new versions are appended.
    pub fn version_label(&self, submission: &Submission) -> String {
        let total = self.submissions.len();
        match self.newest_first().position(|s| s.id == submission.id) {
            Some(0) => "Current".to_string(),
            Some(index) => format!("v{}", total - index),
            None => format!("v{}", submission.version),
        }
    }

    /// Newest-first window for pagination, with the total count alongside.
    pub fn page(&self, offset: usize, limit: usize) -> HistoryPage {
        let entries = self
            .newest_first()
            .skip(offset)
            .take(limit)
            .map(|submission| HistoryEntry {
                label: self.version_label(submission),
                submission: submission.clone(),
            })
            .collect();
        HistoryPage {
            total: self.submissions.len(),
            offset,
            entries,
        }
    }
}

/// One row of a paginated history view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub label: String,
    pub submission: Submission,
}

/// A finite window over a history, newest-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPage {
    pub total: usize,
    pub offset: usize,
    pub entries: Vec<HistoryEntry>,
}
