#![deny(unsafe_code)]

//! The review state machine.
//!
//! `PENDING -> APPROVED` and `PENDING -> REJECTED` are the only legal
//! transitions, each taken at most once per submission. The workflow
//! enforces the status preconditions itself regardless of caller identity;
//! role checks belong to the boundary.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use trs_model::{GridStructure, Submission, SubmissionId, SubmissionStatus, UserId};

use crate::error::{ReviewError, Result};
use crate::history::SubmissionHistory;

/// Minimum trimmed comment length required to reject.
pub const MIN_REJECT_COMMENT_CHARS: usize = 5;

/// Maximum comment length for any decision.
pub const MAX_COMMENT_CHARS: usize = 500;

/// A reviewer's verdict on the pending submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl ReviewDecision {
    fn terminal_status(self) -> SubmissionStatus {
        match self {
            ReviewDecision::Approved => SubmissionStatus::Approved,
            ReviewDecision::Rejected => SubmissionStatus::Rejected,
        }
    }
}

/// Input to [`ReviewWorkflow::decide`].
#[derive(Debug, Clone)]
pub struct ReviewRequest {
    pub decision: ReviewDecision,
    pub reviewer: UserId,
    pub comment: Option<String>,
}

/// Guarded transition functions with the comment-length policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewWorkflow {
    min_reject_comment: usize,
    max_comment: usize,
}

impl Default for ReviewWorkflow {
    fn default() -> Self {
        Self {
            min_reject_comment: MIN_REJECT_COMMENT_CHARS,
            max_comment: MAX_COMMENT_CHARS,
        }
    }
}

impl ReviewWorkflow {
    pub fn new(min_reject_comment: usize, max_comment: usize) -> Self {
        Self {
            min_reject_comment,
            max_comment,
        }
    }

    /// Apply a reviewer decision to the current pending submission.
    ///
    /// On success the submission becomes terminal and immutable: status,
    /// reviewer, comment, and `reviewed_at` are stamped in one step.
    pub fn decide<'a>(
        &self,
        history: &'a mut SubmissionHistory,
        request: ReviewRequest,
    ) -> Result<&'a Submission> {
        {
            let current = history.current()?;
            if !current.is_pending() {
                return Err(ReviewError::NoPendingSubmission {
                    current_status: current.status,
                });
            }
        }

        let comment = normalize_comment(request.comment);
        if let Some(text) = &comment {
            let len = text.chars().count();
            if len > self.max_comment {
                return Err(ReviewError::CommentTooLong {
                    len,
                    max_len: self.max_comment,
                });
            }
        }
        if request.decision == ReviewDecision::Rejected {
            let len = comment.as_deref().map_or(0, |text| text.chars().count());
            if len < self.min_reject_comment {
                return Err(ReviewError::CommentRequired {
                    min_len: self.min_reject_comment,
                });
            }
        }

        let current = history.current_mut()?;
        current.status = request.decision.terminal_status();
        current.reviewer = Some(request.reviewer);
        current.review_comment = comment;
        current.reviewed_at = Some(Utc::now());
        tracing::info!(
            template = %current.template_id,
            submission = %current.id,
            version = current.version,
            status = %current.status,
            "review decision recorded"
        );
        Ok(&*current)
    }

    /// Open a new review round after a rejection.
    ///
    /// Legal only when the current submission is `Rejected`; the new
    /// submission re-enters `PENDING` and all prior submissions stay
    /// untouched.
    pub fn resubmit<'a>(
        &self,
        history: &'a mut SubmissionHistory,
        id: SubmissionId,
        structure: GridStructure,
    ) -> Result<&'a Submission> {
        {
            let current = history.current()?;
            if current.status != SubmissionStatus::Rejected {
                return Err(ReviewError::NotRejected {
                    current_status: current.status,
                });
            }
        }
        history.start_new(id, structure)
    }
}

fn normalize_comment(comment: Option<String>) -> Option<String> {
    comment.and_then(|text| {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
