use thiserror::Error;

use trs_model::{SubmissionId, SubmissionStatus, TemplateId};

#[derive(Debug, Error)]
pub enum ReviewError {
    /// The review gate: a template may carry at most one pending
    /// submission at a time.
    #[error("template {template} already has pending submission {pending}")]
    ConcurrentPendingSubmission {
        template: TemplateId,
        pending: SubmissionId,
    },

    #[error("template {template} has no submissions")]
    EmptyHistory { template: TemplateId },

    #[error("no pending submission to review: current version is {current_status}")]
    NoPendingSubmission { current_status: SubmissionStatus },

    #[error("rejection requires a comment of at least {min_len} characters")]
    CommentRequired { min_len: usize },

    #[error("review comment is {len} characters, maximum is {max_len}")]
    CommentTooLong { len: usize, max_len: usize },

    #[error("resubmission requires a rejected current version, found {current_status}")]
    NotRejected { current_status: SubmissionStatus },

    /// Optimistic concurrency check failed: another writer advanced the
    /// history since the caller last read it.
    #[error("stale version for template {template}: expected {expected}, current is {actual}")]
    StaleVersion {
        template: TemplateId,
        expected: u32,
        actual: u32,
    },

    /// Persisted submissions failed revalidation while rebuilding a
    /// history.
    #[error("corrupt history for template {template}: {detail}")]
    CorruptHistory { template: TemplateId, detail: String },
}

pub type Result<T> = std::result::Result<T, ReviewError>;
