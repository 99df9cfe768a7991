#![deny(unsafe_code)]

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::grid::GridStructure;
use crate::ids::{SubmissionId, TemplateId, UserId};

/// Lifecycle status of a submission.
///
/// A submission leaves `Pending` exactly once; both other states are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "PENDING",
            SubmissionStatus::Approved => "APPROVED",
            SubmissionStatus::Rejected => "REJECTED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, SubmissionStatus::Pending)
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable version of a template's grid, under review or reviewed.
///
/// Reviewer fields are populated only when the submission leaves
/// `Pending`; after that transition the record is never edited again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    pub template_id: TemplateId,
    /// Position in the template's history, 1-based.
    pub version: u32,
    pub structure: GridStructure,
    pub status: SubmissionStatus,
    pub reviewer: Option<UserId>,
    pub review_comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl Submission {
    /// A fresh submission entering review.
    pub fn pending(
        id: SubmissionId,
        template_id: TemplateId,
        version: u32,
        structure: GridStructure,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            template_id,
            version,
            structure,
            status: SubmissionStatus::Pending,
            reviewer: None,
            review_comment: None,
            created_at,
            reviewed_at: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == SubmissionStatus::Pending
    }
}
