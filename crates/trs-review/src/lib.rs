pub mod error;
pub mod history;
pub mod workflow;

pub use error::{ReviewError, Result};
pub use history::{HistoryEntry, HistoryPage, SubmissionHistory};
pub use workflow::{
    MAX_COMMENT_CHARS, MIN_REJECT_COMMENT_CHARS, ReviewDecision, ReviewRequest, ReviewWorkflow,
};
