//! Serializable store snapshot.
//!
//! This is the logical shape persisted to `.trs` files; it round-trips
//! losslessly through JSON and is rebuilt into a live store with full
//! revalidation of every history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use trs_model::{Submission, TemplateRequest};

/// Schema version written to new store files.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Canonical store file extension.
pub const STORE_EXTENSION: &str = "trs";

/// Root structure of a `.trs` store file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Schema version (for future migrations).
    pub schema_version: u32,

    /// When the store was last saved, RFC 3339.
    pub saved_at: String,

    pub next_template_id: u64,
    pub next_submission_id: u64,

    pub templates: Vec<TemplateRecord>,
}

impl StoreSnapshot {
    pub fn empty() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            saved_at: Utc::now().to_rfc3339(),
            next_template_id: 1,
            next_submission_id: 1,
            templates: Vec::new(),
        }
    }

    /// Update the last saved timestamp.
    pub fn touch(&mut self) {
        self.saved_at = Utc::now().to_rfc3339();
    }

    /// Parse the saved_at timestamp.
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.saved_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// One template request plus its full submission log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRecord {
    pub request: TemplateRequest,
    /// Ascending by version, exactly as the history stores them.
    pub submissions: Vec<Submission>,
}
