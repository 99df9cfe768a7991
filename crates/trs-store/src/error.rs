//! Store error types.
//!
//! Engine failures pass through unchanged so the boundary can match on
//! the review taxonomy; file persistence adds its own structured variants.

use std::path::PathBuf;

use thiserror::Error;

use trs_model::{ModelError, TemplateId};
use trs_review::ReviewError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Review(#[from] ReviewError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("unknown template: {template}")]
    UnknownTemplate { template: TemplateId },

    /// File I/O error.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Not a .trs store file.
    #[error("Invalid store file format: {path}")]
    InvalidFormat { path: PathBuf, reason: String },

    /// Store file written by a newer release.
    #[error("Store file version {found} is not supported (maximum: {max_supported})")]
    UnsupportedVersion {
        found: u32,
        max_supported: u32,
        path: PathBuf,
    },

    #[error("Failed to serialize store data")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to deserialize store data")]
    Deserialization {
        #[source]
        source: serde_json::Error,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("Failed to complete save operation")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store lock poisoned")]
    LockPoisoned,
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
