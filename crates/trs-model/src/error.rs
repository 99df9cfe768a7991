use thiserror::Error;

use crate::grid::{GridDims, MergeRegion};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("grid shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch { expected: GridDims, found: GridDims },

    #[error("invalid merge region {region}: {reason}")]
    InvalidMergeRegion {
        region: MergeRegion,
        reason: MergeRegionIssue,
    },

    #[error("template name must not be empty: {0:?}")]
    InvalidTemplateName(String),

    #[error("{kind} must not be empty: {value:?}")]
    InvalidIdentifier { kind: &'static str, value: String },

    #[error("capability tag must not be empty: {0:?}")]
    InvalidTag(String),
}

/// Why a merge region was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MergeRegionIssue {
    #[error("row span and column span must be at least 1")]
    EmptySpan,

    #[error("extends outside a {rows}x{cols} grid")]
    OutOfBounds { rows: usize, cols: usize },

    #[error("overlaps region {other}")]
    Overlap { other: MergeRegion },
}

pub type Result<T> = std::result::Result<T, ModelError>;
