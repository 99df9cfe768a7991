pub mod access;
pub mod error;
pub mod grid;
pub mod ids;
pub mod submission;
pub mod template;

pub use access::{AccessClass, CellClass, FULL_TAG_THRESHOLD, GATE_TAG, PermissionPolicy, classify};
pub use error::{MergeRegionIssue, ModelError, Result};
pub use grid::{CellValue, GridDims, GridStructure, MergeRegion, TagSet};
pub use ids::{DepartmentId, EquipmentId, SubmissionId, TemplateId, UserId};
pub use submission::{Submission, SubmissionStatus};
pub use template::TemplateRequest;

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn submission_round_trips_through_json() {
        let structure = GridStructure::new(
            vec![vec![CellValue::text("Reading"), CellValue::Number(17.0)]],
            vec![vec![
                TagSet::from_tags(["operator", "editor", "viewer"]).unwrap(),
                TagSet::new(),
            ]],
            Vec::new(),
        )
        .expect("valid grid");
        let submission = Submission::pending(
            SubmissionId::new(9),
            TemplateId::new(3),
            1,
            structure,
            Utc::now(),
        );
        let json = serde_json::to_string(&submission).expect("serialize submission");
        let round: Submission = serde_json::from_str(&json).expect("deserialize submission");
        assert_eq!(round, submission);
    }
}
