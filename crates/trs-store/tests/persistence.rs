//! End-to-end persistence: live store -> .trs file -> live store.

use tempfile::tempdir;

use trs_model::{
    CellValue, DepartmentId, EquipmentId, GridStructure, MergeRegion, SubmissionStatus, TagSet,
    UserId,
};
use trs_review::{ReviewDecision, ReviewRequest};
use trs_store::{TemplateDetails, TemplateStore, load_store, save_store};

fn details() -> TemplateDetails {
    TemplateDetails {
        template_name: "Press line checks".to_string(),
        description: None,
        department_id: DepartmentId::new("facilities").unwrap(),
        equipment_id: EquipmentId::new("press-04").unwrap(),
        supervisor_id: UserId::new("u-supervisor").unwrap(),
    }
}

fn grid() -> GridStructure {
    GridStructure::new(
        vec![
            vec![CellValue::text("Check"), CellValue::text("Result")],
            vec![CellValue::text("Oil level"), CellValue::Empty],
        ],
        vec![
            vec![
                TagSet::from_tags(["operator", "editor", "viewer"]).unwrap(),
                TagSet::from_tags(["operator"]).unwrap(),
            ],
            vec![TagSet::new(), TagSet::from_tags(["operator", "editor"]).unwrap()],
        ],
        vec![MergeRegion::new(0, 0, 1, 2)],
    )
    .unwrap()
}

#[test]
fn store_survives_a_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("templates.trs");

    let store = TemplateStore::new();
    let created = store.create_template(details(), grid()).unwrap();
    let id = created.request.template_id;
    store
        .decide(
            id,
            Some(1),
            ReviewRequest {
                decision: ReviewDecision::Rejected,
                reviewer: UserId::new("u-reviewer").unwrap(),
                comment: Some("merge the header row differently".to_string()),
            },
        )
        .unwrap();
    store.resubmit(id, Some(1), grid()).unwrap();

    let mut snapshot = store.snapshot().unwrap();
    save_store(&mut snapshot, &path).unwrap();

    let reloaded = TemplateStore::from_snapshot(load_store(&path).unwrap()).unwrap();

    let current = reloaded.current(id).unwrap();
    assert_eq!(current.version, 2);
    assert_eq!(current.status, SubmissionStatus::Pending);
    assert_eq!(current.structure, grid());

    let page = reloaded.history_page(id, 0, 10).unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.entries[1].submission.status, SubmissionStatus::Rejected);
    assert_eq!(
        page.entries[1].submission.review_comment.as_deref(),
        Some("merge the header row differently")
    );
}
