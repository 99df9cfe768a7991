use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use trs_model::{DepartmentId, EquipmentId, GridStructure, TemplateId, UserId};
use trs_review::{ReviewDecision, ReviewRequest};
use trs_store::{TemplateDetails, TemplateStore, load_store, save_store};

use crate::cli::{
    CheckArgs, CreateArgs, DecisionArg, HistoryArgs, ResubmitArgs, ReviewArgs, ShowArgs,
};
use crate::render::{print_grid, print_history, print_template, print_template_list};

pub fn run_create(store_path: &Path, args: &CreateArgs) -> Result<()> {
    let structure = read_grid(&args.grid)?;
    let store = open_store(store_path)?;
    let details = TemplateDetails {
        template_name: args.name.clone(),
        description: args.description.clone(),
        department_id: DepartmentId::new(args.department.clone())?,
        equipment_id: EquipmentId::new(args.equipment.clone())?,
        supervisor_id: UserId::new(args.supervisor.clone())?,
    };
    let snapshot = store.create_template(details, structure)?;
    persist(&store, store_path)?;
    println!(
        "Created template {} ({}); v{} is pending review",
        snapshot.request.template_id, snapshot.request.template_name, snapshot.current_version
    );
    Ok(())
}

pub fn run_review(store_path: &Path, args: &ReviewArgs) -> Result<()> {
    let store = open_store(store_path)?;
    let template = TemplateId::new(args.template);
    let request = ReviewRequest {
        decision: match args.decision {
            DecisionArg::Approve => ReviewDecision::Approved,
            DecisionArg::Reject => ReviewDecision::Rejected,
        },
        reviewer: UserId::new(args.reviewer.clone())?,
        comment: args.comment.clone(),
    };
    let submission = store.decide(template, args.expected_version, request)?;
    persist(&store, store_path)?;
    println!(
        "Template {template}: v{} is now {}",
        submission.version, submission.status
    );
    Ok(())
}

pub fn run_resubmit(store_path: &Path, args: &ResubmitArgs) -> Result<()> {
    let structure = read_grid(&args.grid)?;
    let store = open_store(store_path)?;
    let template = TemplateId::new(args.template);
    let submission = store.resubmit(template, args.expected_version, structure)?;
    persist(&store, store_path)?;
    println!(
        "Template {template}: v{} is pending review",
        submission.version
    );
    Ok(())
}

pub fn run_history(store_path: &Path, args: &HistoryArgs) -> Result<()> {
    let store = open_store(store_path)?;
    let template = TemplateId::new(args.template);
    let snapshot = store.template(template)?;
    let page = store.history_page(template, args.offset, args.limit)?;
    print_history(&snapshot, &page);
    Ok(())
}

pub fn run_show(store_path: &Path, args: &ShowArgs) -> Result<()> {
    let store = open_store(store_path)?;
    let template = TemplateId::new(args.template);
    let snapshot = store.template(template)?;
    let current = store.current(template)?;
    print_template(&snapshot);
    print_grid(&current.structure);
    Ok(())
}

pub fn run_list(store_path: &Path) -> Result<()> {
    let store = open_store(store_path)?;
    let templates = store.list_templates()?;
    if templates.is_empty() {
        println!("No templates in {}", store_path.display());
        return Ok(());
    }
    print_template_list(&templates);
    Ok(())
}

pub fn run_check(args: &CheckArgs) -> Result<()> {
    let structure = read_grid(&args.grid)?;
    println!(
        "OK: {} grid with {} merge region(s)",
        structure.dims(),
        structure.merge_regions().len()
    );
    print_grid(&structure);
    Ok(())
}

/// Load the store file, or start empty when it does not exist yet.
fn open_store(path: &Path) -> Result<TemplateStore> {
    if path.exists() {
        let snapshot = load_store(path)?;
        Ok(TemplateStore::from_snapshot(snapshot)?)
    } else {
        debug!("store file {} not found, starting empty", path.display());
        Ok(TemplateStore::new())
    }
}

fn persist(store: &TemplateStore, path: &Path) -> Result<()> {
    let mut snapshot = store.snapshot()?;
    save_store(&mut snapshot, path)?;
    Ok(())
}

/// Parse a grid JSON file; validation runs during deserialization.
fn read_grid(path: &Path) -> Result<GridStructure> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read grid file {}", path.display()))?;
    let structure: GridStructure = serde_json::from_str(&text)
        .with_context(|| format!("parse grid file {}", path.display()))?;
    Ok(structure)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn read_grid_rejects_invalid_structures() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grid.json");
        fs::write(
            &path,
            r#"{"values": [[{"kind": "Empty"}]], "permissions": []}"#,
        )
        .unwrap();
        assert!(read_grid(&path).is_err());
    }

    #[test]
    fn read_grid_accepts_a_minimal_grid() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grid.json");
        fs::write(
            &path,
            r#"{
                "values": [[{"kind": "Text", "value": "Check"}]],
                "permissions": [[["operator"]]],
                "merge_regions": []
            }"#,
        )
        .unwrap();
        let grid = read_grid(&path).unwrap();
        assert_eq!(grid.rows(), 1);
    }
}
