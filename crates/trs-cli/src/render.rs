//! Table rendering for CLI output.
//!
//! The grid view is a thin consumer of the model's access classification;
//! cell coloring is derived entirely from [`PermissionPolicy::classify_cell`].

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use trs_model::{AccessClass, GridStructure, PermissionPolicy, SubmissionStatus};
use trs_review::HistoryPage;
use trs_store::TemplateSnapshot;

pub fn print_template_list(templates: &[TemplateSnapshot]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Id"),
        header_cell("Template"),
        header_cell("Department"),
        header_cell("Equipment"),
        header_cell("Supervisor"),
        header_cell("Version"),
        header_cell("Status"),
    ]);
    apply_list_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    align_column(&mut table, 6, CellAlignment::Center);
    for snapshot in templates {
        table.add_row(vec![
            Cell::new(snapshot.request.template_id),
            Cell::new(&snapshot.request.template_name),
            Cell::new(snapshot.request.department_id.as_str()),
            Cell::new(snapshot.request.equipment_id.as_str()),
            Cell::new(snapshot.request.supervisor_id.as_str()),
            Cell::new(format!("v{}", snapshot.current_version)),
            status_cell(snapshot.status),
        ]);
    }
    println!("{table}");
}

pub fn print_template(snapshot: &TemplateSnapshot) {
    println!(
        "Template {}: {}",
        snapshot.request.template_id, snapshot.request.template_name
    );
    if let Some(description) = &snapshot.request.description {
        println!("Description: {description}");
    }
    println!(
        "Department: {} | Equipment: {} | Supervisor: {}",
        snapshot.request.department_id,
        snapshot.request.equipment_id,
        snapshot.request.supervisor_id
    );
    println!(
        "Current version: v{} [{}]",
        snapshot.current_version, snapshot.status
    );
}

pub fn print_history(snapshot: &TemplateSnapshot, page: &HistoryPage) {
    print_template(snapshot);
    println!(
        "Showing {} of {} submission(s), newest first",
        page.entries.len(),
        page.total
    );
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Label"),
        header_cell("Version"),
        header_cell("Status"),
        header_cell("Submitted"),
        header_cell("Reviewer"),
        header_cell("Reviewed"),
        header_cell("Comment"),
    ]);
    apply_list_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Center);
    for entry in &page.entries {
        let submission = &entry.submission;
        table.add_row(vec![
            Cell::new(&entry.label).add_attribute(Attribute::Bold),
            Cell::new(submission.version),
            status_cell(submission.status),
            Cell::new(submission.created_at.format("%Y-%m-%d %H:%M").to_string()),
            optional_cell(submission.reviewer.as_ref().map(|r| r.as_str().to_string())),
            optional_cell(
                submission
                    .reviewed_at
                    .map(|at| at.format("%Y-%m-%d %H:%M").to_string()),
            ),
            optional_cell(submission.review_comment.clone()),
        ]);
    }
    println!("{table}");
}

pub fn print_grid(structure: &GridStructure) {
    let policy = PermissionPolicy::default();
    let mut table = Table::new();
    apply_grid_table_style(&mut table);
    for (row_index, row) in structure.values().iter().enumerate() {
        let cells: Vec<Cell> = row
            .iter()
            .enumerate()
            .map(|(col_index, value)| {
                let class = policy.classify_cell(structure, row_index, col_index);
                let mut cell = Cell::new(value.to_string()).fg(access_color(class.access));
                if class.header {
                    cell = cell.add_attribute(Attribute::Bold);
                }
                cell
            })
            .collect();
        table.add_row(cells);
    }
    println!("{table}");
    if !structure.merge_regions().is_empty() {
        let merged: Vec<String> = structure
            .merge_regions()
            .iter()
            .map(ToString::to_string)
            .collect();
        println!("Merged: {}", merged.join(", "));
    }
    println!("Access: green = full, yellow = restricted, grey = none");
}

fn status_cell(status: SubmissionStatus) -> Cell {
    match status {
        SubmissionStatus::Pending => Cell::new("PENDING").fg(Color::Yellow),
        SubmissionStatus::Approved => Cell::new("APPROVED")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        SubmissionStatus::Rejected => Cell::new("REJECTED")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
    }
}

fn access_color(access: AccessClass) -> Color {
    match access {
        AccessClass::Full => Color::Green,
        AccessClass::Restricted => Color::Yellow,
        AccessClass::None => Color::DarkGrey,
    }
}

fn apply_list_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn apply_grid_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn optional_cell(value: Option<String>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => Cell::new("-").fg(Color::DarkGrey),
    }
}
