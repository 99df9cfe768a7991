#![deny(unsafe_code)]

//! Access classification of grid cells.
//!
//! Classification is a pure function of the permission overlay and a
//! [`PermissionPolicy`]; renderers, exporters, and audit logging all
//! consume the same result.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::GridStructure;

/// The reserved capability tag that gates any access at all.
pub const GATE_TAG: &str = "operator";

/// Minimum number of tags (gate tag included) for full access.
pub const FULL_TAG_THRESHOLD: usize = 3;

/// Three-tier access classification of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccessClass {
    Full,
    Restricted,
    None,
}

impl AccessClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessClass::Full => "FULL",
            AccessClass::Restricted => "RESTRICTED",
            AccessClass::None => "NONE",
        }
    }
}

impl fmt::Display for AccessClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access classification plus the structural header overlay for row 0.
///
/// The header flag is a presentation concern and is orthogonal to the
/// access classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellClass {
    pub access: AccessClass,
    pub header: bool,
}

/// Classification policy: which tag gates access and how many tags grant
/// full access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionPolicy {
    pub gate_tag: String,
    pub full_threshold: usize,
}

impl Default for PermissionPolicy {
    fn default() -> Self {
        Self {
            gate_tag: GATE_TAG.to_string(),
            full_threshold: FULL_TAG_THRESHOLD,
        }
    }
}

impl PermissionPolicy {
    pub fn new(gate_tag: impl Into<String>, full_threshold: usize) -> Self {
        Self {
            gate_tag: gate_tag.into(),
            full_threshold,
        }
    }

    /// Classify one cell. Out-of-bounds positions carry the empty tag set
    /// and therefore classify as [`AccessClass::None`].
    pub fn classify(&self, structure: &GridStructure, row: usize, col: usize) -> AccessClass {
        let tags = structure.cell_permissions(row, col);
        if !tags.contains(&self.gate_tag) {
            return AccessClass::None;
        }
        if tags.len() < self.full_threshold {
            AccessClass::Restricted
        } else {
            AccessClass::Full
        }
    }

    /// Classify one cell and layer the row-0 header flag on top.
    pub fn classify_cell(&self, structure: &GridStructure, row: usize, col: usize) -> CellClass {
        CellClass {
            access: self.classify(structure, row, col),
            header: row == 0,
        }
    }
}

/// Classify with the default policy (`"operator"` gate, threshold 3).
pub fn classify(structure: &GridStructure, row: usize, col: usize) -> AccessClass {
    PermissionPolicy::default().classify(structure, row, col)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{CellValue, TagSet};

    fn grid_with_permissions(permissions: Vec<Vec<TagSet>>) -> GridStructure {
        let rows = permissions.len();
        let cols = permissions.first().map_or(0, Vec::len);
        let values = vec![vec![CellValue::Empty; cols]; rows];
        GridStructure::new(values, permissions, Vec::new()).unwrap()
    }

    fn tags(list: &[&str]) -> TagSet {
        TagSet::from_tags(list.iter().copied()).unwrap()
    }

    #[test]
    fn classifies_the_three_tiers() {
        let grid = grid_with_permissions(vec![
            vec![tags(&["operator", "editor", "viewer"]), tags(&["operator"])],
            vec![TagSet::new(), tags(&["operator", "editor"])],
        ]);
        assert_eq!(classify(&grid, 0, 0), AccessClass::Full);
        assert_eq!(classify(&grid, 0, 1), AccessClass::Restricted);
        assert_eq!(classify(&grid, 1, 0), AccessClass::None);
        assert_eq!(classify(&grid, 1, 1), AccessClass::Restricted);
    }

    #[test]
    fn missing_gate_tag_is_none_even_with_many_tags() {
        let grid = grid_with_permissions(vec![vec![tags(&["editor", "viewer", "auditor"])]]);
        assert_eq!(classify(&grid, 0, 0), AccessClass::None);
    }

    #[test]
    fn out_of_bounds_is_none() {
        let grid = grid_with_permissions(vec![vec![tags(&["operator", "editor", "viewer"])]]);
        assert_eq!(classify(&grid, 3, 3), AccessClass::None);
    }

    #[test]
    fn header_flag_only_on_row_zero() {
        let grid = grid_with_permissions(vec![vec![tags(&["operator"])], vec![tags(&["operator"])]]);
        let policy = PermissionPolicy::default();
        assert!(policy.classify_cell(&grid, 0, 0).header);
        assert!(!policy.classify_cell(&grid, 1, 0).header);
    }

    #[test]
    fn custom_policy_changes_gate_and_threshold() {
        let grid = grid_with_permissions(vec![vec![tags(&["inspector", "editor"])]]);
        let policy = PermissionPolicy::new("inspector", 2);
        assert_eq!(policy.classify(&grid, 0, 0), AccessClass::Full);
        let strict = PermissionPolicy::new("inspector", 4);
        assert_eq!(strict.classify(&grid, 0, 0), AccessClass::Restricted);
    }
}
