#![deny(unsafe_code)]

//! The permissioned grid value object.
//!
//! A [`GridStructure`] couples a rectangular grid of cell values with a
//! parallel per-cell capability overlay and a list of rectangular merge
//! regions. It is validated once at construction and never mutated; a new
//! version of a template carries a new `GridStructure`.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::error::{MergeRegionIssue, ModelError, Result};

/// A single cell value. Grids hold heterogeneous scalar content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Empty,
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(value) => f.write_str(value),
            Self::Number(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Empty => Ok(()),
        }
    }
}

/// An ordered set of capability tags attached to one cell.
///
/// The vocabulary is open: tags are plain strings, and the classification
/// policy singles out one reserved gate tag (see [`crate::access`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(BTreeSet<String>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tag set, rejecting blank tags.
    pub fn from_tags<I, S>(tags: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = BTreeSet::new();
        for tag in tags {
            let tag = tag.into();
            let trimmed = tag.trim();
            if trimmed.is_empty() {
                return Err(ModelError::InvalidTag(tag));
            }
            set.insert(trimmed.to_string());
        }
        Ok(Self(set))
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Grid dimensions as rows x columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDims {
    pub rows: usize,
    pub cols: usize,
}

impl fmt::Display for GridDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// A rectangular cell merge anchored at `(row, col)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRegion {
    pub row: usize,
    pub col: usize,
    pub row_span: usize,
    pub col_span: usize,
}

impl MergeRegion {
    pub const fn new(row: usize, col: usize, row_span: usize, col_span: usize) -> Self {
        Self {
            row,
            col,
            row_span,
            col_span,
        }
    }

    /// One past the last covered row.
    pub fn row_end(&self) -> usize {
        self.row + self.row_span
    }

    /// One past the last covered column.
    pub fn col_end(&self) -> usize {
        self.col + self.col_span
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.row && row < self.row_end() && col >= self.col && col < self.col_end()
    }

    /// Rectangle intersection test. Symmetric.
    pub fn intersects(&self, other: &MergeRegion) -> bool {
        self.row < other.row_end()
            && other.row < self.row_end()
            && self.col < other.col_end()
            && other.col < self.col_end()
    }

    fn fits_within(&self, dims: GridDims) -> bool {
        self.row_end() <= dims.rows && self.col_end() <= dims.cols
    }
}

impl fmt::Display for MergeRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{})+{}x{}",
            self.row, self.col, self.row_span, self.col_span
        )
    }
}

static EMPTY_TAGS: LazyLock<TagSet> = LazyLock::new(TagSet::new);

/// Immutable permissioned grid: values, per-cell capability sets, merges.
///
/// Deserialization funnels through [`GridStructure::new`], so an instance
/// obtained from any source upholds the shape and merge invariants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridParts")]
pub struct GridStructure {
    values: Vec<Vec<CellValue>>,
    permissions: Vec<Vec<TagSet>>,
    merge_regions: Vec<MergeRegion>,
}

impl GridStructure {
    /// Validate and build a grid.
    ///
    /// Fails with [`ModelError::ShapeMismatch`] when either grid is ragged
    /// or the permission overlay does not match the value dimensions, and
    /// with [`ModelError::InvalidMergeRegion`] when a merge region has a
    /// zero span, leaves the grid, or overlaps another region.
    pub fn new(
        values: Vec<Vec<CellValue>>,
        permissions: Vec<Vec<TagSet>>,
        merge_regions: Vec<MergeRegion>,
    ) -> Result<Self> {
        let dims = rect_dims(&values)?;
        let permission_dims = rect_dims(&permissions)?;
        if permission_dims != dims {
            return Err(ModelError::ShapeMismatch {
                expected: dims,
                found: permission_dims,
            });
        }

        for region in &merge_regions {
            if region.row_span == 0 || region.col_span == 0 {
                return Err(ModelError::InvalidMergeRegion {
                    region: *region,
                    reason: MergeRegionIssue::EmptySpan,
                });
            }
            if !region.fits_within(dims) {
                return Err(ModelError::InvalidMergeRegion {
                    region: *region,
                    reason: MergeRegionIssue::OutOfBounds {
                        rows: dims.rows,
                        cols: dims.cols,
                    },
                });
            }
        }
        // Pairwise intersection; region counts stay small enough that an
        // interval tree would not pay for itself.
        for (index, first) in merge_regions.iter().enumerate() {
            for second in &merge_regions[index + 1..] {
                if first.intersects(second) {
                    return Err(ModelError::InvalidMergeRegion {
                        region: *second,
                        reason: MergeRegionIssue::Overlap { other: *first },
                    });
                }
            }
        }

        Ok(Self {
            values,
            permissions,
            merge_regions,
        })
    }

    pub fn dims(&self) -> GridDims {
        GridDims {
            rows: self.values.len(),
            cols: self.values.first().map_or(0, Vec::len),
        }
    }

    pub fn rows(&self) -> usize {
        self.values.len()
    }

    pub fn cols(&self) -> usize {
        self.values.first().map_or(0, Vec::len)
    }

    pub fn values(&self) -> &[Vec<CellValue>] {
        &self.values
    }

    pub fn value(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.values.get(row).and_then(|r| r.get(col))
    }

    pub fn permissions(&self) -> &[Vec<TagSet>] {
        &self.permissions
    }

    /// Tag set at a position; the empty set when out of bounds.
    ///
    /// Out-of-bounds access is not an error: callers treat it as "no
    /// access".
    pub fn cell_permissions(&self, row: usize, col: usize) -> &TagSet {
        self.permissions
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_TAGS)
    }

    pub fn merge_regions(&self) -> &[MergeRegion] {
        &self.merge_regions
    }

    /// The merge region covering a position, if any.
    pub fn merge_region_at(&self, row: usize, col: usize) -> Option<&MergeRegion> {
        self.merge_regions.iter().find(|r| r.contains(row, col))
    }
}

/// Raw deserialized form; converted through the validating constructor.
#[derive(Deserialize)]
struct GridParts {
    values: Vec<Vec<CellValue>>,
    permissions: Vec<Vec<TagSet>>,
    #[serde(default)]
    merge_regions: Vec<MergeRegion>,
}

impl TryFrom<GridParts> for GridStructure {
    type Error = ModelError;

    fn try_from(parts: GridParts) -> Result<Self> {
        Self::new(parts.values, parts.permissions, parts.merge_regions)
    }
}

fn rect_dims<T>(grid: &[Vec<T>]) -> Result<GridDims> {
    let rows = grid.len();
    let cols = grid.first().map_or(0, Vec::len);
    for row in grid {
        if row.len() != cols {
            return Err(ModelError::ShapeMismatch {
                expected: GridDims { rows, cols },
                found: GridDims {
                    rows,
                    cols: row.len(),
                },
            });
        }
    }
    Ok(GridDims { rows, cols })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[&str]) -> TagSet {
        TagSet::from_tags(list.iter().copied()).unwrap()
    }

    fn blank_grid(rows: usize, cols: usize) -> (Vec<Vec<CellValue>>, Vec<Vec<TagSet>>) {
        let values = vec![vec![CellValue::Empty; cols]; rows];
        let permissions = vec![vec![TagSet::new(); cols]; rows];
        (values, permissions)
    }

    #[test]
    fn builds_a_valid_grid() {
        let (values, permissions) = blank_grid(3, 4);
        let grid = GridStructure::new(values, permissions, vec![MergeRegion::new(0, 0, 1, 4)])
            .expect("valid grid");
        assert_eq!(grid.dims().to_string(), "3x4");
        assert_eq!(grid.merge_regions().len(), 1);
    }

    #[test]
    fn rejects_mismatched_permission_dimensions() {
        let (values, _) = blank_grid(2, 2);
        let (_, permissions) = blank_grid(2, 3);
        let err = GridStructure::new(values, permissions, Vec::new()).unwrap_err();
        assert!(matches!(err, ModelError::ShapeMismatch { .. }));
    }

    #[test]
    fn rejects_ragged_value_rows() {
        let values = vec![vec![CellValue::Empty; 2], vec![CellValue::Empty; 3]];
        let permissions = vec![vec![TagSet::new(); 2], vec![TagSet::new(); 2]];
        let err = GridStructure::new(values, permissions, Vec::new()).unwrap_err();
        assert!(matches!(err, ModelError::ShapeMismatch { .. }));
    }

    #[test]
    fn rejects_merge_region_outside_bounds() {
        let (values, permissions) = blank_grid(2, 2);
        let err =
            GridStructure::new(values, permissions, vec![MergeRegion::new(1, 1, 2, 1)])
                .unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidMergeRegion {
                reason: MergeRegionIssue::OutOfBounds { rows: 2, cols: 2 },
                ..
            }
        ));
    }

    #[test]
    fn rejects_zero_span_merge_region() {
        let (values, permissions) = blank_grid(2, 2);
        let err =
            GridStructure::new(values, permissions, vec![MergeRegion::new(0, 0, 0, 1)])
                .unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidMergeRegion {
                reason: MergeRegionIssue::EmptySpan,
                ..
            }
        ));
    }

    #[test]
    fn rejects_overlapping_merge_regions() {
        let (values, permissions) = blank_grid(4, 4);
        let regions = vec![MergeRegion::new(0, 0, 2, 2), MergeRegion::new(1, 1, 2, 2)];
        let err = GridStructure::new(values, permissions, regions).unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidMergeRegion {
                reason: MergeRegionIssue::Overlap { .. },
                ..
            }
        ));
    }

    #[test]
    fn adjacent_merge_regions_do_not_overlap() {
        let (values, permissions) = blank_grid(4, 4);
        let regions = vec![MergeRegion::new(0, 0, 2, 2), MergeRegion::new(0, 2, 2, 2)];
        assert!(GridStructure::new(values, permissions, regions).is_ok());
    }

    #[test]
    fn out_of_bounds_permissions_are_empty() {
        let (values, mut permissions) = blank_grid(1, 1);
        permissions[0][0] = tags(&["operator"]);
        let grid = GridStructure::new(values, permissions, Vec::new()).unwrap();
        assert!(grid.cell_permissions(0, 0).contains("operator"));
        assert!(grid.cell_permissions(5, 0).is_empty());
        assert!(grid.cell_permissions(0, 5).is_empty());
    }

    #[test]
    fn merge_region_lookup_by_cell() {
        let (values, permissions) = blank_grid(3, 3);
        let grid = GridStructure::new(values, permissions, vec![MergeRegion::new(1, 0, 2, 2)])
            .unwrap();
        assert!(grid.merge_region_at(2, 1).is_some());
        assert!(grid.merge_region_at(0, 0).is_none());
    }

    #[test]
    fn deserialization_revalidates() {
        let json = r#"{
            "values": [[{"kind": "Text", "value": "Station"}]],
            "permissions": [[["operator"]], [["viewer"]]],
            "merge_regions": []
        }"#;
        let parsed: std::result::Result<GridStructure, _> = serde_json::from_str(json);
        assert!(parsed.is_err(), "shape mismatch must fail deserialization");
    }

    #[test]
    fn serde_round_trip_preserves_structure() {
        let values = vec![vec![
            CellValue::text("Pressure"),
            CellValue::Number(3.5),
            CellValue::Bool(true),
            CellValue::Empty,
        ]];
        let permissions = vec![vec![
            tags(&["operator", "editor"]),
            tags(&["operator"]),
            TagSet::new(),
            TagSet::new(),
        ]];
        let grid = GridStructure::new(values, permissions, vec![MergeRegion::new(0, 2, 1, 2)])
            .unwrap();
        let json = serde_json::to_string(&grid).expect("serialize grid");
        let round: GridStructure = serde_json::from_str(&json).expect("deserialize grid");
        assert_eq!(round, grid);
    }

    #[test]
    fn blank_tags_are_rejected() {
        assert!(TagSet::from_tags(["operator", " "]).is_err());
    }
}
