//! Minimal change sets between a baseline grid and its working copy.
//!
//! Entry and evaluation changes are computed separately because they are
//! persisted at different stages of a run: sample codes while the plate is
//! filled, flags while results are read.

use labgrid_model::{
    Cell, CellGrid, CellPatch, CellStatus, Coordinate, FramedGrid, Grid, PatchChange,
};

use crate::codec::remove_frame;
use crate::error::{CodecError, Result};

fn ensure_same_shape(baseline: &Grid, current: &Grid) -> Result<()> {
    if baseline.height() == current.height() && baseline.width() == current.width() {
        return Ok(());
    }
    Err(CodecError::ShapeMismatch {
        baseline_height: baseline.height(),
        baseline_width: baseline.width(),
        current_height: current.height(),
        current_width: current.width(),
    })
}

/// Pair up cells of two same-shaped grids, skipping frame cells.
fn paired_cells<'a>(
    baseline: &'a Grid,
    current: &'a Grid,
) -> impl Iterator<Item = (Coordinate, &'a Cell, &'a Cell)> {
    baseline
        .iter()
        .zip(current.iter())
        .filter(|((_, before), (_, after))| !before.is_frame() && !after.is_frame())
        .map(|((at, before), (_, after))| (at, before, after))
}

fn entry_patch(at: Coordinate, before: &Cell, after: &Cell) -> Option<CellPatch> {
    let value = after.normalized_value();
    if value == before.normalized_value() && after.cell_status == before.cell_status {
        return None;
    }
    let cell_status = if value.is_some() {
        Some(CellStatus::Normal)
    } else {
        after.cell_status
    };
    Some(CellPatch::entry(at, value.map(str::to_string), cell_status))
}

fn evaluation_patch(at: Coordinate, before: &Cell, after: &Cell) -> Option<CellPatch> {
    if after.positive == before.positive && after.needs_retest == before.needs_retest {
        return None;
    }
    Some(CellPatch::evaluation(at, after.positive, after.needs_retest))
}

/// Value and status changes, in row-major order.
///
/// A blank value counts as no value. Whenever the current cell holds a value
/// the patch carries the `Normal` status, whatever was staged before.
///
/// # Errors
///
/// [`CodecError::ShapeMismatch`] when the grids differ in shape.
pub fn diff_entry(baseline: &Grid, current: &Grid) -> Result<Vec<CellPatch>> {
    ensure_same_shape(baseline, current)?;
    Ok(paired_cells(baseline, current)
        .filter_map(|(at, before, after)| entry_patch(at, before, after))
        .collect())
}

/// Changes to the `positive` and `needs_retest` flags, in row-major order.
///
/// Each patch carries both current flags.
///
/// # Errors
///
/// [`CodecError::ShapeMismatch`] when the grids differ in shape.
pub fn diff_evaluation(baseline: &Grid, current: &Grid) -> Result<Vec<CellPatch>> {
    ensure_same_shape(baseline, current)?;
    Ok(paired_cells(baseline, current)
        .filter_map(|(at, before, after)| evaluation_patch(at, before, after))
        .collect())
}

/// [`diff_entry`] on framed grids. Patch coordinates are data coordinates.
pub fn diff_entry_framed(baseline: &FramedGrid, current: &FramedGrid) -> Result<Vec<CellPatch>> {
    diff_entry(&remove_frame(baseline)?, &remove_frame(current)?)
}

/// [`diff_evaluation`] on framed grids. Patch coordinates are data
/// coordinates.
pub fn diff_evaluation_framed(
    baseline: &FramedGrid,
    current: &FramedGrid,
) -> Result<Vec<CellPatch>> {
    diff_evaluation(&remove_frame(baseline)?, &remove_frame(current)?)
}

/// Whether saving the entry stage would write anything.
pub fn has_entry_changes(baseline: &Grid, current: &Grid) -> Result<bool> {
    ensure_same_shape(baseline, current)?;
    Ok(paired_cells(baseline, current).any(|(at, before, after)| {
        entry_patch(at, before, after).is_some()
    }))
}

/// Whether saving the evaluation stage would write anything.
pub fn has_evaluation_changes(baseline: &Grid, current: &Grid) -> Result<bool> {
    ensure_same_shape(baseline, current)?;
    Ok(paired_cells(baseline, current).any(|(at, before, after)| {
        evaluation_patch(at, before, after).is_some()
    }))
}

fn normalized_title(title: Option<&str>) -> Option<&str> {
    title.map(str::trim).filter(|t| !t.is_empty())
}

/// Everything a save of one grid has to persist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridChanges {
    pub entry: Vec<CellPatch>,
    pub evaluation: Vec<CellPatch>,
    pub title_changed: bool,
}

impl GridChanges {
    /// Compute both change sets and compare titles.
    pub fn between(
        baseline: &Grid,
        current: &Grid,
        baseline_title: Option<&str>,
        current_title: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            entry: diff_entry(baseline, current)?,
            evaluation: diff_evaluation(baseline, current)?,
            title_changed: normalized_title(baseline_title) != normalized_title(current_title),
        })
    }

    pub fn contains_changes(&self) -> bool {
        self.title_changed || !self.entry.is_empty() || !self.evaluation.is_empty()
    }

    /// Number of cell patches across both stages.
    pub fn patch_count(&self) -> usize {
        self.entry.len() + self.evaluation.len()
    }
}

/// Write patches back onto a grid, the way the store would.
///
/// Entry patches replace value and status; evaluation patches replace both
/// flags. Order does not matter because no two patches of one kind share a
/// coordinate.
///
/// # Errors
///
/// [`CodecError::OutOfBounds`] for a patch outside the grid. Patches before
/// the failing one stay applied.
pub fn apply_patches(grid: &mut Grid, patches: &[CellPatch]) -> Result<()> {
    for patch in patches {
        let at = patch.coordinate();
        let cell = grid.cell_mut(at).ok_or(CodecError::OutOfBounds(at))?;
        match &patch.change {
            PatchChange::Entry { value, cell_status } => {
                cell.value.clone_from(value);
                cell.cell_status = *cell_status;
            }
            PatchChange::Evaluation {
                positive,
                needs_retest,
            } => {
                cell.positive = *positive;
                cell.needs_retest = *needs_retest;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with(at: Coordinate, cell: Cell) -> Grid {
        let mut grid = Grid::empty(3, 4);
        *grid.cell_mut(at).unwrap() = cell;
        grid
    }

    #[test]
    fn value_entry_demotes_status_to_normal() {
        let at = Coordinate::new(0, 1);
        let baseline = grid_with(
            at,
            Cell {
                cell_status: Some(CellStatus::Blank),
                ..Cell::empty()
            },
        );
        let current = grid_with(
            at,
            Cell {
                value: Some("S1".into()),
                cell_status: Some(CellStatus::Blank),
                ..Cell::empty()
            },
        );
        let patches = diff_entry(&baseline, &current).unwrap();
        assert_eq!(
            patches,
            vec![CellPatch::entry(
                at,
                Some("S1".into()),
                Some(CellStatus::Normal)
            )]
        );
    }

    #[test]
    fn blank_value_equals_missing_value() {
        let at = Coordinate::new(1, 1);
        let baseline = Grid::empty(3, 4);
        let current = grid_with(at, Cell::with_value("   "));
        assert!(diff_entry(&baseline, &current).unwrap().is_empty());
        assert!(!has_entry_changes(&baseline, &current).unwrap());
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let err = diff_evaluation(&Grid::empty(2, 2), &Grid::empty(2, 3)).unwrap_err();
        assert_eq!(
            err,
            CodecError::ShapeMismatch {
                baseline_height: 2,
                baseline_width: 2,
                current_height: 2,
                current_width: 3,
            }
        );
    }

    #[test]
    fn title_change_alone_counts() {
        let grid = Grid::empty(1, 1);
        let changes = GridChanges::between(&grid, &grid, Some("Run 1"), Some("Run 2")).unwrap();
        assert!(changes.contains_changes());
        assert_eq!(changes.patch_count(), 0);

        let same = GridChanges::between(&grid, &grid, Some("Run 1"), Some(" Run 1 ")).unwrap();
        assert!(!same.contains_changes());
    }

    #[test]
    fn blank_title_equals_no_title() {
        let grid = Grid::empty(1, 1);
        for (before, after) in [(None, Some("")), (Some("  "), None), (Some(""), Some(" "))] {
            let changes = GridChanges::between(&grid, &grid, before, after).unwrap();
            assert!(!changes.title_changed, "{before:?} -> {after:?}");
        }
        let named = GridChanges::between(&grid, &grid, None, Some("Run 1")).unwrap();
        assert!(named.title_changed);
    }

    #[test]
    fn out_of_bounds_patch_fails() {
        let mut grid = Grid::empty(1, 1);
        let patch = CellPatch::evaluation(Coordinate::new(4, 0), true, false);
        assert_eq!(
            apply_patches(&mut grid, &[patch]),
            Err(CodecError::OutOfBounds(Coordinate::new(4, 0)))
        );
    }
}
