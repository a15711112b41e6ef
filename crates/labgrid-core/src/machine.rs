//! Per-cell state machines.
//!
//! Two independent machines share one [`Cell`]:
//!
//! - **Entry** (`Empty`, `Filled`, `SpecialStatus(tag)`) runs while sample
//!   codes are typed in and wells are tagged.
//! - **Evaluation** (`Unmarked`, `Positive`, `NeedsRetest`) runs while results
//!   are marked, and only on wells holding a valid sample code.
//!
//! Transitions on frame cells, and evaluation transitions on cells that are
//! not assignable, are no-ops. Every transition reports whether it changed
//! the cell.

use labgrid_model::{
    Cell, CellGrid, CellStatus, Coordinate, EntryState, EvaluationState, StatusPalette,
};

use crate::codec::is_assignable_cell;
use crate::error::{CodecError, Result};
use crate::validator::SampleCodeValidator;

/// Outcome of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Transition {
    Applied,
    Ignored,
}

impl Transition {
    pub fn is_applied(self) -> bool {
        matches!(self, Transition::Applied)
    }

    fn from_changed(changed: bool) -> Self {
        if changed {
            Transition::Applied
        } else {
            Transition::Ignored
        }
    }
}

/// User actions of the entry machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryAction {
    /// Type a sample code. A blank code clears the well.
    EnterValue(String),
    ClearValue,
    /// Stage a status tag on an empty well.
    Tag(CellStatus),
}

/// User actions of the evaluation machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationAction {
    /// Toggle `Positive`, clearing `NeedsRetest`.
    Primary,
    /// Toggle `NeedsRetest`, clearing `Positive`.
    Secondary,
}

/// Apply an entry action to one cell.
///
/// A filled well always carries the `Normal` tag; tagging a filled well is
/// ignored because value entry wins over tagging.
pub fn apply_entry(cell: &mut Cell, action: EntryAction) -> Transition {
    if cell.is_frame() {
        return Transition::Ignored;
    }
    match action {
        EntryAction::EnterValue(value) => {
            let value = value.trim();
            if value.is_empty() {
                return apply_entry(cell, EntryAction::ClearValue);
            }
            let changed = cell.value.as_deref() != Some(value)
                || cell.cell_status != Some(CellStatus::Normal);
            cell.value = Some(value.to_string());
            cell.cell_status = Some(CellStatus::Normal);
            Transition::from_changed(changed)
        }
        EntryAction::ClearValue => {
            let changed = cell.value.take().is_some();
            Transition::from_changed(changed)
        }
        EntryAction::Tag(tag) => match cell.entry_state() {
            EntryState::Filled => Transition::Ignored,
            // Normal on an untagged well is still Empty.
            EntryState::Empty if tag == CellStatus::Normal => Transition::Ignored,
            EntryState::SpecialStatus(current) if current == tag => Transition::Ignored,
            EntryState::Empty | EntryState::SpecialStatus(_) => {
                cell.cell_status = Some(tag);
                Transition::Applied
            }
        },
    }
}

/// Apply an evaluation action to one cell.
pub fn apply_evaluation<V>(cell: &mut Cell, action: EvaluationAction, validator: &V) -> Transition
where
    V: SampleCodeValidator + ?Sized,
{
    if !is_assignable_cell(cell, validator) {
        return Transition::Ignored;
    }
    let next = match (action, cell.evaluation_state()) {
        (EvaluationAction::Primary, EvaluationState::Positive) => EvaluationState::Unmarked,
        (EvaluationAction::Primary, _) => EvaluationState::Positive,
        (EvaluationAction::Secondary, EvaluationState::NeedsRetest) => EvaluationState::Unmarked,
        (EvaluationAction::Secondary, _) => EvaluationState::NeedsRetest,
    };
    cell.set_evaluation_state(next);
    Transition::Applied
}

fn cell_at<G: CellGrid + ?Sized>(grid: &mut G, at: Coordinate) -> Result<&mut Cell> {
    grid.cell_mut(at).ok_or(CodecError::OutOfBounds(at))
}

/// Type a sample code into the cell at `at`.
pub fn enter_value<G: CellGrid + ?Sized>(
    grid: &mut G,
    at: Coordinate,
    value: impl Into<String>,
) -> Result<Transition> {
    Ok(apply_entry(
        cell_at(grid, at)?,
        EntryAction::EnterValue(value.into()),
    ))
}

/// Clear the sample code of the cell at `at`.
pub fn clear_value<G: CellGrid + ?Sized>(grid: &mut G, at: Coordinate) -> Result<Transition> {
    Ok(apply_entry(cell_at(grid, at)?, EntryAction::ClearValue))
}

/// Stage a status tag on the cell at `at`.
pub fn tag_cell<G: CellGrid + ?Sized>(
    grid: &mut G,
    at: Coordinate,
    tag: CellStatus,
) -> Result<Transition> {
    Ok(apply_entry(cell_at(grid, at)?, EntryAction::Tag(tag)))
}

/// Mark the result of the cell at `at`.
pub fn mark<G, V>(
    grid: &mut G,
    at: Coordinate,
    action: EvaluationAction,
    validator: &V,
) -> Result<Transition>
where
    G: CellGrid + ?Sized,
    V: SampleCodeValidator + ?Sized,
{
    Ok(apply_evaluation(cell_at(grid, at)?, action, validator))
}

/// An inclusive rectangular range of coordinates.
///
/// The corners may be given in any order; they are normalized so `start` is
/// the top-left and `end` the bottom-right corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    start: Coordinate,
    end: Coordinate,
}

impl Selection {
    pub fn new(a: Coordinate, b: Coordinate) -> Self {
        Self {
            start: Coordinate::new(a.row.min(b.row), a.column.min(b.column)),
            end: Coordinate::new(a.row.max(b.row), a.column.max(b.column)),
        }
    }

    pub fn single(at: Coordinate) -> Self {
        Self { start: at, end: at }
    }

    pub fn start(&self) -> Coordinate {
        self.start
    }

    pub fn end(&self) -> Coordinate {
        self.end
    }

    pub fn contains(&self, at: Coordinate) -> bool {
        (self.start.row..=self.end.row).contains(&at.row)
            && (self.start.column..=self.end.column).contains(&at.column)
    }

    /// Coordinates of the selection that fall inside a `height × width`
    /// table, in row-major order.
    pub fn clamped(&self, height: usize, width: usize) -> impl Iterator<Item = Coordinate> {
        let rows = self.start.row..self.end.row.saturating_add(1).min(height);
        let columns = self.start.column..self.end.column.saturating_add(1).min(width);
        rows.flat_map(move |row| columns.clone().map(move |column| Coordinate::new(row, column)))
    }
}

/// Tag every empty, non-frame cell of `selection`.
///
/// Cells already holding a value are skipped: value entry wins over bulk
/// tagging. Returns the number of cells that changed.
pub fn tag_selection<G: CellGrid + ?Sized>(
    grid: &mut G,
    selection: Selection,
    tag: CellStatus,
) -> usize {
    let coordinates: Vec<Coordinate> = selection.clamped(grid.height(), grid.width()).collect();
    let mut changed = 0;
    for at in coordinates {
        let Some(cell) = grid.cell_mut(at) else {
            continue;
        };
        if cell.is_frame() || cell.has_value() {
            continue;
        }
        if apply_entry(cell, EntryAction::Tag(tag)).is_applied() {
            changed += 1;
        }
    }
    changed
}

/// [`tag_selection`] restricted to the statuses a palette offers.
///
/// # Errors
///
/// Fails with the palette's `UnrecognizedStatus` error before touching any
/// cell.
pub fn tag_selection_checked<G: CellGrid + ?Sized>(
    grid: &mut G,
    selection: Selection,
    tag: CellStatus,
    palette: &StatusPalette,
) -> Result<usize> {
    palette.ensure_recognized(tag)?;
    Ok(tag_selection(grid, selection, tag))
}
