//! Conversion between sparse cell records and dense grids.
//!
//! Storage keeps one record per written well. Editing works on a dense
//! rectangle with a label frame around it. This module converts between the
//! three shapes:
//!
//! ```text
//! [CellRecord] --to_grid--> Grid --add_frame--> FramedGrid
//! [CellRecord] <-to_records- Grid <-remove_frame- FramedGrid
//! ```

use std::collections::BTreeSet;

use labgrid_model::{
    Cell, CellGrid, CellRecord, FramePosition, FramedGrid, Grid, column_label, row_label,
};

use crate::error::{CodecError, Result};
use crate::validator::SampleCodeValidator;

/// Largest number of wells a grid may hold (a 1536-well plate has 1536).
pub const MAX_CELLS: usize = 1 << 16;

/// Build a dense grid from the records of one grid.
///
/// The extent is `(max(row) + 1) × (max(column) + 1)` unless `width` or
/// `height` is given; explicit dimensions win but may not cut records off.
/// Wells without a record are empty.
///
/// # Errors
///
/// - [`CodecError::Dimension`] when an explicit dimension is too small.
/// - [`CodecError::TooLarge`] when the grid would exceed [`MAX_CELLS`].
/// - [`CodecError::DuplicateCell`] when two records share a coordinate.
pub fn to_grid(records: &[CellRecord], width: Option<usize>, height: Option<usize>) -> Result<Grid> {
    let required_height = records
        .iter()
        .map(|r| r.row.saturating_add(1))
        .max()
        .unwrap_or(0);
    let required_width = records
        .iter()
        .map(|r| r.column.saturating_add(1))
        .max()
        .unwrap_or(0);
    let height = height.unwrap_or(required_height);
    let width = width.unwrap_or(required_width);
    if height < required_height || width < required_width {
        return Err(CodecError::Dimension {
            width,
            height,
            required_width,
            required_height,
        });
    }
    ensure_within_limit(height, width)?;

    let mut grid = Grid::empty(height, width);
    let mut seen = BTreeSet::new();
    for record in records {
        let at = record.coordinate();
        if !seen.insert(at) {
            return Err(CodecError::DuplicateCell {
                row: at.row,
                column: at.column,
            });
        }
        let cell = grid.cell_mut(at).ok_or(CodecError::OutOfBounds(at))?;
        *cell = record.to_cell();
    }
    Ok(grid)
}

fn ensure_within_limit(height: usize, width: usize) -> Result<()> {
    let fits = height <= MAX_CELLS
        && width <= MAX_CELLS
        && height.checked_mul(width).is_some_and(|cells| cells <= MAX_CELLS);
    if fits {
        Ok(())
    } else {
        Err(CodecError::TooLarge { height, width })
    }
}

/// Flatten a grid into one record per well, in row-major order.
pub fn to_records(grid: &Grid) -> Vec<CellRecord> {
    grid.iter()
        .map(|(at, cell)| CellRecord::from_cell(at, cell))
        .collect()
}

/// Label for a frame cell: plate row letters down the side, 1-based column
/// numbers across the top, nothing in the corner.
pub fn frame_label(position: FramePosition) -> Option<String> {
    match position {
        FramePosition::Corner => None,
        FramePosition::Column(column) => Some(column_label(column)),
        FramePosition::Row(row) => Some(row_label(row)),
    }
}

/// Prepend a read-only label row and label column.
pub fn add_frame(grid: &Grid) -> FramedGrid {
    FramedGrid::from_grid(grid, frame_label)
}

/// Strip the first row and first column.
///
/// The stripped cells are discarded without inspection, so
/// `remove_frame(&add_frame(&g)) == Ok(g)` for every grid.
///
/// # Errors
///
/// [`CodecError::NotFramed`] when there is no row or no column to strip.
pub fn remove_frame(framed: &FramedGrid) -> Result<Grid> {
    let rows = framed.height();
    let columns = framed.width();
    if rows == 0 || columns == 0 {
        return Err(CodecError::NotFramed { rows, columns });
    }
    let data: Vec<Vec<Cell>> = framed.rows()[1..]
        .iter()
        .map(|row| row[1..].to_vec())
        .collect();
    Ok(Grid::from_rows(data)?)
}

/// Whether a cell may receive an evaluation mark.
///
/// Frame cells never qualify; data cells qualify when their value is a
/// sample code according to `validator`.
pub fn is_assignable_cell<V>(cell: &Cell, validator: &V) -> bool
where
    V: SampleCodeValidator + ?Sized,
{
    !cell.is_frame()
        && cell
            .normalized_value()
            .is_some_and(|code| validator.is_valid(code.trim()))
}
