//! Dense grid shapes.
//!
//! [`Grid`] holds sample data only. [`FramedGrid`] is the same data with a
//! leading read-only label row and column, which is what an editing surface
//! works on. The two are distinct types so a frame cell is never mistaken for
//! a well by position alone.

use serde::{Deserialize, Serialize};

use crate::cell::{Cell, Coordinate};
use crate::error::{ModelError, Result};

/// Shared access to a rectangular table of cells.
pub trait CellGrid {
    /// Number of rows.
    fn height(&self) -> usize;
    /// Number of columns (identical for every row).
    fn width(&self) -> usize;
    fn cell(&self, at: Coordinate) -> Option<&Cell>;
    fn cell_mut(&mut self, at: Coordinate) -> Option<&mut Cell>;

    fn contains(&self, at: Coordinate) -> bool {
        at.row < self.height() && at.column < self.width()
    }
}

fn check_rectangular(rows: &[Vec<Cell>]) -> Result<()> {
    let Some(first) = rows.first() else {
        return Ok(());
    };
    let expected = first.len();
    for (row, cells) in rows.iter().enumerate() {
        if cells.len() != expected {
            return Err(ModelError::Jagged {
                row,
                expected,
                actual: cells.len(),
            });
        }
    }
    Ok(())
}

/// Row-major iterator over `(coordinate, cell)` pairs.
fn iter_rows(rows: &[Vec<Cell>]) -> impl Iterator<Item = (Coordinate, &Cell)> {
    rows.iter().enumerate().flat_map(|(r, cells)| {
        cells
            .iter()
            .enumerate()
            .map(move |(c, cell)| (Coordinate::new(r, c), cell))
    })
}

/// A dense, rectangular plate of data cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Cell>>", into = "Vec<Vec<Cell>>")]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    /// A `height × width` grid of empty cells.
    pub fn empty(height: usize, width: usize) -> Self {
        // A grid without columns has no rows either.
        let height = if width == 0 { 0 } else { height };
        Self {
            rows: vec![vec![Cell::empty(); width]; height],
        }
    }

    /// Wrap caller-built rows, rejecting jagged input.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self> {
        check_rectangular(&rows)?;
        if rows.first().is_some_and(Vec::is_empty) {
            return Ok(Self::default());
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<Cell>> {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coordinate, &Cell)> {
        iter_rows(&self.rows)
    }

    /// Cells that hold a sample code, in row-major order.
    pub fn filled_cells(&self) -> impl Iterator<Item = (Coordinate, &Cell)> {
        self.iter().filter(|(_, cell)| cell.value.is_some())
    }
}

impl CellGrid for Grid {
    fn height(&self) -> usize {
        self.rows.len()
    }

    fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    fn cell(&self, at: Coordinate) -> Option<&Cell> {
        self.rows.get(at.row).and_then(|row| row.get(at.column))
    }

    fn cell_mut(&mut self, at: Coordinate) -> Option<&mut Cell> {
        self.rows.get_mut(at.row).and_then(|row| row.get_mut(at.column))
    }
}

impl TryFrom<Vec<Vec<Cell>>> for Grid {
    type Error = ModelError;

    fn try_from(rows: Vec<Vec<Cell>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

impl From<Grid> for Vec<Vec<Cell>> {
    fn from(grid: Grid) -> Self {
        grid.rows
    }
}

/// Which frame cell a label is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePosition {
    /// Top-left cell shared by the label row and label column.
    Corner,
    /// Label above data column `n`.
    Column(usize),
    /// Label left of data row `n`.
    Row(usize),
}

/// A grid with its label row and label column.
///
/// Coordinates on a framed grid are framed coordinates: `(0, _)` and `(_, 0)`
/// are frame cells, and well `(r, c)` lives at `(r + 1, c + 1)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Cell>>", into = "Vec<Vec<Cell>>")]
pub struct FramedGrid {
    rows: Vec<Vec<Cell>>,
}

impl FramedGrid {
    /// Wrap a caller-supplied framed table, rejecting jagged input.
    ///
    /// The frame itself is not validated here; stripping it is
    /// unconditional.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self> {
        check_rectangular(&rows)?;
        Ok(Self { rows })
    }

    /// Surround `grid` with read-only frame cells whose labels come from
    /// `label`.
    pub fn from_grid(grid: &Grid, label: impl Fn(FramePosition) -> Option<String>) -> Self {
        let width = grid.width();
        let mut rows = Vec::with_capacity(grid.height() + 1);

        let mut header = Vec::with_capacity(width + 1);
        header.push(Cell::frame(label(FramePosition::Corner)));
        header.extend((0..width).map(|c| Cell::frame(label(FramePosition::Column(c)))));
        rows.push(header);

        for (r, cells) in grid.rows().iter().enumerate() {
            let mut row = Vec::with_capacity(width + 1);
            row.push(Cell::frame(label(FramePosition::Row(r))));
            row.extend(cells.iter().cloned());
            rows.push(row);
        }
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<Cell>> {
        self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coordinate, &Cell)> {
        iter_rows(&self.rows)
    }

    /// Map a framed coordinate to the well it addresses, if any.
    pub fn to_data_coordinate(at: Coordinate) -> Option<Coordinate> {
        if at.row == 0 || at.column == 0 {
            None
        } else {
            Some(Coordinate::new(at.row - 1, at.column - 1))
        }
    }

    /// Map a well coordinate to its framed position.
    pub fn to_framed_coordinate(at: Coordinate) -> Coordinate {
        Coordinate::new(at.row + 1, at.column + 1)
    }
}

impl CellGrid for FramedGrid {
    fn height(&self) -> usize {
        self.rows.len()
    }

    fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    fn cell(&self, at: Coordinate) -> Option<&Cell> {
        self.rows.get(at.row).and_then(|row| row.get(at.column))
    }

    fn cell_mut(&mut self, at: Coordinate) -> Option<&mut Cell> {
        self.rows.get_mut(at.row).and_then(|row| row.get_mut(at.column))
    }
}

impl TryFrom<Vec<Vec<Cell>>> for FramedGrid {
    type Error = ModelError;

    fn try_from(rows: Vec<Vec<Cell>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

impl From<FramedGrid> for Vec<Vec<Cell>> {
    fn from(grid: FramedGrid) -> Self {
        grid.rows
    }
}
