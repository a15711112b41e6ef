#![deny(unsafe_code)]

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ModelError;
use crate::enums::{CellStatus, EntryState, EvaluationState};

/// Zero-based position of a well within one grid.
///
/// Ordering is row-major, which is the traversal order of every walk over a
/// grid.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Coordinate {
    pub row: usize,
    pub column: usize,
}

impl Coordinate {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// Plate well name, e.g. `A1` for `(0, 0)` and `H12` for `(7, 11)`.
    pub fn well_name(&self) -> String {
        format!("{}{}", row_label(self.row), column_label(self.column))
    }

    /// Parse a plate well name (`A1`, `h12`, `AA3`).
    pub fn from_well_name(name: &str) -> Result<Self, ModelError> {
        let trimmed = name.trim();
        let split = trimmed
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(trimmed.len());
        let (letters, digits) = trimmed.split_at(split);
        if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(ModelError::InvalidWellName(name.to_string()));
        }

        let mut row = 0usize;
        for letter in letters.bytes() {
            let value = usize::from(letter.to_ascii_uppercase() - b'A') + 1;
            row = row
                .checked_mul(26)
                .and_then(|r| r.checked_add(value))
                .ok_or_else(|| ModelError::InvalidWellName(name.to_string()))?;
        }
        let column: usize = digits
            .parse()
            .map_err(|_| ModelError::InvalidWellName(name.to_string()))?;
        if column == 0 {
            return Err(ModelError::InvalidWellName(name.to_string()));
        }
        Ok(Self::new(row - 1, column - 1))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Plate row letter for a zero-based row index: `A`..`Z`, then `AA`, `AB`, ...
pub fn row_label(row: usize) -> String {
    let mut result = String::new();
    let mut n = row;
    loop {
        result.insert(0, char::from(b'A' + (n % 26) as u8));
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

/// Plate column number for a zero-based column index (1-based text).
pub fn column_label(column: usize) -> String {
    (column as u128 + 1).to_string()
}

/// A materialized well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Sample code, or the positional label for frame cells.
    pub value: Option<String>,
    pub cell_status: Option<CellStatus>,
    pub positive: bool,
    pub needs_retest: bool,
    /// Only frame cells are read-only.
    pub read_only: bool,
}

impl Cell {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// A read-only frame cell holding a positional label.
    pub fn frame(label: Option<String>) -> Self {
        Self {
            value: label,
            read_only: true,
            ..Self::default()
        }
    }

    /// The value with blank strings treated as missing.
    pub fn normalized_value(&self) -> Option<&str> {
        self.value.as_deref().filter(|v| !v.trim().is_empty())
    }

    pub fn has_value(&self) -> bool {
        self.normalized_value().is_some()
    }

    pub fn is_frame(&self) -> bool {
        self.read_only
    }

    pub fn entry_state(&self) -> EntryState {
        if self.has_value() {
            return EntryState::Filled;
        }
        match self.cell_status {
            Some(status) if status.is_special() => EntryState::SpecialStatus(status),
            _ => EntryState::Empty,
        }
    }

    pub fn evaluation_state(&self) -> EvaluationState {
        EvaluationState::from_flags(self.positive, self.needs_retest)
    }

    pub fn set_evaluation_state(&mut self, state: EvaluationState) {
        let (positive, needs_retest) = state.flags();
        self.positive = positive;
        self.needs_retest = needs_retest;
    }
}

/// A persisted well, as handed over by the storage layer.
///
/// Records are sparse: wells that were never written have no record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRecord {
    pub row: usize,
    pub column: usize,
    #[serde(default, alias = "sample_code")]
    pub value: Option<String>,
    #[serde(default)]
    pub cell_status: Option<CellStatus>,
    #[serde(default)]
    pub positive: Option<bool>,
    #[serde(default)]
    pub needs_retest: Option<bool>,
}

impl CellRecord {
    pub fn new(row: usize, column: usize) -> Self {
        Self {
            row,
            column,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: CellStatus) -> Self {
        self.cell_status = Some(status);
        self
    }

    #[must_use]
    pub fn with_flags(mut self, positive: bool, needs_retest: bool) -> Self {
        self.positive = Some(positive);
        self.needs_retest = Some(needs_retest);
        self
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.row, self.column)
    }

    /// Materialize the record as a data cell. Missing flags become `false`.
    pub fn to_cell(&self) -> Cell {
        Cell {
            value: self.value.clone(),
            cell_status: self.cell_status,
            positive: self.positive.unwrap_or(false),
            needs_retest: self.needs_retest.unwrap_or(false),
            read_only: false,
        }
    }

    /// Flatten a data cell back into a record at `coordinate`.
    pub fn from_cell(coordinate: Coordinate, cell: &Cell) -> Self {
        Self {
            row: coordinate.row,
            column: coordinate.column,
            value: cell.value.clone(),
            cell_status: cell.cell_status,
            positive: Some(cell.positive),
            needs_retest: Some(cell.needs_retest),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_names_follow_plate_layout() {
        assert_eq!(Coordinate::new(0, 0).well_name(), "A1");
        assert_eq!(Coordinate::new(7, 11).well_name(), "H12");
        assert_eq!(Coordinate::new(26, 2).well_name(), "AA3");
    }

    #[test]
    fn last_column_label_does_not_overflow() {
        assert_eq!(column_label(usize::MAX), (usize::MAX as u128 + 1).to_string());
    }

    #[test]
    fn well_names_parse_back() {
        for coordinate in [
            Coordinate::new(0, 0),
            Coordinate::new(7, 11),
            Coordinate::new(27, 0),
            Coordinate::new(701, 4),
        ] {
            assert_eq!(
                Coordinate::from_well_name(&coordinate.well_name()),
                Ok(coordinate)
            );
        }
        assert_eq!(
            Coordinate::from_well_name("h12"),
            Ok(Coordinate::new(7, 11))
        );
    }

    #[test]
    fn malformed_well_names_are_rejected() {
        for name in ["", "A", "12", "A0", "A1B", "1A", "A-1"] {
            assert!(Coordinate::from_well_name(name).is_err(), "{name}");
        }
    }

    #[test]
    fn blank_value_is_not_filled() {
        let cell = Cell::with_value("  ");
        assert!(!cell.has_value());
        assert_eq!(cell.entry_state(), EntryState::Empty);
    }
}
