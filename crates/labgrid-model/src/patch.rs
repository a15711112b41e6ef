//! Per-cell changes handed to the persistence layer.

use serde::{Deserialize, Serialize};

use crate::cell::Coordinate;
use crate::enums::CellStatus;

/// The persisted fields a patch rewrites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PatchChange {
    /// Sample-code entry: value and status tag.
    Entry {
        value: Option<String>,
        cell_status: Option<CellStatus>,
    },
    /// Result marking: both evaluation flags.
    Evaluation { positive: bool, needs_retest: bool },
}

/// A minimal change to one well.
///
/// Patches never depend on each other and can be written in any order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellPatch {
    pub row: usize,
    pub column: usize,
    #[serde(flatten)]
    pub change: PatchChange,
}

impl CellPatch {
    pub fn entry(at: Coordinate, value: Option<String>, cell_status: Option<CellStatus>) -> Self {
        Self {
            row: at.row,
            column: at.column,
            change: PatchChange::Entry { value, cell_status },
        }
    }

    pub fn evaluation(at: Coordinate, positive: bool, needs_retest: bool) -> Self {
        Self {
            row: at.row,
            column: at.column,
            change: PatchChange::Evaluation {
                positive,
                needs_retest,
            },
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.row, self.column)
    }
}
