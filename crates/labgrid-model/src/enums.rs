//! Type-safe enumerations for plate cells.
//!
//! Cell statuses are stored as plain strings by the persistence layer; these
//! enums give them a closed, exhaustively matchable shape in memory.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Workflow status tag of a well.
///
/// `Normal` is the neutral marker every filled well carries. The remaining
/// variants are "special" tags staged on empty wells during sample entry
/// (controls, blanks, wells that must not be used).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellStatus {
    /// Regular sample well.
    Normal,
    /// Well reserved for the positive control.
    PositiveControl,
    /// Well reserved for the negative control.
    NegativeControl,
    /// Intentionally left blank.
    Blank,
    /// Damaged or otherwise unusable well.
    Invalid,
}

impl CellStatus {
    /// All statuses in presentation order.
    pub const ALL: [CellStatus; 5] = [
        CellStatus::Normal,
        CellStatus::PositiveControl,
        CellStatus::NegativeControl,
        CellStatus::Blank,
        CellStatus::Invalid,
    ];

    /// Returns the tag as stored by the persistence layer.
    pub fn as_str(&self) -> &'static str {
        match self {
            CellStatus::Normal => "normal",
            CellStatus::PositiveControl => "positive_control",
            CellStatus::NegativeControl => "negative_control",
            CellStatus::Blank => "blank",
            CellStatus::Invalid => "invalid",
        }
    }

    /// Returns true for every tag other than `Normal`.
    pub fn is_special(&self) -> bool {
        !matches!(self, CellStatus::Normal)
    }
}

impl fmt::Display for CellStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CellStatus {
    type Err = String;

    /// Parse a stored tag (case-insensitive, `-` and `_` interchangeable).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");

        match normalized.as_str() {
            "normal" => Ok(CellStatus::Normal),
            "positive_control" => Ok(CellStatus::PositiveControl),
            "negative_control" => Ok(CellStatus::NegativeControl),
            "blank" => Ok(CellStatus::Blank),
            "invalid" => Ok(CellStatus::Invalid),
            _ => Err(format!("Unknown cell status: {s}")),
        }
    }
}

/// Position of a well in the entry workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryState {
    /// No sample code and no special tag.
    Empty,
    /// Holds a sample code.
    Filled,
    /// Empty well carrying a special tag.
    SpecialStatus(CellStatus),
}

/// Result mark of a filled well.
///
/// The three states are mutually exclusive: a well is never both positive
/// and scheduled for a retest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationState {
    #[default]
    Unmarked,
    Positive,
    NeedsRetest,
}

impl EvaluationState {
    /// Build the state from the two stored flags. `positive` wins if a
    /// record carries both.
    pub fn from_flags(positive: bool, needs_retest: bool) -> Self {
        if positive {
            EvaluationState::Positive
        } else if needs_retest {
            EvaluationState::NeedsRetest
        } else {
            EvaluationState::Unmarked
        }
    }

    /// Returns `(positive, needs_retest)`.
    pub fn flags(&self) -> (bool, bool) {
        match self {
            EvaluationState::Unmarked => (false, false),
            EvaluationState::Positive => (true, false),
            EvaluationState::NeedsRetest => (false, true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_stored_tags() {
        for status in CellStatus::ALL {
            assert_eq!(status.as_str().parse::<CellStatus>(), Ok(status));
        }
        assert_eq!(
            "Positive-Control".parse::<CellStatus>(),
            Ok(CellStatus::PositiveControl)
        );
        assert!("control".parse::<CellStatus>().is_err());
    }

    #[test]
    fn evaluation_flags_round_trip() {
        for state in [
            EvaluationState::Unmarked,
            EvaluationState::Positive,
            EvaluationState::NeedsRetest,
        ] {
            let (positive, needs_retest) = state.flags();
            assert_eq!(EvaluationState::from_flags(positive, needs_retest), state);
        }
    }
}
