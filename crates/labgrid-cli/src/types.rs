use chrono::{DateTime, Utc};
use serde::Serialize;

use labgrid_model::{CellPatch, GridId};

/// Everything `labgrid create` needs to lay out an empty plate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGrid {
    /// Generated when not given.
    pub id: Option<GridId>,
    pub title: Option<String>,
    pub width: usize,
    pub height: usize,
    pub sample_arrival_date: Option<DateTime<Utc>>,
    pub sample_taken_date: Option<DateTime<Utc>>,
    pub test_initiation_date: Option<DateTime<Utc>>,
}

/// Which change set `diff` reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DiffMode {
    Entry,
    Evaluation,
    #[default]
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicantAction {
    Encrypt,
    Decrypt,
}

/// Output of `labgrid diff`: what a save of the working copy would write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffReport {
    pub grid: GridId,
    pub title_changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<Vec<CellPatch>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<Vec<CellPatch>>,
}

impl DiffReport {
    pub fn patch_count(&self) -> usize {
        self.entry.as_ref().map_or(0, Vec::len) + self.evaluation.as_ref().map_or(0, Vec::len)
    }
}
