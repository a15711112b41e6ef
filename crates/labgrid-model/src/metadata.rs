//! Grid-level metadata and the documents exchanged with storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cell::CellRecord;
use crate::error::{ModelError, Result};
use crate::ids::GridId;

/// Metadata of one plate run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridMetadata {
    pub id: GridId,
    #[serde(default)]
    pub title: Option<String>,
    /// Terminal marker. Set once by [`GridMetadata::finish`], never cleared.
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub sample_arrival_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sample_taken_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub test_initiation_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub test_finished_date: Option<DateTime<Utc>>,
}

impl GridMetadata {
    pub fn new(id: GridId) -> Self {
        Self {
            id,
            title: None,
            finished: false,
            sample_arrival_date: None,
            sample_taken_date: None,
            test_initiation_date: None,
            test_finished_date: None,
        }
    }

    /// Title or, failing that, the grid id.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(self.id.as_str())
    }

    /// Mark the grid finished at `at` and return the update to persist.
    pub fn finish(&mut self, at: DateTime<Utc>) -> Result<GridUpdate> {
        if self.finished {
            return Err(ModelError::AlreadyFinished {
                id: self.id.to_string(),
            });
        }
        self.finished = true;
        self.test_finished_date = Some(at);
        Ok(GridUpdate {
            id: self.id.clone(),
            title: self.title.clone(),
            finished: Some(true),
        })
    }
}

/// Metadata fields sent to storage alongside cell patches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridUpdate {
    pub id: GridId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished: Option<bool>,
}

/// One grid as loaded from storage: metadata plus its sparse cell records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDocument {
    pub grid: GridMetadata,
    /// Plate width in wells, when fixed by the plate format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<usize>,
    #[serde(default)]
    pub cells: Vec<CellRecord>,
}
