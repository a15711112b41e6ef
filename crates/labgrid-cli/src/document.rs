//! Reading and writing the JSON documents the CLI works on.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

use labgrid_core::to_grid;
use labgrid_model::{CellGrid, Grid, GridDocument};

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parse {}", path.display()))
}

/// Pretty-print `value` to `path`, or to stdout when no path is given.
pub fn write_json<T: Serialize>(path: Option<&Path>, value: &T) -> Result<()> {
    let mut text = serde_json::to_string_pretty(value).context("serialize output")?;
    text.push('\n');
    match path {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("write {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote document");
        }
        None => io::stdout()
            .lock()
            .write_all(text.as_bytes())
            .context("write to stdout")?,
    }
    Ok(())
}

/// A grid document together with its dense grid.
#[derive(Debug, Clone)]
pub struct LoadedGrid {
    pub document: GridDocument,
    pub grid: Grid,
}

impl LoadedGrid {
    pub fn from_document(document: GridDocument) -> Result<Self> {
        let grid = to_grid(&document.cells, document.width, document.height)
            .with_context(|| format!("build grid {}", document.grid.id))?;
        Ok(Self { document, grid })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let document: GridDocument = read_json(path)?;
        let loaded = Self::from_document(document)?;
        tracing::info!(
            grid = %loaded.document.grid.id,
            records = loaded.document.cells.len(),
            height = loaded.grid.height(),
            width = loaded.grid.width(),
            "loaded grid"
        );
        Ok(loaded)
    }

    /// The document with its records rebuilt from the grid.
    ///
    /// Only wells that hold something are written back, so the stored
    /// document stays sparse. The dimensions are pinned so the shape
    /// survives the round trip.
    pub fn into_document(self) -> GridDocument {
        let width = Some(self.grid.width());
        let height = Some(self.grid.height());
        let cells = labgrid_core::to_records(&self.grid)
            .into_iter()
            .filter(|record| {
                record.value.is_some()
                    || record.cell_status.is_some()
                    || record.positive == Some(true)
                    || record.needs_retest == Some(true)
            })
            .collect();
        GridDocument {
            width,
            height,
            cells,
            ..self.document
        }
    }
}
