//! Row-major CSV export of a finished grid.

use std::fs;
use std::path::{Path, PathBuf};

use labgrid_model::Grid;

use crate::dialect::ExportDialect;
use crate::error::{ExportError, Result};

/// Options for dialect export.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    /// Emit the dialect's column names as the first line.
    pub include_header: bool,
}

/// Export `grid` with default options.
pub fn export_dialect(grid: &Grid, dialect: ExportDialect) -> Result<String> {
    export_dialect_with(grid, dialect, ExportOptions::default())
}

/// Export every well that holds a value, one line per well in row-major
/// order.
///
/// Wells without a value, or with a blank one, are skipped, and sample codes
/// are written trimmed. Two dialects exported from the same
/// grid always have the same number of lines in the same well order.
pub fn export_dialect_with(
    grid: &Grid,
    dialect: ExportDialect,
    options: ExportOptions,
) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(dialect.delimiter())
        .terminator(csv::Terminator::Any(b'\n'))
        .has_headers(false)
        .from_writer(Vec::new());

    if options.include_header {
        writer.write_record(dialect.header())?;
    }
    for (at, cell) in grid.iter() {
        let Some(sample) = cell.normalized_value() else {
            continue;
        };
        let sample = sample.trim();
        writer.write_record(dialect.fields(at, sample, cell))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Download file name for an export, e.g. `biorad-Run 12.csv`.
///
/// Path separators in the title are replaced so the name stays a single path
/// component.
pub fn export_file_name(dialect: ExportDialect, title: &str) -> String {
    let title: String = title
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    if title.is_empty() {
        format!("{dialect}.csv")
    } else {
        format!("{dialect}-{title}.csv")
    }
}

/// Write an export into `output_dir`, creating the directory if needed.
pub fn write_export(
    output_dir: &Path,
    grid: &Grid,
    dialect: ExportDialect,
    title: &str,
    options: ExportOptions,
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(export_file_name(dialect, title));
    fs::write(&path, export_dialect_with(grid, dialect, options)?)?;
    Ok(path)
}
