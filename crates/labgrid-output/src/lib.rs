//! Tabular exports of finished plate grids.
//!
//! Each instrument family reads its own CSV dialect:
//!
//! - **Bio-Rad** (`biorad`): comma-separated well name, sample and call code
//! - **Brand** (`brand`): semicolon-separated 1-based row and column, sample
//!   and a `1`/`0` positive column
//!
//! All dialects walk the grid in the same order and skip the same wells.
//! Whether a grid is finished is the caller's concern.

mod dialect;
mod error;
mod export;

pub use dialect::ExportDialect;
pub use error::{ExportError, Result};
pub use export::{
    ExportOptions, export_dialect, export_dialect_with, export_file_name, write_export,
};
