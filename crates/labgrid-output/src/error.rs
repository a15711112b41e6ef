//! Error types for exporters.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("exported text is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("unknown export dialect `{0}` (expected `biorad` or `brand`)")]
    UnknownDialect(String),
}

/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
