//! Error types for grid operations.

use labgrid_model::{Coordinate, ModelError};
use thiserror::Error;

/// Errors raised by the codec, the state machine helpers and the diff engine.
///
/// All of them are local failures of a single call; nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Two records claim the same well.
    #[error("duplicate cell record at row {row}, column {column}")]
    DuplicateCell { row: usize, column: usize },

    /// Explicit dimensions are smaller than the extent the records imply.
    #[error(
        "grid dimensions {width}x{height} are smaller than the records require \
         ({required_width}x{required_height})"
    )]
    Dimension {
        width: usize,
        height: usize,
        required_width: usize,
        required_height: usize,
    },

    /// The grid would hold more wells than [`crate::MAX_CELLS`].
    #[error("a {height}x{width} grid exceeds the limit of {max} wells", max = crate::MAX_CELLS)]
    TooLarge { height: usize, width: usize },

    /// Frame removal on a table without a row or column to strip.
    #[error("cannot remove a frame from a {rows}x{columns} table")]
    NotFramed { rows: usize, columns: usize },

    /// Coordinate outside the grid.
    #[error("coordinate {0} is outside the grid")]
    OutOfBounds(Coordinate),

    /// Baseline and working copy differ in shape.
    #[error(
        "grid shapes differ: baseline is {baseline_height}x{baseline_width}, \
         current is {current_height}x{current_width}"
    )]
    ShapeMismatch {
        baseline_height: usize,
        baseline_width: usize,
        current_height: usize,
        current_width: usize,
    },

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result type alias for grid operations.
pub type Result<T> = std::result::Result<T, CodecError>;
