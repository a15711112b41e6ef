use thiserror::Error;

use crate::enums::CellStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid grid id: {0:?}")]
    InvalidGridId(String),
    #[error("invalid applicant id: {0:?}")]
    InvalidApplicantId(String),
    #[error("invalid well name: {0:?}")]
    InvalidWellName(String),
    #[error("grid rows must all have the same length (row {row} has {actual}, expected {expected})")]
    Jagged {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("grid {id} is already finished")]
    AlreadyFinished { id: String },
    #[error("cell status {0} is not configured")]
    UnrecognizedStatus(CellStatus),
}

pub type Result<T> = std::result::Result<T, ModelError>;
