//! Data model for laboratory plate grids.
//!
//! Everything here is a plain value: records as stored, dense grids, patches,
//! status tags and the applicant record whose personal fields are encrypted
//! at rest.

pub mod applicant;
pub mod cell;
pub mod enums;
pub mod error;
pub mod grid;
pub mod ids;
pub mod metadata;
pub mod palette;
pub mod patch;

pub use applicant::Applicant;
pub use cell::{Cell, CellRecord, Coordinate, column_label, row_label};
pub use enums::{CellStatus, EntryState, EvaluationState};
pub use error::{ModelError, Result};
pub use grid::{CellGrid, FramePosition, FramedGrid, Grid};
pub use ids::{ApplicantId, GridId};
pub use metadata::{GridDocument, GridMetadata, GridUpdate};
pub use palette::{DisplayHint, StatusPalette};
pub use patch::{CellPatch, PatchChange};
