//! Plate grid core: record codec, per-cell state machines and diff engine.
//!
//! Every function here is synchronous and free of I/O. Nothing logs; failures
//! come back as [`CodecError`].

pub mod codec;
pub mod diff;
pub mod error;
pub mod machine;
pub mod validator;

pub use codec::{
    MAX_CELLS, add_frame, frame_label, is_assignable_cell, remove_frame, to_grid, to_records,
};
pub use diff::{
    GridChanges, apply_patches, diff_entry, diff_entry_framed, diff_evaluation,
    diff_evaluation_framed, has_entry_changes, has_evaluation_changes,
};
pub use error::{CodecError, Result};
pub use machine::{
    EntryAction, EvaluationAction, Selection, Transition, apply_entry, apply_evaluation,
    clear_value, enter_value, mark, tag_cell, tag_selection, tag_selection_checked,
};
pub use validator::{NonEmptyCode, PatternCode, SampleCodeValidator};
