//! Cell state machine transitions on whole grids.

use labgrid_core::{
    CodecError, EntryAction, EvaluationAction, NonEmptyCode, PatternCode, Selection, Transition,
    add_frame, apply_entry, apply_evaluation, clear_value, enter_value, mark, tag_cell,
    tag_selection, tag_selection_checked,
};
use labgrid_model::{
    Cell, CellGrid, CellStatus, Coordinate, DisplayHint, EntryState, EvaluationState, FramedGrid,
    Grid, ModelError, StatusPalette,
};
use proptest::prelude::*;
use std::collections::BTreeMap;

#[test]
fn bulk_tag_skips_filled_cells() {
    let mut grid = Grid::empty(1, 2);
    let _ = enter_value(&mut grid, Coordinate::new(0, 0), "X").expect("enter");

    let selection = Selection::new(Coordinate::new(0, 0), Coordinate::new(0, 1));
    let changed = tag_selection(&mut grid, selection, CellStatus::NegativeControl);

    assert_eq!(changed, 1);
    let filled = grid.cell(Coordinate::new(0, 0)).expect("cell");
    assert_eq!(filled.value.as_deref(), Some("X"));
    assert_eq!(filled.cell_status, Some(CellStatus::Normal));
    let tagged = grid.cell(Coordinate::new(0, 1)).expect("cell");
    assert_eq!(tagged.cell_status, Some(CellStatus::NegativeControl));
}

#[test]
fn bulk_tag_leaves_the_frame_alone() {
    let mut framed = add_frame(&Grid::empty(2, 2));
    let selection = Selection::new(Coordinate::new(0, 0), Coordinate::new(2, 2));
    let changed = tag_selection(&mut framed, selection, CellStatus::Blank);

    assert_eq!(changed, 4);
    for (at, cell) in framed.iter() {
        if FramedGrid::to_data_coordinate(at).is_some() {
            assert_eq!(cell.cell_status, Some(CellStatus::Blank));
        } else {
            assert_eq!(cell.cell_status, None);
        }
    }
}

#[test]
fn bulk_tag_counts_only_changes() {
    let mut grid = Grid::empty(2, 2);
    let all = Selection::new(Coordinate::new(0, 0), Coordinate::new(5, 5));
    assert_eq!(tag_selection(&mut grid, all, CellStatus::Invalid), 4);
    assert_eq!(tag_selection(&mut grid, all, CellStatus::Invalid), 0);
    assert_eq!(tag_selection(&mut grid, all, CellStatus::Normal), 4);
    assert!(grid.iter().all(|(_, c)| c.entry_state() == EntryState::Empty));
}

#[test]
fn checked_bulk_tag_rejects_unconfigured_status() {
    let palette = StatusPalette::new(BTreeMap::from([(
        CellStatus::Blank,
        DisplayHint::new("Blank", "#9e9e9e"),
    )]));
    let mut grid = Grid::empty(1, 1);
    let selection = Selection::single(Coordinate::new(0, 0));

    let err = tag_selection_checked(&mut grid, selection, CellStatus::Invalid, &palette)
        .expect_err("unconfigured");
    assert_eq!(
        err,
        CodecError::Model(ModelError::UnrecognizedStatus(CellStatus::Invalid))
    );
    assert_eq!(grid, Grid::empty(1, 1));

    let changed = tag_selection_checked(&mut grid, selection, CellStatus::Blank, &palette)
        .expect("configured");
    assert_eq!(changed, 1);
}

#[test]
fn selection_reaching_the_integer_limit_is_clamped() {
    let mut grid = Grid::empty(2, 3);
    let selection = Selection::new(
        Coordinate::new(1, 1),
        Coordinate::new(usize::MAX, usize::MAX),
    );
    let wells: Vec<_> = selection.clamped(2, 3).collect();
    assert_eq!(wells, vec![Coordinate::new(1, 1), Coordinate::new(1, 2)]);
    assert_eq!(tag_selection(&mut grid, selection, CellStatus::Blank), 2);
}

#[test]
fn helpers_report_out_of_bounds() {
    let mut grid = Grid::empty(2, 2);
    let outside = Coordinate::new(2, 0);
    assert_eq!(
        enter_value(&mut grid, outside, "S1"),
        Err(CodecError::OutOfBounds(outside))
    );
    assert_eq!(
        clear_value(&mut grid, outside),
        Err(CodecError::OutOfBounds(outside))
    );
    assert_eq!(
        tag_cell(&mut grid, outside, CellStatus::Blank),
        Err(CodecError::OutOfBounds(outside))
    );
    assert_eq!(
        mark(&mut grid, outside, EvaluationAction::Primary, &NonEmptyCode),
        Err(CodecError::OutOfBounds(outside))
    );
}

#[test]
fn marking_respects_the_validator() {
    let validator = PatternCode::new("^[0-9]{6}$").expect("pattern");
    let mut grid = Grid::empty(1, 2);
    let _ = enter_value(&mut grid, Coordinate::new(0, 0), "100001").expect("enter");
    let _ = enter_value(&mut grid, Coordinate::new(0, 1), "oops").expect("enter");

    assert_eq!(
        mark(&mut grid, Coordinate::new(0, 0), EvaluationAction::Primary, &validator),
        Ok(Transition::Applied)
    );
    assert_eq!(
        mark(&mut grid, Coordinate::new(0, 1), EvaluationAction::Primary, &validator),
        Ok(Transition::Ignored)
    );
    assert!(grid.cell(Coordinate::new(0, 0)).expect("cell").positive);
    assert!(!grid.cell(Coordinate::new(0, 1)).expect("cell").positive);
}

#[test]
fn clearing_a_value_keeps_the_marks() {
    let mut grid = Grid::empty(1, 1);
    let at = Coordinate::new(0, 0);
    let _ = enter_value(&mut grid, at, "S1").expect("enter");
    let _ = mark(&mut grid, at, EvaluationAction::Secondary, &NonEmptyCode).expect("mark");

    assert_eq!(clear_value(&mut grid, at), Ok(Transition::Applied));
    assert_eq!(clear_value(&mut grid, at), Ok(Transition::Ignored));
    let cell = grid.cell(at).expect("cell");
    assert_eq!(cell.value, None);
    assert_eq!(cell.evaluation_state(), EvaluationState::NeedsRetest);
}

#[derive(Debug, Clone)]
enum Action {
    Entry(EntryAction),
    Evaluation(EvaluationAction),
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        "[A-Z0-9 ]{0,4}".prop_map(|v| Action::Entry(EntryAction::EnterValue(v))),
        Just(Action::Entry(EntryAction::ClearValue)),
        proptest::sample::select(CellStatus::ALL.to_vec())
            .prop_map(|tag| Action::Entry(EntryAction::Tag(tag))),
        Just(Action::Evaluation(EvaluationAction::Primary)),
        Just(Action::Evaluation(EvaluationAction::Secondary)),
    ]
}

proptest! {
    #[test]
    fn entry_and_evaluation_stay_exclusive(
        actions in proptest::collection::vec(arb_action(), 0..40)
    ) {
        let mut cell = Cell::empty();
        for action in actions {
            let _ = match action {
                Action::Entry(action) => apply_entry(&mut cell, action),
                Action::Evaluation(action) => apply_evaluation(&mut cell, action, &NonEmptyCode),
            };
            if cell.has_value() {
                prop_assert_eq!(cell.cell_status, Some(CellStatus::Normal));
            }
            prop_assert!(!(cell.positive && cell.needs_retest));
            prop_assert!(!cell.read_only);
        }
    }

    #[test]
    fn frame_cells_never_change(
        actions in proptest::collection::vec(arb_action(), 0..20)
    ) {
        let mut cell = Cell::frame(Some("A".to_string()));
        let before = cell.clone();
        for action in actions {
            let transition = match action {
                Action::Entry(action) => apply_entry(&mut cell, action),
                Action::Evaluation(action) => apply_evaluation(&mut cell, action, &NonEmptyCode),
            };
            prop_assert_eq!(transition, Transition::Ignored);
        }
        prop_assert_eq!(cell, before);
    }
}
