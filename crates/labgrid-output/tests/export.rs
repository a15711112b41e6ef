//! Dialect export of finished grids.

use labgrid_model::{Cell, CellGrid, Coordinate, Grid};
use labgrid_output::{
    ExportDialect, ExportOptions, export_dialect, export_dialect_with, export_file_name,
    write_export,
};

fn finished_plate() -> Grid {
    let mut grid = Grid::empty(2, 3);
    let wells = [
        (Coordinate::new(0, 0), "100001", false, false),
        (Coordinate::new(0, 2), "100003", true, false),
        (Coordinate::new(1, 1), "100005", false, true),
    ];
    for (at, code, positive, needs_retest) in wells {
        *grid.cell_mut(at).expect("cell") = Cell {
            positive,
            needs_retest,
            ..Cell::with_value(code)
        };
    }
    grid
}

#[test]
fn biorad_uses_well_names_and_call_codes() {
    let output = export_dialect(&finished_plate(), ExportDialect::Biorad).expect("export");
    insta::assert_snapshot!(output, @r"
    A1,100001,NEG
    A3,100003,POS
    B2,100005,RPT
    ");
}

#[test]
fn brand_uses_one_based_positions() {
    let options = ExportOptions {
        include_header: true,
    };
    let output =
        export_dialect_with(&finished_plate(), ExportDialect::Brand, options).expect("export");
    insta::assert_snapshot!(output, @r"
    Row;Column;Sample;Positive
    1;1;100001;0
    1;3;100003;1
    2;2;100005;0
    ");
}

#[test]
fn blank_wells_are_not_exported() {
    let mut grid = finished_plate();
    *grid.cell_mut(Coordinate::new(0, 1)).expect("cell") = Cell::with_value("");
    *grid.cell_mut(Coordinate::new(1, 0)).expect("cell") = Cell {
        positive: true,
        ..Cell::with_value("   ")
    };
    *grid.cell_mut(Coordinate::new(1, 2)).expect("cell") = Cell::with_value(" 100006 ");

    let biorad = export_dialect(&grid, ExportDialect::Biorad).expect("biorad");
    insta::assert_snapshot!(biorad, @r"
    A1,100001,NEG
    A3,100003,POS
    B2,100005,RPT
    B3,100006,NEG
    ");
    let brand = export_dialect(&grid, ExportDialect::Brand).expect("brand");
    insta::assert_snapshot!(brand, @r"
    1;1;100001;0
    1;3;100003;1
    2;2;100005;0
    2;3;100006;0
    ");
}

#[test]
fn dialects_agree_line_for_line() {
    let grid = finished_plate();
    let biorad = export_dialect(&grid, ExportDialect::Biorad).expect("biorad");
    let brand = export_dialect(&grid, ExportDialect::Brand).expect("brand");
    assert_eq!(biorad.lines().count(), brand.lines().count());
    for (left, right) in biorad.lines().zip(brand.lines()) {
        let sample_left = left.split(',').nth(1);
        let sample_right = right.split(';').nth(2);
        assert_eq!(sample_left, sample_right);
    }
}

#[test]
fn empty_grid_exports_nothing() {
    let output = export_dialect(&Grid::empty(8, 12), ExportDialect::Brand).expect("export");
    assert_eq!(output, "");
}

#[test]
fn file_names_carry_dialect_and_title() {
    assert_eq!(
        export_file_name(ExportDialect::Biorad, "Run 12"),
        "biorad-Run 12.csv"
    );
    assert_eq!(
        export_file_name(ExportDialect::Brand, "a/b"),
        "brand-a_b.csv"
    );
    assert_eq!(export_file_name(ExportDialect::Brand, "  "), "brand.csv");
}

#[test]
fn write_export_creates_the_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("exports");
    let path = write_export(
        &out,
        &finished_plate(),
        ExportDialect::Biorad,
        "Monday",
        ExportOptions::default(),
    )
    .expect("write");

    assert_eq!(path, out.join("biorad-Monday.csv"));
    let written = std::fs::read_to_string(&path).expect("read");
    assert_eq!(written.lines().next(), Some("A1,100001,NEG"));
}
