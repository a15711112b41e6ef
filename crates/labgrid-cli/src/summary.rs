//! Terminal tables for grids, palettes and change reports.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use labgrid_model::{
    Cell as GridCell, CellGrid, EntryState, EvaluationState, FramedGrid, StatusPalette,
};

use crate::types::DiffReport;

/// Text shown for one well: the sample code with a result marker, or the
/// label of its staged status.
///
/// `+` marks a positive result and `?` a retest.
pub fn cell_text(cell: &GridCell, palette: &StatusPalette) -> String {
    let text = match cell.entry_state() {
        EntryState::Filled => cell.normalized_value().unwrap_or_default().to_string(),
        EntryState::SpecialStatus(status) => palette
            .hint(status)
            .map_or_else(|| status.to_string(), |hint| hint.label.clone()),
        EntryState::Empty => String::new(),
    };
    match cell.evaluation_state() {
        EvaluationState::Unmarked => text,
        EvaluationState::Positive => format!("{text} +"),
        EvaluationState::NeedsRetest => format!("{text} ?"),
    }
}

/// Parse a `#rrggbb` hint color.
pub fn hint_color(color: &str) -> Option<Color> {
    let hex = color.trim().strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    Some(Color::Rgb {
        r: channel(0..2)?,
        g: channel(2..4)?,
        b: channel(4..6)?,
    })
}

/// Render a framed grid; the frame becomes the header row and first column.
pub fn grid_table(framed: &FramedGrid, palette: &StatusPalette) -> Table {
    let mut table = Table::new();
    apply_table_style(&mut table);
    let Some((header, rows)) = framed.rows().split_first() else {
        return table;
    };
    let labels: Vec<Cell> = header
        .iter()
        .map(|cell| header_cell(cell.value.as_deref().unwrap_or_default()))
        .collect();
    table.set_header(labels);
    for row in rows {
        let mut cells = Vec::with_capacity(row.len());
        for cell in row {
            if cell.is_frame() {
                cells.push(header_cell(cell.value.as_deref().unwrap_or_default()));
                continue;
            }
            cells.push(well_cell(cell, palette));
        }
        table.add_row(cells);
    }
    for index in 1..framed.width() {
        align_column(&mut table, index, CellAlignment::Center);
    }
    table
}

fn well_cell(cell: &GridCell, palette: &StatusPalette) -> Cell {
    let text = cell_text(cell, palette);
    let mut rendered = match cell.entry_state() {
        EntryState::SpecialStatus(status) => {
            let color = palette
                .hint(status)
                .and_then(|hint| hint_color(&hint.color))
                .unwrap_or(Color::DarkGrey);
            Cell::new(text).fg(color)
        }
        EntryState::Filled | EntryState::Empty => Cell::new(text),
    };
    match cell.evaluation_state() {
        EvaluationState::Positive => {
            rendered = rendered.fg(Color::Red).add_attribute(Attribute::Bold);
        }
        EvaluationState::NeedsRetest => rendered = rendered.fg(Color::Yellow),
        EvaluationState::Unmarked => {}
    }
    rendered
}

pub fn status_table(palette: &StatusPalette) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Status"),
        header_cell("Label"),
        header_cell("Color"),
    ]);
    apply_table_style(&mut table);
    for (status, hint) in palette.iter() {
        let swatch = match hint_color(&hint.color) {
            Some(color) => Cell::new(&hint.color).fg(color),
            None => dim_cell(&hint.color),
        };
        table.add_row(vec![Cell::new(status), Cell::new(&hint.label), swatch]);
    }
    table
}

pub fn print_diff_summary(report: &DiffReport) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Stage"), header_cell("Patches")]);
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS);
    align_column(&mut table, 1, CellAlignment::Right);
    for (stage, patches) in [("entry", &report.entry), ("evaluation", &report.evaluation)] {
        let count = match patches {
            Some(patches) if !patches.is_empty() => Cell::new(patches.len())
                .fg(Color::Yellow)
                .add_attribute(Attribute::Bold),
            Some(_) => dim_cell(0),
            None => dim_cell("-"),
        };
        table.add_row(vec![Cell::new(stage), count]);
    }
    let title = if report.title_changed {
        Cell::new("changed").fg(Color::Yellow)
    } else {
        dim_cell("unchanged")
    };
    table.add_row(vec![Cell::new("title"), title]);
    eprintln!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use labgrid_model::{CellStatus, Coordinate, Grid};

    use super::*;

    #[test]
    fn hint_colors_parse() {
        assert_eq!(
            hint_color("#ff9800"),
            Some(Color::Rgb {
                r: 0xff,
                g: 0x98,
                b: 0x00
            })
        );
        assert_eq!(hint_color("orange"), None);
        assert_eq!(hint_color("#fff"), None);
    }

    #[test]
    fn grid_table_has_frame_header() {
        let mut grid = Grid::empty(2, 3);
        grid.cell_mut(Coordinate::new(1, 2)).unwrap().value = Some("100006".into());
        let framed = FramedGrid::from_grid(&grid, labgrid_core::frame_label);

        let mut table = grid_table(&framed, &StatusPalette::default());
        table.force_no_tty();
        let rendered = table.to_string();
        assert_eq!(table.column_count(), 4);
        assert!(rendered.contains("100006"));
        assert!(rendered.lines().any(|line| line.contains('B')));
    }

    #[test]
    fn status_label_replaces_empty_value() {
        let palette = StatusPalette::default();
        let cell = GridCell {
            cell_status: Some(CellStatus::PositiveControl),
            ..GridCell::empty()
        };
        assert_eq!(cell_text(&cell, &palette), "Positive control");
    }
}
