//! Instrument dialects and their column layouts.

use std::fmt;
use std::str::FromStr;

use labgrid_model::{Cell, Coordinate, EvaluationState};

use crate::error::ExportError;

/// A tabular format understood by one instrument family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportDialect {
    /// Bio-Rad plate setup: `Well,Sample,Call`.
    Biorad,
    /// Plate-reader import: `Row;Column;Sample;Positive`, 1-based positions.
    Brand,
}

impl ExportDialect {
    pub const ALL: [ExportDialect; 2] = [ExportDialect::Biorad, ExportDialect::Brand];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportDialect::Biorad => "biorad",
            ExportDialect::Brand => "brand",
        }
    }

    pub fn delimiter(&self) -> u8 {
        match self {
            ExportDialect::Biorad => b',',
            ExportDialect::Brand => b';',
        }
    }

    pub fn header(&self) -> &'static [&'static str] {
        match self {
            ExportDialect::Biorad => &["Well", "Sample", "Call"],
            ExportDialect::Brand => &["Row", "Column", "Sample", "Positive"],
        }
    }

    /// Output fields for one filled well.
    pub(crate) fn fields(&self, at: Coordinate, sample: &str, cell: &Cell) -> Vec<String> {
        match self {
            ExportDialect::Biorad => vec![
                at.well_name(),
                sample.to_string(),
                call_code(cell.evaluation_state()).to_string(),
            ],
            ExportDialect::Brand => vec![
                (at.row + 1).to_string(),
                (at.column + 1).to_string(),
                sample.to_string(),
                if cell.positive { "1" } else { "0" }.to_string(),
            ],
        }
    }
}

fn call_code(state: EvaluationState) -> &'static str {
    match state {
        EvaluationState::Unmarked => "NEG",
        EvaluationState::Positive => "POS",
        EvaluationState::NeedsRetest => "RPT",
    }
}

impl fmt::Display for ExportDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportDialect {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "biorad" | "bio-rad" => Ok(ExportDialect::Biorad),
            "brand" => Ok(ExportDialect::Brand),
            _ => Err(ExportError::UnknownDialect(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialects_parse_by_name() {
        for dialect in ExportDialect::ALL {
            assert_eq!(dialect.as_str().parse::<ExportDialect>().unwrap(), dialect);
        }
        assert_eq!(
            "Bio-Rad".parse::<ExportDialect>().unwrap(),
            ExportDialect::Biorad
        );
        assert!("xlsx".parse::<ExportDialect>().is_err());
    }

    #[test]
    fn retest_has_its_own_call_code() {
        let cell = Cell {
            needs_retest: true,
            ..Cell::with_value("S1")
        };
        let fields = ExportDialect::Biorad.fields(Coordinate::new(1, 0), "S1", &cell);
        assert_eq!(fields, vec!["B1", "S1", "RPT"]);
    }
}
