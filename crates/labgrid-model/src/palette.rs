//! Caller-supplied presentation of cell statuses.
//!
//! The set of statuses a deployment offers, and how each one is shown, is
//! configuration. The palette maps every recognized status to a display
//! hint; statuses missing from it cannot be staged on a well.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::CellStatus;
use crate::error::{ModelError, Result};

/// How a status should be presented to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayHint {
    pub label: String,
    /// CSS-style color (e.g. `#ff9800`).
    pub color: String,
}

impl DisplayHint {
    pub fn new(label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            color: color.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPalette {
    hints: BTreeMap<CellStatus, DisplayHint>,
}

impl StatusPalette {
    /// Build a palette from explicit hints. `Normal` is always recognized;
    /// a neutral hint is added for it when the caller leaves it out.
    pub fn new(hints: BTreeMap<CellStatus, DisplayHint>) -> Self {
        let mut hints = hints;
        hints
            .entry(CellStatus::Normal)
            .or_insert_with(|| DisplayHint::new("Sample", "#ffffff"));
        Self { hints }
    }

    /// Build a palette from string-keyed configuration entries.
    ///
    /// Returns the unknown key as the error message.
    pub fn from_config(
        entries: &BTreeMap<String, DisplayHint>,
    ) -> std::result::Result<Self, String> {
        let mut hints = BTreeMap::new();
        for (key, hint) in entries {
            let status: CellStatus = key.parse()?;
            hints.insert(status, hint.clone());
        }
        Ok(Self::new(hints))
    }

    pub fn hint(&self, status: CellStatus) -> Option<&DisplayHint> {
        self.hints.get(&status)
    }

    pub fn recognizes(&self, status: CellStatus) -> bool {
        self.hints.contains_key(&status)
    }

    /// Fail with [`ModelError::UnrecognizedStatus`] for unconfigured tags.
    pub fn ensure_recognized(&self, status: CellStatus) -> Result<()> {
        if self.recognizes(status) {
            Ok(())
        } else {
            Err(ModelError::UnrecognizedStatus(status))
        }
    }

    /// Special (taggable) statuses in presentation order.
    pub fn special_statuses(&self) -> impl Iterator<Item = (CellStatus, &DisplayHint)> {
        self.hints
            .iter()
            .filter(|(status, _)| status.is_special())
            .map(|(status, hint)| (*status, hint))
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellStatus, &DisplayHint)> {
        self.hints.iter().map(|(status, hint)| (*status, hint))
    }
}

impl Default for StatusPalette {
    fn default() -> Self {
        let hints = BTreeMap::from([
            (CellStatus::Normal, DisplayHint::new("Sample", "#ffffff")),
            (
                CellStatus::PositiveControl,
                DisplayHint::new("Positive control", "#ff9800"),
            ),
            (
                CellStatus::NegativeControl,
                DisplayHint::new("Negative control", "#4caf50"),
            ),
            (CellStatus::Blank, DisplayHint::new("Blank", "#9e9e9e")),
            (CellStatus::Invalid, DisplayHint::new("Invalid", "#212121")),
        ]);
        Self { hints }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_palette_recognizes_every_status() {
        let palette = StatusPalette::default();
        for status in CellStatus::ALL {
            assert!(palette.recognizes(status), "{status}");
        }
        assert_eq!(palette.special_statuses().count(), 4);
    }

    #[test]
    fn config_palette_limits_statuses() {
        let entries = BTreeMap::from([(
            "blank".to_string(),
            DisplayHint::new("Empty well", "#eeeeee"),
        )]);
        let palette = StatusPalette::from_config(&entries).expect("palette");
        assert!(palette.recognizes(CellStatus::Normal));
        assert!(palette.recognizes(CellStatus::Blank));
        assert_eq!(
            palette.ensure_recognized(CellStatus::Invalid),
            Err(ModelError::UnrecognizedStatus(CellStatus::Invalid))
        );
    }

    #[test]
    fn config_palette_rejects_unknown_keys() {
        let entries = BTreeMap::from([(
            "purple".to_string(),
            DisplayHint::new("Purple", "#800080"),
        )]);
        assert!(StatusPalette::from_config(&entries).is_err());
    }
}
