//! `labgrid.toml` configuration.
//!
//! Every section is optional; missing values fall back to built-in defaults.
//!
//! ```toml
//! [sample_code]
//! pattern = "^[0-9]{6}$"
//!
//! [cipher]
//! memory_kib = 19456
//! iterations = 2
//! parallelism = 1
//!
//! [statuses.positive_control]
//! label = "Positive control"
//! color = "#ff9800"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use labgrid_cipher::{CipherParams, FieldCipher};
use labgrid_core::{NonEmptyCode, PatternCode, SampleCodeValidator};
use labgrid_model::{DisplayHint, StatusPalette};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabgridConfig {
    pub sample_code: SampleCodeConfig,
    pub cipher: CipherConfig,
    /// Status palette keyed by status name. Empty means every status with
    /// its default presentation.
    pub statuses: BTreeMap<String, DisplayHint>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleCodeConfig {
    /// Regular expression a sample code must match. Any non-blank code is
    /// accepted when unset.
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CipherConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for CipherConfig {
    fn default() -> Self {
        let params = CipherParams::default();
        Self {
            memory_kib: params.memory_kib,
            iterations: params.iterations,
            parallelism: params.parallelism,
        }
    }
}

impl LabgridConfig {
    /// Load from `path`, or return defaults when no path is given.
    ///
    /// An explicitly named file must exist and parse.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            tracing::debug!("no config file given, using defaults");
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("parse config {}", path.display()))?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn validator(&self) -> Result<Box<dyn SampleCodeValidator>> {
        match self.sample_code.pattern.as_deref() {
            Some(pattern) => {
                let validator = PatternCode::new(pattern)
                    .with_context(|| format!("invalid sample code pattern `{pattern}`"))?;
                Ok(Box::new(validator))
            }
            None => Ok(Box::new(NonEmptyCode)),
        }
    }

    pub fn palette(&self) -> Result<StatusPalette> {
        if self.statuses.is_empty() {
            return Ok(StatusPalette::default());
        }
        StatusPalette::from_config(&self.statuses).map_err(|e| anyhow!("[statuses]: {e}"))
    }

    pub fn cipher(&self) -> FieldCipher {
        FieldCipher::new(CipherParams {
            memory_kib: self.cipher.memory_kib,
            iterations: self.cipher.iterations,
            parallelism: self.cipher.parallelism,
        })
    }
}

#[cfg(test)]
mod tests {
    use labgrid_model::CellStatus;

    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = LabgridConfig::from_toml("").unwrap();
        assert_eq!(config, LabgridConfig::default());
        assert_eq!(config.cipher().params(), CipherParams::default());
        assert_eq!(config.palette().unwrap(), StatusPalette::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = LabgridConfig::from_toml(
            r##"
            [sample_code]
            pattern = "^[0-9]{6}$"

            [cipher]
            iterations = 3

            [statuses.blank]
            label = "Empty well"
            color = "#cccccc"
            "##,
        )
        .unwrap();

        assert_eq!(config.cipher.iterations, 3);
        assert_eq!(config.cipher.memory_kib, CipherConfig::default().memory_kib);

        let validator = config.validator().unwrap();
        assert!(validator.is_valid("100001"));
        assert!(!validator.is_valid("S1"));

        let palette = config.palette().unwrap();
        assert!(palette.recognizes(CellStatus::Blank));
        assert!(palette.recognizes(CellStatus::Normal));
        assert!(!palette.recognizes(CellStatus::Invalid));
    }

    #[test]
    fn unknown_status_is_an_error() {
        let config = LabgridConfig::from_toml(
            r##"
            [statuses.spilled]
            label = "Spilled"
            color = "#000000"
            "##,
        )
        .unwrap();
        assert!(config.palette().is_err());
    }

    #[test]
    fn bad_pattern_is_an_error() {
        let config = LabgridConfig::from_toml("[sample_code]\npattern = \"(\"\n").unwrap();
        assert!(config.validator().is_err());
    }
}
