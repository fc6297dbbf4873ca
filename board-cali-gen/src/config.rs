//! Generator configuration types
//!
//! Everything the pipeline needs to know is passed in through
//! [`GeneratorConfig`]; there is no global state. The defaults reproduce the
//! fixed-path behavior of the original build step (`data.xlsx` → `abc.c`).

use crate::types::{GeneratorError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Marker line that opens the generated region
pub const DEFAULT_START_TAG: &str = "// board_adc_calibration insert start";

/// Marker line that closes the generated region
pub const DEFAULT_STOP_TAG: &str = "// board_adc_calibration insert stop";

/// Fractional digits emitted for every calibration coefficient
pub const DEFAULT_PRECISION: usize = 10;

/// Configuration for the calibration table generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Spreadsheet or CSV file with one row per board
    #[serde(default = "default_input")]
    pub input: PathBuf,

    /// Worksheet to read (first sheet when unset; ignored for CSV)
    #[serde(default)]
    pub sheet: Option<String>,

    /// C source file containing the marker region
    #[serde(default = "default_target")]
    pub target: PathBuf,

    /// Start marker line
    #[serde(default = "default_start_tag")]
    pub start_tag: String,

    /// Stop marker line
    #[serde(default = "default_stop_tag")]
    pub stop_tag: String,

    /// Indentation placed before the markers and the first generated line
    #[serde(default = "default_indent")]
    pub indent: String,

    /// Fractional digits for calibration coefficients
    #[serde(default = "default_precision")]
    pub precision: usize,

    /// Shape of each rendered record
    #[serde(default)]
    pub layout: RecordLayout,

    /// What to do when the target lacks the marker region
    #[serde(default)]
    pub on_missing_markers: MissingMarkerPolicy,
}

fn default_input() -> PathBuf {
    PathBuf::from("data.xlsx")
}

fn default_target() -> PathBuf {
    PathBuf::from("abc.c")
}

fn default_start_tag() -> String {
    DEFAULT_START_TAG.to_string()
}

fn default_stop_tag() -> String {
    DEFAULT_STOP_TAG.to_string()
}

fn default_indent() -> String {
    "\t".to_string()
}

fn default_precision() -> usize {
    DEFAULT_PRECISION
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            sheet: None,
            target: default_target(),
            start_tag: default_start_tag(),
            stop_tag: default_stop_tag(),
            indent: default_indent(),
            precision: default_precision(),
            layout: RecordLayout::default(),
            on_missing_markers: MissingMarkerPolicy::default(),
        }
    }
}

/// How a record literal is laid out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordLayout {
    /// Whole record on one line
    #[default]
    Compact,
    /// One group per line, as the firmware source is hand-formatted
    Multiline,
}

/// Behavior when the marker region cannot be found in the target file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingMarkerPolicy {
    /// Abort with `GeneratorError::MarkerNotFound`
    #[default]
    Error,
    /// Leave the file untouched and report it in the outcome
    Ignore,
}

impl GeneratorConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the input table
    pub fn with_input(mut self, path: impl Into<PathBuf>) -> Self {
        self.input = path.into();
        self
    }

    /// Builder method: select a worksheet by name
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    /// Builder method: set the file to patch
    pub fn with_target(mut self, path: impl Into<PathBuf>) -> Self {
        self.target = path.into();
        self
    }

    /// Builder method: override both marker lines
    pub fn with_markers(mut self, start_tag: impl Into<String>, stop_tag: impl Into<String>) -> Self {
        self.start_tag = start_tag.into();
        self.stop_tag = stop_tag.into();
        self
    }

    /// Builder method: set the indentation string
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Builder method: set coefficient precision
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Builder method: set record layout
    pub fn with_layout(mut self, layout: RecordLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Builder method: set missing-marker policy
    pub fn with_missing_marker_policy(mut self, policy: MissingMarkerPolicy) -> Self {
        self.on_missing_markers = policy;
        self
    }

    /// Check the settings that cannot be expressed in the types
    pub fn validate(&self) -> Result<()> {
        if self.start_tag.trim().is_empty() || self.stop_tag.trim().is_empty() {
            return Err(GeneratorError::InvalidConfig(
                "marker tags must not be empty".to_string(),
            ));
        }
        if self.start_tag == self.stop_tag {
            return Err(GeneratorError::InvalidConfig(format!(
                "start and stop tags are identical: {:?}",
                self.start_tag
            )));
        }
        if self.start_tag.contains('\n') || self.stop_tag.contains('\n') {
            return Err(GeneratorError::InvalidConfig(
                "marker tags must be single lines".to_string(),
            ));
        }
        if !self.indent.chars().all(|c| c == ' ' || c == '\t') {
            return Err(GeneratorError::InvalidConfig(format!(
                "indent may only contain spaces and tabs: {:?}",
                self.indent
            )));
        }
        // f64 carries ~17 significant digits; beyond this the digits are noise
        if self.precision > 20 {
            return Err(GeneratorError::InvalidConfig(format!(
                "precision {} exceeds the maximum of 20",
                self.precision
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fixed_paths() {
        let config = GeneratorConfig::new();
        assert_eq!(config.input, PathBuf::from("data.xlsx"));
        assert_eq!(config.target, PathBuf::from("abc.c"));
        assert_eq!(config.precision, 10);
        assert_eq!(config.indent, "\t");
        assert_eq!(config.start_tag, DEFAULT_START_TAG);
        assert_eq!(config.stop_tag, DEFAULT_STOP_TAG);
        assert_eq!(config.layout, RecordLayout::Compact);
        assert_eq!(config.on_missing_markers, MissingMarkerPolicy::Error);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = GeneratorConfig::new()
            .with_input("boards.csv")
            .with_sheet("Calibration")
            .with_target("Core/Src/analog_signal.c")
            .with_precision(6)
            .with_layout(RecordLayout::Multiline)
            .with_missing_marker_policy(MissingMarkerPolicy::Ignore);

        assert_eq!(config.input, PathBuf::from("boards.csv"));
        assert_eq!(config.sheet.as_deref(), Some("Calibration"));
        assert_eq!(config.target, PathBuf::from("Core/Src/analog_signal.c"));
        assert_eq!(config.precision, 6);
        assert_eq!(config.layout, RecordLayout::Multiline);
        assert_eq!(config.on_missing_markers, MissingMarkerPolicy::Ignore);
    }

    #[test]
    fn test_validate_rejects_bad_markers() {
        let empty = GeneratorConfig::new().with_markers("", "// stop");
        assert!(matches!(empty.validate(), Err(GeneratorError::InvalidConfig(_))));

        let same = GeneratorConfig::new().with_markers("// here", "// here");
        assert!(matches!(same.validate(), Err(GeneratorError::InvalidConfig(_))));

        let indent = GeneratorConfig::new().with_indent("x");
        assert!(matches!(indent.validate(), Err(GeneratorError::InvalidConfig(_))));
    }
}
