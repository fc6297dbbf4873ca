//! Configuration loading and parsing
//!
//! An optional `board-cali.toml` lets a firmware repo pin its paths and
//! formatting once instead of repeating them on every invocation. Every key
//! is optional and falls back to the library default.

use anyhow::{Context, Result};
use board_cali_gen::{GeneratorConfig, MissingMarkerPolicy, RecordLayout};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from a TOML file)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub format: FormatConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InputConfig {
    pub file: Option<PathBuf>,
    pub sheet: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    pub file: Option<PathBuf>,
    pub start_tag: Option<String>,
    pub stop_tag: Option<String>,
    pub indent: Option<String>,
    pub on_missing_markers: Option<MissingMarkerPolicy>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FormatConfig {
    pub precision: Option<usize>,
    pub layout: Option<RecordLayout>,
}

impl AppConfig {
    /// Resolve into a generator configuration, relative paths taken from
    /// `base_dir` (the directory holding the config file).
    pub fn into_generator_config(self, base_dir: &Path) -> GeneratorConfig {
        let defaults = GeneratorConfig::default();
        let resolve = |path: PathBuf| {
            if path.is_relative() {
                base_dir.join(path)
            } else {
                path
            }
        };

        GeneratorConfig {
            input: self.input.file.map(resolve).unwrap_or(defaults.input),
            sheet: self.input.sheet.or(defaults.sheet),
            target: self.output.file.map(resolve).unwrap_or(defaults.target),
            start_tag: self.output.start_tag.unwrap_or(defaults.start_tag),
            stop_tag: self.output.stop_tag.unwrap_or(defaults.stop_tag),
            indent: self.output.indent.unwrap_or(defaults.indent),
            precision: self.format.precision.unwrap_or(defaults.precision),
            layout: self.format.layout.unwrap_or(defaults.layout),
            on_missing_markers: self
                .output
                .on_missing_markers
                .unwrap_or(defaults.on_missing_markers),
        }
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [input]
            file = "calibration/data.xlsx"
            sheet = "Boards"

            [output]
            file = "/fw/User/Src/analog_signal.c"
            on_missing_markers = "ignore"

            [format]
            precision = 8
            layout = "multiline"
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        let generator_config = config.into_generator_config(Path::new("/repo"));

        assert_eq!(generator_config.input, PathBuf::from("/repo/calibration/data.xlsx"));
        assert_eq!(generator_config.sheet.as_deref(), Some("Boards"));
        assert_eq!(generator_config.target, PathBuf::from("/fw/User/Src/analog_signal.c"));
        assert_eq!(generator_config.on_missing_markers, MissingMarkerPolicy::Ignore);
        assert_eq!(generator_config.precision, 8);
        assert_eq!(generator_config.layout, RecordLayout::Multiline);
        assert_eq!(generator_config.start_tag, GeneratorConfig::default().start_tag);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        let generator_config = config.into_generator_config(Path::new(""));
        assert_eq!(generator_config, GeneratorConfig::default());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let result: std::result::Result<AppConfig, _> = toml::from_str("[format]\nprecison = 3\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[output]\nindent = \"    \"").unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.output.indent.as_deref(), Some("    "));
        assert!(load_config(Path::new("/nonexistent/board-cali.toml")).is_err());
    }
}
