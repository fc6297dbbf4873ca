//! Marker region patching
//!
//! The target C file carries two sentinel comment lines. Everything from the
//! whitespace before the start marker up to the stop marker is replaced with
//! a freshly generated block; the rest of the file is left byte-for-byte
//! intact. Only the first region in the file is touched.

use crate::config::{GeneratorConfig, MissingMarkerPolicy};
use crate::types::{GeneratorError, Result};
use regex::Regex;
use std::fmt;
use std::fs;
use std::path::Path;

/// What happened to the target file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// Region replaced and the file rewritten
    Patched,
    /// Region already held the generated text; file not rewritten
    Unchanged,
    /// No marker region found; file left as is
    MarkersMissing,
}

impl fmt::Display for PatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchOutcome::Patched => write!(f, "patched"),
            PatchOutcome::Unchanged => write!(f, "already up to date"),
            PatchOutcome::MarkersMissing => write!(f, "markers not found, left unchanged"),
        }
    }
}

/// Splices generated text between a pair of marker lines
#[derive(Debug, Clone)]
pub struct FilePatcher {
    start_tag: String,
    stop_tag: String,
    indent: String,
    policy: MissingMarkerPolicy,
    region: Regex,
}

impl FilePatcher {
    /// Create a patcher for the given marker lines
    pub fn new(start_tag: &str, stop_tag: &str, indent: &str, policy: MissingMarkerPolicy) -> Result<Self> {
        let pattern = format!(
            r"(?s)\s*{}.*?\n\s*{}",
            regex::escape(start_tag),
            regex::escape(stop_tag)
        );
        let region = Regex::new(&pattern).map_err(|e| {
            GeneratorError::InvalidConfig(format!("cannot build marker pattern: {}", e))
        })?;

        Ok(Self {
            start_tag: start_tag.to_string(),
            stop_tag: stop_tag.to_string(),
            indent: indent.to_string(),
            policy,
            region,
        })
    }

    /// Create a patcher from the generator settings
    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        Self::new(
            &config.start_tag,
            &config.stop_tag,
            &config.indent,
            config.on_missing_markers,
        )
    }

    /// Replace the first marker region in `content`.
    ///
    /// Returns `None` when no complete region exists.
    pub fn splice(&self, content: &str, fragment: &str) -> Option<String> {
        let found = self.region.find(content)?;

        // Keep CRLF files consistently CRLF
        let newline = if content.contains("\r\n") { "\r\n" } else { "\n" };
        let fragment = if newline == "\n" {
            fragment.to_string()
        } else {
            fragment.replace('\n', newline)
        };

        let mut patched = String::with_capacity(content.len() + fragment.len());
        patched.push_str(&content[..found.start()]);
        for text in [self.start_tag.as_str(), fragment.as_str(), self.stop_tag.as_str()] {
            patched.push_str(newline);
            patched.push_str(&self.indent);
            patched.push_str(text);
        }
        patched.push_str(&content[found.end()..]);
        Some(patched)
    }

    /// Patch `path` in place with `fragment`
    pub fn patch_file(&self, path: &Path, fragment: &str) -> Result<PatchOutcome> {
        log::info!("Patching marker region in {:?}", path);

        let content = fs::read_to_string(path)?;

        let patched = match self.splice(&content, fragment) {
            Some(patched) => patched,
            None => {
                return match self.policy {
                    MissingMarkerPolicy::Error => Err(GeneratorError::MarkerNotFound(format!(
                        "{:?} (expected {:?} ... {:?})",
                        path, self.start_tag, self.stop_tag
                    ))),
                    MissingMarkerPolicy::Ignore => {
                        log::warn!("No marker region in {:?}; file left unchanged", path);
                        Ok(PatchOutcome::MarkersMissing)
                    }
                };
            }
        };

        if patched == content {
            log::info!("{:?} already up to date", path);
            return Ok(PatchOutcome::Unchanged);
        }

        fs::write(path, patched)?;
        log::info!("Wrote {:?}", path);
        Ok(PatchOutcome::Patched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_START_TAG, DEFAULT_STOP_TAG};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SOURCE: &str = "\
#include \"analog_signal.h\"

static board_adc_calibration_t adc_cali_array[] = {
    // board_adc_calibration insert start
    {
        {0x00000000, 0x00000000, 0x00000222},
        {0.0005554504f, 0},
    },
    // board_adc_calibration insert stop
};

float get_voltage_motor();
";

    fn patcher(policy: MissingMarkerPolicy) -> FilePatcher {
        FilePatcher::new(DEFAULT_START_TAG, DEFAULT_STOP_TAG, "\t", policy).unwrap()
    }

    #[test]
    fn test_splice_replaces_stale_content() {
        let patched = patcher(MissingMarkerPolicy::Error)
            .splice(SOURCE, "{ NEW }")
            .unwrap();

        let expected = "\
#include \"analog_signal.h\"

static board_adc_calibration_t adc_cali_array[] = {
\t// board_adc_calibration insert start
\t{ NEW }
\t// board_adc_calibration insert stop
};

float get_voltage_motor();
";
        assert_eq!(patched, expected);
    }

    #[test]
    fn test_outside_content_preserved() {
        let patched = patcher(MissingMarkerPolicy::Error)
            .splice(SOURCE, "{ A },\n{ B }")
            .unwrap();

        let prefix = "static board_adc_calibration_t adc_cali_array[] = {";
        let head_end = SOURCE.find(prefix).unwrap() + prefix.len();
        assert_eq!(&patched[..head_end], &SOURCE[..head_end]);

        let tail = "\n};\n\nfloat get_voltage_motor();\n";
        assert!(patched.ends_with(tail));
        assert!(!patched.contains("0x00000222"));
        assert!(patched.contains("\t{ A },\n{ B }\n"));
    }

    #[test]
    fn test_splice_is_stable() {
        let p = patcher(MissingMarkerPolicy::Error);
        let once = p.splice(SOURCE, "{ X }").unwrap();
        let twice = p.splice(&once, "{ X }").unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_adjacent_markers() {
        let content = "a\n// board_adc_calibration insert start\n// board_adc_calibration insert stop\nb\n";
        let patched = patcher(MissingMarkerPolicy::Error).splice(content, "{ X }").unwrap();
        assert_eq!(
            patched,
            "a\n\t// board_adc_calibration insert start\n\t{ X }\n\t// board_adc_calibration insert stop\nb\n"
        );
    }

    #[test]
    fn test_only_first_region_replaced() {
        let region = "\n// board_adc_calibration insert start\nold\n// board_adc_calibration insert stop\n";
        let content = format!("first{}second{}", region, region);
        let patched = patcher(MissingMarkerPolicy::Error).splice(&content, "new").unwrap();
        assert_eq!(patched.matches("new").count(), 1);
        assert_eq!(patched.matches("old").count(), 1);
    }

    #[test]
    fn test_fragment_inserted_literally() {
        let patched = patcher(MissingMarkerPolicy::Error)
            .splice(SOURCE, "{ $1 ${0} }")
            .unwrap();
        assert!(patched.contains("\t{ $1 ${0} }\n"));
    }

    #[test]
    fn test_crlf_preserved() {
        let content = "x\r\n  // board_adc_calibration insert start\r\nold\r\n  // board_adc_calibration insert stop\r\ny\r\n";
        let patched = patcher(MissingMarkerPolicy::Error).splice(content, "{ A },\n{ B }").unwrap();
        assert_eq!(
            patched,
            "x\r\n\t// board_adc_calibration insert start\r\n\t{ A },\r\n{ B }\r\n\t// board_adc_calibration insert stop\r\ny\r\n"
        );
    }

    #[test]
    fn test_missing_markers_not_spliced() {
        let p = patcher(MissingMarkerPolicy::Error);
        assert!(p.splice("no markers here", "x").is_none());
        assert!(p.splice("// board_adc_calibration insert start\nonly start\n", "x").is_none());
        assert!(p
            .splice("// board_adc_calibration insert stop\n// board_adc_calibration insert start\n", "x")
            .is_none());
    }

    #[test]
    fn test_patch_file_missing_markers_is_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"int main(void) { return 0; }\n").unwrap();
        temp_file.flush().unwrap();

        let result = patcher(MissingMarkerPolicy::Error).patch_file(temp_file.path(), "{ X }");
        assert!(matches!(result, Err(GeneratorError::MarkerNotFound(_))));
        let after = fs::read_to_string(temp_file.path()).unwrap();
        assert_eq!(after, "int main(void) { return 0; }\n");
    }

    #[test]
    fn test_patch_file_missing_markers_ignored() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"// board_adc_calibration insert start\n").unwrap();
        temp_file.flush().unwrap();

        let outcome = patcher(MissingMarkerPolicy::Ignore)
            .patch_file(temp_file.path(), "{ X }")
            .unwrap();
        assert_eq!(outcome, PatchOutcome::MarkersMissing);
        let after = fs::read_to_string(temp_file.path()).unwrap();
        assert_eq!(after, "// board_adc_calibration insert start\n");
    }

    #[test]
    fn test_patch_file_writes_then_reports_unchanged() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(SOURCE.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let p = patcher(MissingMarkerPolicy::Error);
        assert_eq!(p.patch_file(temp_file.path(), "{ X }").unwrap(), PatchOutcome::Patched);
        assert_eq!(p.patch_file(temp_file.path(), "{ X }").unwrap(), PatchOutcome::Unchanged);
        assert!(fs::read_to_string(temp_file.path()).unwrap().contains("\t{ X }\n"));
    }
}
