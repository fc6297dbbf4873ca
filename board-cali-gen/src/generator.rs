//! Main generator API
//!
//! [`Generator`] is the entry point: it owns a [`GeneratorConfig`] and runs
//! the load → render → patch pipeline. Each call recomputes everything from
//! the input table; nothing is cached between runs.

use crate::config::GeneratorConfig;
use crate::patcher::{FilePatcher, PatchOutcome};
use crate::records::records_from_table;
use crate::render::RecordRenderer;
use crate::tables::load_table;
use crate::types::{CalibrationRecord, Result};

/// Summary of a generator run
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    /// Number of records rendered
    pub records: usize,
    /// The generated initializer text
    pub fragment: String,
    /// What happened to the target file (`None` for dry runs)
    pub outcome: Option<PatchOutcome>,
}

/// The calibration table generator
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// Create a generator, validating the configuration
    ///
    /// # Example
    /// ```no_run
    /// use board_cali_gen::{Generator, GeneratorConfig};
    ///
    /// let config = GeneratorConfig::new()
    ///     .with_input("data.xlsx")
    ///     .with_target("Core/Src/analog_signal.c");
    /// let report = Generator::new(config).unwrap().run().unwrap();
    /// println!("{} boards written", report.records);
    /// ```
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Read the input table and convert it to records
    pub fn load_records(&self) -> Result<Vec<CalibrationRecord>> {
        log::info!("Loading calibration table: {:?}", self.config.input);
        let table = load_table(&self.config.input, self.config.sheet.as_deref())?;
        let records = records_from_table(&table)?;
        log::info!("Loaded {} calibration records", records.len());
        Ok(records)
    }

    /// Render records into the array initializer fragment
    pub fn render(&self, records: &[CalibrationRecord]) -> Result<String> {
        if records.is_empty() {
            log::warn!("No calibration records; generated array will be empty");
        }
        RecordRenderer::new(self.config.precision, self.config.layout).assemble(records)
    }

    /// Load and render without touching the target file
    pub fn dry_run(&self) -> Result<GenerationReport> {
        let records = self.load_records()?;
        let fragment = self.render(&records)?;
        Ok(GenerationReport {
            records: records.len(),
            fragment,
            outcome: None,
        })
    }

    /// Load, render and patch the target file
    pub fn run(&self) -> Result<GenerationReport> {
        // Build the patcher first so a bad marker setup fails before any I/O
        let patcher = FilePatcher::from_config(&self.config)?;

        let mut report = self.dry_run()?;
        log::info!("Generated array:\n{}", report.fragment);

        let outcome = patcher.patch_file(&self.config.target, &report.fragment)?;
        log::info!("{:?}: {}", self.config.target, outcome);
        report.outcome = Some(outcome);
        Ok(report)
    }
}
