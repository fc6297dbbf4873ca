//! Board ADC Calibration Generator Library
//!
//! Generates the `board_adc_calibration_t` initializer embedded in the power
//! board firmware from a calibration spreadsheet, and splices it into the C
//! source between two marker comments.
//!
//! # Pipeline
//!
//! - Read the calibration table (XLSX/XLS/ODS or CSV), one row per board
//! - Resolve each board's 96-bit STM32 unique ID into three 32-bit words
//! - Format the five (k, b) linear-fit pairs as `float` literals
//! - Join the records into one initializer fragment
//! - Replace the marker region of the target file with the fragment
//!
//! The library does NOT:
//! - Merge with or diff against the existing table contents
//! - Patch more than one file or more than one region per run
//! - Keep a backup of the target file
//!
//! Command-line handling lives in the application layer (board-cali-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use board_cali_gen::{Generator, GeneratorConfig, MissingMarkerPolicy, RecordLayout};
//!
//! let config = GeneratorConfig::new()
//!     .with_input("calibration/data.xlsx")
//!     .with_target("User/Src/analog_signal.c")
//!     .with_layout(RecordLayout::Multiline)
//!     .with_missing_marker_policy(MissingMarkerPolicy::Error);
//!
//! let generator = Generator::new(config).unwrap();
//! let report = generator.run().unwrap();
//! println!("{} records, target {:?}", report.records, report.outcome);
//! ```

// Public modules
pub mod config;
pub mod generator;
pub mod identifier;
pub mod patcher;
pub mod records;
pub mod render;
pub mod tables;
pub mod types;

// Re-export main types for convenience
pub use config::{GeneratorConfig, MissingMarkerPolicy, RecordLayout};
pub use generator::{GenerationReport, Generator};
pub use identifier::{parse_identifier, split_identifier};
pub use patcher::{FilePatcher, PatchOutcome};
pub use render::{format_field, RecordRenderer};
pub use types::{
    CalibrationPair, CalibrationRecord, CellValue, Channel, DeviceId, GeneratorError,
    IdentifierValue, Result,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
