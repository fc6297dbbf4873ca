//! CSV table reader
//!
//! Cells are type-inferred (integer, then float, then text) so a CSV export
//! of the calibration sheet behaves like the spreadsheet itself.

use super::{Table, TableSource};
use crate::types::{CellValue, GeneratorError, Result};
use std::path::Path;

/// CSV reader using the `csv` crate
pub struct CsvSource;

impl TableSource for CsvSource {
    fn read_table(path: &Path, _sheet: Option<&str>) -> Result<Table> {
        log::info!("Reading CSV table: {:?}", path);

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|e| {
                GeneratorError::TableParseError(format!("Failed to open CSV file {:?}: {}", path, e))
            })?;

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| {
                GeneratorError::TableParseError(format!("Failed to read CSV header {:?}: {}", path, e))
            })?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let mut raw_rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                GeneratorError::TableParseError(format!("Failed to read CSV record in {:?}: {}", path, e))
            })?;
            let number = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(index + 2);
            raw_rows.push((number, record.iter().map(CellValue::infer).collect()));
        }

        let table = Table::new(columns, raw_rows);
        log::info!("Read {} rows from {:?}", table.rows().len(), path);
        Ok(table)
    }
}
