//! Input table readers (XLSX/XLS/ODS, CSV)
//!
//! Each reader turns a file into a [`Table`]: a header row plus data rows
//! whose cells are looked up by column name. Row order is preserved.

use crate::types::{CellValue, GeneratorError, Result};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;

pub mod delimited;
pub mod spreadsheet;

pub use delimited::CsvSource;
pub use spreadsheet::SpreadsheetSource;

/// Common trait for all table readers
pub trait TableSource {
    /// Read the whole table at `path`; `sheet` selects a worksheet where the
    /// format has more than one.
    fn read_table(path: &Path, sheet: Option<&str>) -> Result<Table>;
}

/// Load a table, choosing the reader from the file extension
pub fn load_table(path: &Path, sheet: Option<&str>) -> Result<Table> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());

    match extension.as_deref() {
        Some("xlsx") | Some("xlsm") | Some("xlsb") | Some("xls") | Some("ods") => {
            log::debug!("Detected spreadsheet format");
            SpreadsheetSource::read_table(path, sheet)
        }
        Some("csv") => {
            log::debug!("Detected CSV format");
            if sheet.is_some() {
                log::warn!("Sheet selection ignored for CSV input {:?}", path);
            }
            CsvSource::read_table(path, sheet)
        }
        _ => Err(GeneratorError::TableParseError(format!(
            "Unsupported file format: {:?}",
            extension
        ))),
    }
}

/// One data row
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// 1-based row number in the source file (the header is row 1)
    pub number: usize,
    cells: HashMap<String, CellValue>,
}

impl Row {
    /// Cell value for a column, if the column exists
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }
}

/// A header row plus ordered data rows
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Build a table from a header and `(row number, cells)` pairs.
    ///
    /// Blank rows are dropped. Short rows are padded with empty cells; cells
    /// past the last header column are ignored.
    pub fn new(columns: Vec<String>, raw_rows: Vec<(usize, Vec<CellValue>)>) -> Self {
        // With duplicate header names the first column wins
        let mut positions: HashMap<&str, usize> = HashMap::new();
        for (index, name) in columns.iter().enumerate() {
            match positions.entry(name.as_str()) {
                Entry::Occupied(first) => log::warn!(
                    "Duplicate column {:?} (positions {} and {}), using the first one",
                    name,
                    first.get() + 1,
                    index + 1
                ),
                Entry::Vacant(slot) => {
                    slot.insert(index);
                }
            }
        }

        let mut rows = Vec::with_capacity(raw_rows.len());
        for (number, values) in raw_rows {
            if values.iter().all(CellValue::is_empty) {
                log::debug!("Skipping blank row {}", number);
                continue;
            }

            let mut cells = HashMap::with_capacity(positions.len());
            for (name, &index) in &positions {
                let value = values.get(index).cloned().unwrap_or(CellValue::Empty);
                log::trace!("row {} {} = {}", number, name, value);
                cells.insert(name.to_string(), value);
            }
            rows.push(Row { number, cells });
        }

        Self { columns, rows }
    }

    /// Header names in file order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Data rows in file order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Fail with `SchemaError` naming the first required column that is absent
    pub fn require_columns(&self, required: &[&str]) -> Result<()> {
        for column in required {
            if !self.columns.iter().any(|c| c == column) {
                return Err(GeneratorError::SchemaError(format!(
                    "{} (found: {})",
                    column,
                    self.columns.join(", ")
                )));
            }
        }
        Ok(())
    }
}
