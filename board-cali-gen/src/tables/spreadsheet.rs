//! Spreadsheet table reader (XLSX, XLSM, XLSB, XLS, ODS)
//!
//! Uses `calamine`. The first row of the selected worksheet is the header.

use super::{Table, TableSource};
use crate::types::{CellValue, GeneratorError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// Spreadsheet reader using the `calamine` crate
pub struct SpreadsheetSource;

impl TableSource for SpreadsheetSource {
    fn read_table(path: &Path, sheet: Option<&str>) -> Result<Table> {
        log::info!("Reading spreadsheet: {:?}", path);

        if !path.exists() {
            return Err(GeneratorError::TableParseError(format!(
                "Spreadsheet not found: {:?}",
                path
            )));
        }

        let mut workbook = open_workbook_auto(path).map_err(|e| {
            GeneratorError::TableParseError(format!("Failed to open spreadsheet {:?}: {}", path, e))
        })?;

        let sheet_names = workbook.sheet_names();
        let sheet_name = match sheet {
            Some(name) if sheet_names.iter().any(|s| s == name) => name.to_string(),
            Some(name) => {
                return Err(GeneratorError::TableParseError(format!(
                    "Worksheet {:?} not found in {:?} (available: {})",
                    name,
                    path,
                    sheet_names.join(", ")
                )))
            }
            None => sheet_names.first().cloned().ok_or_else(|| {
                GeneratorError::TableParseError(format!("No worksheets in {:?}", path))
            })?,
        };
        log::debug!("Using worksheet {:?}", sheet_name);

        let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
            GeneratorError::TableParseError(format!(
                "Failed to read worksheet {:?} of {:?}: {}",
                sheet_name, path, e
            ))
        })?;

        // Rows are numbered as the spreadsheet shows them, even when the
        // used range does not start at A1.
        let first_row = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);

        let mut rows = range.rows();
        let columns: Vec<String> = match rows.next() {
            Some(header) => header.iter().map(|cell| cell.to_string().trim().to_string()).collect(),
            None => {
                return Err(GeneratorError::TableParseError(format!(
                    "Worksheet {:?} of {:?} is empty",
                    sheet_name, path
                )))
            }
        };

        let raw_rows = rows
            .enumerate()
            .map(|(index, cells)| (first_row + index + 1, cells.iter().map(cell_value).collect()))
            .collect();

        let table = Table::new(columns, raw_rows);
        log::info!(
            "Read {} rows from worksheet {:?} of {:?}",
            table.rows().len(),
            sheet_name,
            path
        );
        Ok(table)
    }
}

/// Convert a calamine cell into our cell type
fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Int(v) => CellValue::Int(*v as i128),
        Data::Float(v) => CellValue::Float(*v),
        Data::String(s) => CellValue::String(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Empty => CellValue::Empty,
        // Dates, durations and error cells (#DIV/0! etc.) keep their text
        other => CellValue::String(other.to_string()),
    }
}
