//! Table rows → calibration records
//!
//! Validates the schema once, then converts each row: the identifier cell
//! goes through [`parse_identifier`], the ten coefficient cells are coerced to
//! `f64`. The first bad row aborts the whole conversion.

use crate::identifier::parse_identifier;
use crate::tables::{Row, Table};
use crate::types::{
    required_columns, CalibrationPair, CalibrationRecord, CellValue, Channel, DeviceId,
    GeneratorError, IdentifierValue, Result, ID_COLUMN,
};
use std::collections::HashMap;

/// Convert every row of `table` into a [`CalibrationRecord`], preserving order
pub fn records_from_table(table: &Table) -> Result<Vec<CalibrationRecord>> {
    table.require_columns(&required_columns())?;

    let mut records = Vec::with_capacity(table.rows().len());
    let mut first_seen: HashMap<DeviceId, usize> = HashMap::new();

    for row in table.rows() {
        let record = record_from_row(row)?;
        log::debug!("Row {}: device {}", record.row, record.id);

        if let Some(previous) = first_seen.get(&record.id) {
            log::warn!(
                "Device {} appears in rows {} and {}; the firmware will match the first entry",
                record.id,
                previous,
                record.row
            );
        } else {
            first_seen.insert(record.id, record.row);
        }

        records.push(record);
    }

    Ok(records)
}

/// Convert a single row
pub fn record_from_row(row: &Row) -> Result<CalibrationRecord> {
    let id_cell = row.get(ID_COLUMN).unwrap_or(&CellValue::Empty);
    let id = parse_identifier(&IdentifierValue::from(id_cell)).map_err(|e| match e {
        GeneratorError::InvalidIdentifier(msg) => {
            GeneratorError::InvalidIdentifier(format!("row {}, column {}: {}", row.number, ID_COLUMN, msg))
        }
        GeneratorError::IdentifierOverflow(msg) => {
            GeneratorError::IdentifierOverflow(format!("row {}, column {}: {}", row.number, ID_COLUMN, msg))
        }
        other => other,
    })?;

    let mut pairs = [CalibrationPair::default(); 5];
    for channel in Channel::ALL {
        pairs[channel.index()] = CalibrationPair::new(
            numeric_field(row, channel.scale_column())?,
            numeric_field(row, channel.offset_column())?,
        );
    }

    Ok(CalibrationRecord {
        row: row.number,
        id,
        pairs,
    })
}

/// Coerce a coefficient cell to `f64`
fn numeric_field(row: &Row, column: &str) -> Result<f64> {
    match row.get(column) {
        Some(CellValue::Int(v)) => Ok(*v as f64),
        Some(CellValue::Float(v)) => Ok(*v),
        Some(CellValue::String(s)) => s.trim().parse::<f64>().map_err(|_| {
            GeneratorError::InvalidField(format!(
                "row {}, column {}: {:?} is not a number",
                row.number, column, s
            ))
        }),
        Some(other) => Err(GeneratorError::InvalidField(format!(
            "row {}, column {}: expected a number, got {}",
            row.number,
            column,
            other.kind()
        ))),
        None => Err(GeneratorError::SchemaError(column.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calibration_table(rows: Vec<Vec<CellValue>>) -> Table {
        let columns = required_columns().into_iter().map(String::from).collect();
        let raw_rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, cells)| (i + 2, cells))
            .collect();
        Table::new(columns, raw_rows)
    }

    fn row_with_id(id: CellValue) -> Vec<CellValue> {
        let mut cells = vec![id];
        for i in 0..10 {
            cells.push(CellValue::Float(i as f64 * 0.5));
        }
        cells
    }

    #[test]
    fn test_records_preserve_order_and_pairs() {
        let table = calibration_table(vec![
            row_with_id(CellValue::String("0x222".to_string())),
            row_with_id(CellValue::Float(273.0)),
            row_with_id(CellValue::Int(1)),
        ]);

        let records = records_from_table(&table).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].id.value(), 0x222);
        assert_eq!(records[1].id.value(), 273);
        assert_eq!(records[2].id.value(), 1);
        assert_eq!(records[2].row, 4);

        let pair = records[0].pair(Channel::MotorCurrent);
        assert_eq!(pair, CalibrationPair::new(2.0, 2.5));
        let pair = records[0].pair(Channel::CapacitorCurrent);
        assert_eq!(pair, CalibrationPair::new(4.0, 4.5));
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let columns = required_columns()
            .into_iter()
            .filter(|c| *c != "i_motor_b")
            .map(String::from)
            .collect();
        let table = Table::new(columns, vec![]);
        match records_from_table(&table) {
            Err(GeneratorError::SchemaError(msg)) => assert!(msg.contains("i_motor_b")),
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_identifier_names_row() {
        let table = calibration_table(vec![
            row_with_id(CellValue::Int(5)),
            row_with_id(CellValue::Float(12.5)),
        ]);
        match records_from_table(&table) {
            Err(GeneratorError::InvalidIdentifier(msg)) => {
                assert!(msg.starts_with("row 3, column stm32id"))
            }
            other => panic!("expected identifier error, got {:?}", other),
        }
    }

    #[test]
    fn test_numeric_coercion() {
        let mut cells = row_with_id(CellValue::Int(9));
        cells[1] = CellValue::String(" 0.125 ".to_string());
        cells[2] = CellValue::Int(-3);
        let table = calibration_table(vec![cells]);
        let records = records_from_table(&table).unwrap();
        assert_eq!(
            records[0].pair(Channel::ChassisVoltage),
            CalibrationPair::new(0.125, -3.0)
        );
    }

    #[test]
    fn test_non_numeric_field_rejected() {
        for bad in [
            CellValue::Empty,
            CellValue::Bool(true),
            CellValue::String("#DIV/0!".to_string()),
        ] {
            let mut cells = row_with_id(CellValue::Int(9));
            cells[1] = CellValue::Int(1);
            cells[4] = bad.clone();
            let table = calibration_table(vec![cells]);
            assert!(
                matches!(records_from_table(&table), Err(GeneratorError::InvalidField(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_duplicate_ids_are_kept() {
        let table = calibration_table(vec![
            row_with_id(CellValue::String("0x10".to_string())),
            row_with_id(CellValue::Int(16)),
        ]);
        let records = records_from_table(&table).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, records[1].id);
    }
}
