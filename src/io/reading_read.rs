use std::path::Path;

use calamine::{DataType, Range, Reader, Xlsx, open_workbook};
use tracing::debug;

use crate::error::{ReportError, Result};
use crate::model::MeterReading;

/// Zero-based row of the first reading (row 10 in the workbook).
pub const FIRST_READING_ROW: u32 = 9;
/// Zero-based row after which scanning stops (row 100 in the workbook).
pub const LAST_READING_ROW: u32 = 99;

const OLD_ID_COLUMN: u32 = 1;
const NEW_ID_COLUMN: u32 = 2;
const STATUS_COLUMN: u32 = 3;
const READING_COLUMN: u32 = 6;

/// Reads prior meter readings from the first sheet of a workbook.
///
/// Column B holds the old id, C the new id, D the status and G the kWh read
/// off the meter. Scanning stops at the first row where both ids are blank.
pub fn read_meter_readings(path: &Path) -> Result<Vec<MeterReading>> {
    let load_error = |reason: String| ReportError::ReadingTableLoadFailed {
        path: path.to_path_buf(),
        reason,
    };

    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|err| load_error(format!("{err}")))?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| load_error("workbook has no sheets".to_string()))?;
    let range = workbook
        .worksheet_range(&sheet)
        .ok_or_else(|| load_error(format!("missing sheet '{sheet}'")))?
        .map_err(|err| load_error(format!("{err}")))?;

    let readings = collect_readings(&range);
    debug!(sheet = %sheet, rows = readings.len(), "meter readings loaded");
    Ok(readings)
}

fn collect_readings(range: &Range<DataType>) -> Vec<MeterReading> {
    let mut readings = Vec::new();

    for row in FIRST_READING_ROW..=LAST_READING_ROW {
        let old_id = cell_to_string(range.get_value((row, OLD_ID_COLUMN)));
        let new_id = cell_to_string(range.get_value((row, NEW_ID_COLUMN)));
        if old_id.is_empty() && new_id.is_empty() {
            break;
        }
        readings.push(MeterReading {
            old_id,
            new_id,
            status: cell_to_string(range.get_value((row, STATUS_COLUMN))),
            reading: cell_to_number(range.get_value((row, READING_COLUMN))),
        });
    }

    readings
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    let value = match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    };
    value.trim().to_string()
}

fn cell_to_number(cell: Option<&DataType>) -> Option<f64> {
    match cell? {
        DataType::Float(value) => Some(*value),
        DataType::Int(value) => Some(*value as f64),
        DataType::String(value) => value.trim().replace(',', ".").parse().ok(),
        _ => None,
    }
}
