use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{ReportError, Result};
use crate::io::export_read::{semicolon_reader, split_lines};
use crate::model::{DisplayOrder, IdentifierMapping};

/// Lines of header and metadata above the first numbering pair.
pub const MAPPING_PREAMBLE_LINES: usize = 9;

/// Loads the old/new numbering table.
///
/// Only the first two columns (old id, new id) of lines 10 onwards are read;
/// pairs with a blank side are skipped.
pub fn read_identifier_mapping(path: &Path) -> Result<IdentifierMapping> {
    let text = fs::read_to_string(path).map_err(|err| mapping_error(path, err.to_string()))?;
    parse_identifier_mapping(&text).map_err(|err| mapping_error(path, err.to_string()))
}

pub fn parse_identifier_mapping(text: &str) -> Result<IdentifierMapping> {
    let (_, body) = split_lines(text, MAPPING_PREAMBLE_LINES);
    let mut mapping = IdentifierMapping::new();

    for result in semicolon_reader(body).records() {
        let record = result?;
        let old_id = record.get(0).unwrap_or("").trim();
        let new_id = record.get(1).unwrap_or("").trim();
        if old_id.is_empty() || new_id.is_empty() {
            continue;
        }
        mapping.insert(new_id, old_id);
    }

    debug!(pairs = mapping.len(), "numbering table parsed");
    Ok(mapping)
}

fn mapping_error(path: &Path, reason: String) -> ReportError {
    ReportError::MappingLoadFailed {
        path: path.to_path_buf(),
        reason,
    }
}

/// Loads the display order, one unit number per line.
pub fn read_display_order(path: &Path) -> Result<DisplayOrder> {
    let text = fs::read_to_string(path).map_err(|err| ReportError::DisplayOrderLoadFailed {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    Ok(parse_display_order(&text))
}

/// Parses display-order text.
///
/// The leading digits of each line are the unit number, so a sub-meter entry
/// such as `5A` orders unit 5. Blank lines are skipped silently, lines without
/// a leading number with a warning.
pub fn parse_display_order(text: &str) -> DisplayOrder {
    let numbers = text.lines().enumerate().filter_map(|(index, line)| {
        let line = line.trim().trim_start_matches('\u{feff}');
        if line.is_empty() {
            return None;
        }
        let digits: String = line.chars().take_while(char::is_ascii_digit).collect();
        match digits.parse::<u32>() {
            Ok(number) => Some(number),
            Err(_) => {
                warn!(line = index + 1, entry = line, "skipping display-order entry");
                None
            }
        }
    });
    DisplayOrder::from_numbers(numbers)
}
