use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::error::{ReportError, Result};
use crate::model::{MeterExport, RawRecord};

/// Line holding the column names. Lines before it are free-form metadata.
pub const HEADER_LINE: usize = 7;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Reads a PPD meter export into memory.
pub fn read_export(path: &Path) -> Result<MeterExport> {
    let text = fs::read_to_string(path)?;
    parse_export(&text)
}

/// Parses the text of a PPD meter export.
///
/// The layout is positional: the header is whatever sits on line 7 and every
/// following non-blank line is an hourly record.
pub fn parse_export(text: &str) -> Result<MeterExport> {
    let (preamble, body) = split_lines(text, HEADER_LINE);
    let header_line = match preamble.get(HEADER_LINE - 1) {
        Some(line) => *line,
        None => {
            return Err(ReportError::MissingHeaderRow {
                expected: HEADER_LINE,
                found: preamble.len(),
            });
        }
    };

    let header = match semicolon_reader(header_line).records().next() {
        Some(record) => fields(&record?),
        None => Vec::new(),
    };

    let mut records = Vec::new();
    for result in semicolon_reader(body).records() {
        let record = result?;
        if is_blank(&record) {
            continue;
        }
        records.push(RawRecord::new(fields(&record)));
    }

    Ok(MeterExport { header, records })
}

/// Splits off the first `count` physical lines of `text`, byte-order mark
/// removed. Returns those lines and the untouched remainder.
pub(crate) fn split_lines(text: &str, count: usize) -> (Vec<&str>, &str) {
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
    let mut lines = Vec::with_capacity(count);
    let mut offset = 0;

    for line in text.split_inclusive('\n').take(count) {
        offset += line.len();
        lines.push(line);
    }
    (lines, &text[offset..])
}

/// A `;`-delimited reader over `text`. Quotes carry no meaning in these files
/// and rows may be ragged.
pub(crate) fn semicolon_reader(text: &str) -> csv::Reader<&[u8]> {
    ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(text.as_bytes())
}

pub(crate) fn fields(record: &StringRecord) -> Vec<String> {
    record.iter().map(str::to_string).collect()
}

pub(crate) fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = "\u{feff}intelligent Touch Manager\r\n\
        PPD\r\n\
        \r\n\
        Donem;01.01.2026;31.01.2026\r\n\
        \"quoted metadata\r\n\
        Birim;Wh\r\n\
        TIME;DAIRE 1A;DAIRE 1B;LOBI\r\n\
        00:00;5;5;2\r\n\
        \r\n\
        01:00;7;8\r\n";

    #[test]
    fn header_is_taken_from_line_seven() {
        let export = parse_export(EXPORT).expect("export parsed");

        assert_eq!(export.header, ["TIME", "DAIRE 1A", "DAIRE 1B", "LOBI"]);
        assert_eq!(export.records.len(), 2);
        assert_eq!(export.records[0].timestamp(), "00:00");
    }

    #[test]
    fn short_rows_read_as_blank_cells() {
        let export = parse_export(EXPORT).expect("export parsed");
        let lobby: Vec<&str> = export.column(3).collect();

        assert_eq!(lobby, ["2", ""]);
    }

    #[test]
    fn missing_header_is_reported() {
        let result = parse_export("a\nb\nc\n");
        assert!(matches!(
            result,
            Err(ReportError::MissingHeaderRow {
                expected: 7,
                found: 3
            })
        ));
    }

    #[test]
    fn header_without_data_has_no_records() {
        let export = parse_export("1\n2\n3\n4\n5\n6\nTIME;LOBI").expect("export parsed");

        assert_eq!(export.header, ["TIME", "LOBI"]);
        assert!(export.records.is_empty());
    }
}
