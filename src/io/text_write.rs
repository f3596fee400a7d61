use std::fs;
use std::path::Path;

use csv::WriterBuilder;

use crate::error::Result;
use crate::report::{Cell, ReportTable};

const BYTE_ORDER_MARK: &str = "\u{feff}";

/// Writes the report as `;`-delimited UTF-8 text with a byte-order mark so
/// spreadsheet programs pick the right encoding.
pub fn write_text(path: &Path, table: &ReportTable) -> Result<()> {
    let text = render_text(table)?;
    fs::write(path, format!("{BYTE_ORDER_MARK}{text}"))?;
    Ok(())
}

/// Renders the report: title block, blank line, table, then the summary
/// block after another blank line when there is one.
pub fn render_text(table: &ReportTable) -> Result<String> {
    let mut sections = Vec::new();

    sections.push(encode(table.title.iter().map(|line| vec![line.clone()]))?);

    let mut body = vec![table.columns.clone()];
    body.extend(
        table
            .rows
            .iter()
            .map(|row| row.iter().map(format_cell).collect::<Vec<_>>()),
    );
    sections.push(encode(body)?);

    if !table.summary.is_empty() {
        let mut summary = vec![vec![table.summary_title.clone()]];
        summary.extend(
            table
                .summary
                .iter()
                .map(|(label, value)| vec![label.clone(), format_cell(value)]),
        );
        sections.push(encode(summary)?);
    }

    Ok(sections.join("\n"))
}

fn encode(records: impl IntoIterator<Item = Vec<String>>) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_writer(Vec::new());
    for record in records {
        writer.write_record(&record)?;
    }
    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Text form of a cell. Energy uses the same precision as the workbook's
/// number formats.
pub fn format_cell(cell: &Cell) -> String {
    match cell {
        Cell::Empty => String::new(),
        Cell::Text(value) => value.clone(),
        Cell::Integer(value) => value.to_string(),
        Cell::WattHours(value) => format!("{value:.0}"),
        Cell::KilowattHours(value) => format!("{value:.2}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ReportTable {
        ReportTable {
            sheet_name: "Tüketim".to_string(),
            title: [
                "BINA".to_string(),
                "OCAK 2026 DÖNEMİ".to_string(),
                "RAPOR".to_string(),
            ],
            columns: vec!["DAİRE ADI".to_string(), "TÜKETİM (kWh)".to_string()],
            rows: vec![
                vec![Cell::Text("DAIRE 1".to_string()), Cell::KilowattHours(0.026)],
                vec![Cell::Text("LOBI".to_string()), Cell::Empty],
            ],
            summary_title: "ÖZET".to_string(),
            summary: vec![
                ("Toplam Alan".to_string(), Cell::Integer(2)),
                ("Toplam".to_string(), Cell::KilowattHours(12.346)),
            ],
        }
    }

    #[test]
    fn renders_sections_separated_by_blank_lines() {
        let text = render_text(&table()).expect("text rendered");

        assert_eq!(
            text,
            "BINA\nOCAK 2026 DÖNEMİ\nRAPOR\n\n\
             DAİRE ADI;TÜKETİM (kWh)\nDAIRE 1;0.03\nLOBI;\n\n\
             ÖZET\nToplam Alan;2\nToplam;12.35\n"
        );
    }

    #[test]
    fn summary_block_is_optional() {
        let mut table = table();
        table.summary.clear();
        let text = render_text(&table).expect("text rendered");

        assert!(text.ends_with("LOBI;\n"));
        assert!(!text.contains("ÖZET"));
    }

    #[test]
    fn energy_precision() {
        assert_eq!(format_cell(&Cell::WattHours(1234.6)), "1235");
        assert_eq!(format_cell(&Cell::KilowattHours(1.2345)), "1.23");
    }
}
