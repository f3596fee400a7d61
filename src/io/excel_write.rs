use std::path::Path;

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};

use crate::error::Result;
use crate::io::text_write::format_cell;
use crate::report::{Cell, ReportTable};

const TITLE_FILL: u32 = 0x1F4E78;
const HEADER_FILL: u32 = 0x4472C4;
const TITLE_SIZES: [f64; 3] = [14.0, 12.0, 11.0];
const MIN_COLUMN_WIDTH: usize = 12;

/// Zero-based row of the column headers: three title rows and a spacer.
pub const HEADER_ROW: u32 = 4;

struct Styles {
    titles: [Format; 3],
    header: Format,
    text: Format,
    centered: Format,
    watt_hours: Format,
    kilowatt_hours: Format,
    summary_label: Format,
}

impl Styles {
    fn new() -> Self {
        let border = Format::new().set_border(FormatBorder::Thin);
        let title = |size: f64| {
            Format::new()
                .set_bold()
                .set_font_size(size)
                .set_font_color(Color::White)
                .set_background_color(Color::RGB(TITLE_FILL))
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
        };
        Self {
            titles: TITLE_SIZES.map(title),
            header: Format::new()
                .set_bold()
                .set_font_size(11)
                .set_font_color(Color::White)
                .set_background_color(Color::RGB(HEADER_FILL))
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_border(FormatBorder::Thin),
            text: border.clone(),
            centered: border.clone().set_align(FormatAlign::Center),
            watt_hours: border
                .clone()
                .set_num_format("0")
                .set_align(FormatAlign::Right),
            kilowatt_hours: border
                .clone()
                .set_num_format("0.00")
                .set_align(FormatAlign::Right),
            summary_label: border.set_bold(),
        }
    }
}

/// Writes the report as a styled single-sheet workbook.
pub fn write_workbook(path: &Path, table: &ReportTable) -> Result<()> {
    let mut workbook = Workbook::new();
    let styles = Styles::new();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&table.sheet_name)?;

    let last_col = (table.width() as u16).saturating_sub(1);

    for (row, (line, format)) in table.title.iter().zip(&styles.titles).enumerate() {
        write_banner(worksheet, row as u32, last_col, line, format)?;
    }
    worksheet.set_row_height(0, 25)?;

    for (col, header) in table.columns.iter().enumerate() {
        worksheet.write_string_with_format(HEADER_ROW, col as u16, header, &styles.header)?;
    }

    let mut row = HEADER_ROW + 1;
    for cells in &table.rows {
        for (col, cell) in cells.iter().enumerate() {
            write_cell(worksheet, row, col as u16, cell, &styles)?;
        }
        row += 1;
    }

    if !table.summary.is_empty() {
        row += 2;
        write_banner(worksheet, row, last_col, &table.summary_title, &styles.header)?;
        row += 1;
        for (label, value) in &table.summary {
            worksheet.write_string_with_format(row, 0, label, &styles.summary_label)?;
            write_cell(worksheet, row, 1, value, &styles)?;
            row += 1;
        }
    }

    for (col, width) in column_widths(table).into_iter().enumerate() {
        worksheet.set_column_width(col as u16, width as f64)?;
    }

    workbook.save(path)?;
    Ok(())
}

fn write_banner(
    worksheet: &mut Worksheet,
    row: u32,
    last_col: u16,
    text: &str,
    format: &Format,
) -> Result<()> {
    if last_col == 0 {
        worksheet.write_string_with_format(row, 0, text, format)?;
    } else {
        worksheet.merge_range(row, 0, row, last_col, text, format)?;
    }
    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    styles: &Styles,
) -> Result<()> {
    match cell {
        Cell::Empty => {
            worksheet.write_blank(row, col, &styles.text)?;
        }
        Cell::Text(value) => {
            worksheet.write_string_with_format(row, col, value, &styles.text)?;
        }
        Cell::Integer(value) => {
            worksheet.write_number_with_format(row, col, *value as f64, &styles.centered)?;
        }
        Cell::WattHours(value) => {
            worksheet.write_number_with_format(row, col, *value, &styles.watt_hours)?;
        }
        Cell::KilowattHours(value) => {
            worksheet.write_number_with_format(row, col, *value, &styles.kilowatt_hours)?;
        }
    }
    Ok(())
}

/// Widest header or table cell per column, padded, never narrower than
/// [`MIN_COLUMN_WIDTH`].
fn column_widths(table: &ReportTable) -> Vec<usize> {
    table
        .columns
        .iter()
        .enumerate()
        .map(|(col, header)| {
            let widest = table
                .rows
                .iter()
                .filter_map(|row| row.get(col))
                .map(|cell| format_cell(cell).chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0);
            (widest + 4).max(MIN_COLUMN_WIDTH)
        })
        .collect()
}
