//! Encoding-neutral report shapes.
//!
//! Both the text and the spreadsheet writers render a [`ReportTable`] and
//! nothing else, so the two artifacts of a run cannot disagree.

pub mod period;

use crate::config::PipelineConfig;
use crate::identify::old_identifier;
use crate::model::{AggregatedUnit, CanonicalKey, DisplayOrder, IdentifierMapping, MeterReading};
use crate::summary::SummaryStatistics;

pub use period::{ReportPaths, ReportPeriod};

/// Sheet name of the consumption workbook.
pub const CONSUMPTION_SHEET: &str = "Tüketim";
/// Sheet name of the meter cross-reference workbook.
pub const CROSS_REFERENCE_SHEET: &str = "Sayaç Okuma";
pub const CONSUMPTION_TITLE: &str = "ISITMA/SOĞUTMA - AYLIK TÜKETİM RAPORU";
pub const CROSS_REFERENCE_TITLE: &str = "ISITMA/SOĞUTMA - SAYAÇ OKUMA KARŞILAŞTIRMASI";
pub const SUMMARY_TITLE: &str = "ÖZET İSTATİSTİKLERİ";

/// A single report cell. Numeric variants carry their unit so each writer can
/// pick a matching format.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Integer(i64),
    WattHours(f64),
    KilowattHours(f64),
}

/// A titled table followed by an optional key/value block.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    pub sheet_name: String,
    pub title: [String; 3],
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    pub summary_title: String,
    pub summary: Vec<(String, Cell)>,
}

impl ReportTable {
    pub fn width(&self) -> usize {
        self.columns.len()
    }
}

/// Builds the monthly consumption report.
///
/// The old-number column is present only when a non-empty mapping is given.
pub fn shape_consumption_report(
    units: &[AggregatedUnit],
    stats: &SummaryStatistics,
    mapping: Option<&IdentifierMapping>,
    period: &ReportPeriod,
    config: &PipelineConfig,
) -> ReportTable {
    let mapping = mapping.filter(|mapping| !mapping.is_empty());

    let mut columns = Vec::new();
    if mapping.is_some() {
        columns.push("ESKİ NO".to_string());
    }
    columns.extend(
        ["DAİRE ADI", "DAİRE NO", "TİP", "TÜKETİM (Wh)", "TÜKETİM (kWh)"].map(String::from),
    );

    let rows = units
        .iter()
        .map(|unit| {
            let mut row = Vec::with_capacity(columns.len());
            if let Some(mapping) = mapping {
                row.push(text_or_empty(&old_identifier(mapping, &unit.canonical)));
            }
            row.push(Cell::Text(unit.display_name.clone()));
            row.push(key_cell(&unit.canonical));
            row.push(Cell::Text(unit.kind.label().to_string()));
            row.push(Cell::WattHours(unit.watt_hours));
            row.push(Cell::KilowattHours(unit.kilowatt_hours()));
            row
        })
        .collect();

    ReportTable {
        sheet_name: CONSUMPTION_SHEET.to_string(),
        title: title_block(config, period, CONSUMPTION_TITLE),
        columns,
        rows,
        summary_title: SUMMARY_TITLE.to_string(),
        summary: summary_entries(stats),
    }
}

fn summary_entries(stats: &SummaryStatistics) -> Vec<(String, Cell)> {
    let mut entries = vec![
        ("Toplam Alan".to_string(), Cell::Integer(stats.count as i64)),
        (
            "Genel Aylık Toplam (kWh)".to_string(),
            Cell::KilowattHours(stats.total_kwh),
        ),
        ("Ortalama (kWh)".to_string(), Cell::KilowattHours(stats.mean_kwh)),
        ("En Yüksek (kWh)".to_string(), Cell::KilowattHours(stats.max_kwh)),
        ("En Düşük (kWh)".to_string(), Cell::KilowattHours(stats.min_kwh)),
    ];
    for subtotal in &stats.by_kind {
        let label = subtotal.kind.label();
        entries.push((
            format!("{label} - Toplam (kWh)"),
            Cell::KilowattHours(subtotal.kilowatt_hours),
        ));
        entries.push((format!("{label} - Sayı"), Cell::Integer(subtotal.count as i64)));
    }
    entries
}

/// Where the value of a cross-reference row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingSource {
    /// Read off the meter in the prior-reading workbook.
    Meter,
    /// Aggregated from the hourly export.
    Export,
    Missing,
}

impl ReadingSource {
    pub fn label(self) -> &'static str {
        match self {
            ReadingSource::Meter => "OKUMA",
            ReadingSource::Export => "HESAP",
            ReadingSource::Missing => "",
        }
    }
}

/// A prior-reading row joined with the export totals.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossReferenceRow {
    pub old_id: String,
    pub new_id: String,
    pub status: String,
    pub kilowatt_hours: Option<f64>,
    pub source: ReadingSource,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum ReadingKey {
    Numeric(u32),
    Text(String),
}

fn reading_key(reading: &MeterReading) -> ReadingKey {
    match reading.unit_number() {
        Some(number) => ReadingKey::Numeric(number),
        None => ReadingKey::Text(reading.new_id.trim().to_string()),
    }
}

/// Joins prior meter readings with the aggregated units on the new unit
/// number.
///
/// A reading taken off the meter wins over the exported total; rows with
/// neither stay blank. Rows follow `order` when it is non-empty, and the
/// rest are sorted by unit number with non-numeric ids last.
pub fn cross_reference_rows(
    readings: &[MeterReading],
    units: &[AggregatedUnit],
    order: &DisplayOrder,
) -> Vec<CrossReferenceRow> {
    let mut remaining: Vec<Option<&MeterReading>> = readings.iter().map(Some).collect();
    let mut sequenced: Vec<&MeterReading> = Vec::with_capacity(readings.len());

    for number in order.numbers() {
        for slot in remaining.iter_mut() {
            if slot.is_some_and(|reading| reading.unit_number() == Some(*number)) {
                sequenced.extend(slot.take());
            }
        }
    }

    let mut rest: Vec<&MeterReading> = remaining.into_iter().flatten().collect();
    rest.sort_by_key(|reading| reading_key(reading));
    sequenced.extend(rest);

    sequenced
        .into_iter()
        .map(|reading| {
            let exported = reading.unit_number().and_then(|number| {
                units
                    .iter()
                    .find(|unit| unit.canonical == CanonicalKey::Number(number))
                    .map(AggregatedUnit::kilowatt_hours)
            });
            let (kilowatt_hours, source) = match (reading.reading, exported) {
                (Some(value), _) => (Some(value), ReadingSource::Meter),
                (None, Some(value)) => (Some(value), ReadingSource::Export),
                (None, None) => (None, ReadingSource::Missing),
            };
            CrossReferenceRow {
                old_id: reading.old_id.clone(),
                new_id: reading.new_id.clone(),
                status: reading.status.clone(),
                kilowatt_hours,
                source,
            }
        })
        .collect()
}

/// Builds the meter cross-reference report.
pub fn shape_cross_reference(
    readings: &[MeterReading],
    units: &[AggregatedUnit],
    order: &DisplayOrder,
    period: &ReportPeriod,
    config: &PipelineConfig,
) -> ReportTable {
    let rows = cross_reference_rows(readings, units, order)
        .into_iter()
        .map(|row| {
            vec![
                text_or_empty(&row.old_id),
                text_or_empty(&row.new_id),
                text_or_empty(&row.status),
                row.kilowatt_hours.map_or(Cell::Empty, Cell::KilowattHours),
                text_or_empty(row.source.label()),
            ]
        })
        .collect();

    ReportTable {
        sheet_name: CROSS_REFERENCE_SHEET.to_string(),
        title: title_block(config, period, CROSS_REFERENCE_TITLE),
        columns: ["ESKİ NO", "YENİ NO", "DURUM", "TÜKETİM (kWh)", "KAYNAK"]
            .map(String::from)
            .to_vec(),
        rows,
        summary_title: String::new(),
        summary: Vec::new(),
    }
}

fn title_block(config: &PipelineConfig, period: &ReportPeriod, heading: &str) -> [String; 3] {
    [
        config.building_name.clone(),
        format!("{} DÖNEMİ", period.label()),
        heading.to_string(),
    ]
}

fn key_cell(key: &CanonicalKey) -> Cell {
    match key {
        CanonicalKey::Number(number) => Cell::Integer(i64::from(*number)),
        other => Cell::Text(other.to_string()),
    }
}

fn text_or_empty(value: &str) -> Cell {
    if value.trim().is_empty() {
        Cell::Empty
    } else {
        Cell::Text(value.to_string())
    }
}
