use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

/// One data line of a meter export, split on the delimiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    fields: Vec<String>,
}

impl RawRecord {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    /// First field; kept verbatim and never interpreted.
    pub fn timestamp(&self) -> &str {
        self.cell(0)
    }

    /// Field at `index`, empty when the line is shorter than the header.
    pub fn cell(&self, index: usize) -> &str {
        self.fields.get(index).map(String::as_str).unwrap_or("")
    }
}

/// A meter export held in memory: the header line and every data line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeterExport {
    pub header: Vec<String>,
    pub records: Vec<RawRecord>,
}

impl MeterExport {
    /// All cells of the column at `index`, top to bottom.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &str> {
        self.records.iter().map(move |record| record.cell(index))
    }
}

/// Role of a raw export column after classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ColumnKind {
    /// Sub-meter of an individually billed apartment.
    Unit,
    /// Shared space billed on its own.
    CommonArea,
    /// Timestamp, metadata, test meters and anything unrecognised.
    Ignored,
}

/// A column of the meter export header row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    /// Column name as written in the header, trimmed.
    pub name: String,
    /// Position of the column in every data row. The timestamp is index 0.
    pub index: usize,
    pub kind: ColumnKind,
}

/// Symbolic identifiers for shared spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum CommonTag {
    #[serde(rename = "LOBI")]
    Lobby,
    #[serde(rename = "YONETIM")]
    Management,
    #[serde(rename = "FITNESS")]
    Fitness,
    #[serde(rename = "ORTAK")]
    Common,
}

impl CommonTag {
    /// Label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            CommonTag::Lobby => "LOBI",
            CommonTag::Management => "YONETIM",
            CommonTag::Fitness => "FITNESS",
            CommonTag::Common => "ORTAK",
        }
    }
}

/// Identifier used to group and order records.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum CanonicalKey {
    /// Apartment number with any sub-meter suffix removed.
    Number(u32),
    Tag(CommonTag),
    /// Fallback for names carrying neither a keyword nor a number.
    Name(String),
}

impl CanonicalKey {
    pub fn as_number(&self) -> Option<u32> {
        match self {
            CanonicalKey::Number(number) => Some(*number),
            _ => None,
        }
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanonicalKey::Number(number) => write!(f, "{number}"),
            CanonicalKey::Tag(tag) => f.write_str(tag.label()),
            CanonicalKey::Name(name) => f.write_str(name),
        }
    }
}

/// Billing category of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum UnitKind {
    #[serde(rename = "SÜİT")]
    Suite,
    #[serde(rename = "ORTAK")]
    CommonArea,
}

impl UnitKind {
    /// Label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            UnitKind::Suite => "SÜİT",
            UnitKind::CommonArea => "ORTAK",
        }
    }
}

/// Monthly total of a single export column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitRecord {
    pub display_name: String,
    pub canonical: CanonicalKey,
    pub kind: UnitKind,
    pub watt_hours: f64,
}

/// Monthly total of a physical unit once its sub-meters are merged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedUnit {
    pub display_name: String,
    pub canonical: CanonicalKey,
    pub kind: UnitKind,
    pub watt_hours: f64,
}

impl AggregatedUnit {
    pub fn kilowatt_hours(&self) -> f64 {
        self.watt_hours / 1000.0
    }
}

impl From<UnitRecord> for AggregatedUnit {
    fn from(record: UnitRecord) -> Self {
        Self {
            display_name: record.display_name,
            canonical: record.canonical,
            kind: record.kind,
            watt_hours: record.watt_hours,
        }
    }
}

impl From<AggregatedUnit> for UnitRecord {
    fn from(unit: AggregatedUnit) -> Self {
        Self {
            display_name: unit.display_name,
            canonical: unit.canonical,
            kind: unit.kind,
            watt_hours: unit.watt_hours,
        }
    }
}

/// New unit number → old unit number, as strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierMapping {
    entries: HashMap<String, String>,
}

impl IdentifierMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `new_id` used to be numbered `old_id`. A repeated new id
    /// keeps the last old id seen.
    pub fn insert(&mut self, new_id: impl Into<String>, old_id: impl Into<String>) {
        self.entries.insert(new_id.into(), old_id.into());
    }

    /// Old identifier for `key`, or an empty string when none is known.
    pub fn old_id_for(&self, key: &CanonicalKey) -> &str {
        self.entries
            .get(&key.to_string())
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for IdentifierMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = IdentifierMapping::new();
        for (new_id, old_id) in iter {
            mapping.insert(new_id, old_id);
        }
        mapping
    }
}

/// Unit numbers in the order the report should list them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayOrder {
    numbers: Vec<u32>,
}

impl DisplayOrder {
    /// Builds an order from `numbers`, dropping repeats after their first
    /// occurrence.
    pub fn from_numbers(numbers: impl IntoIterator<Item = u32>) -> Self {
        let mut deduped: Vec<u32> = Vec::new();
        for number in numbers {
            if !deduped.contains(&number) {
                deduped.push(number);
            }
        }
        Self { numbers: deduped }
    }

    pub fn numbers(&self) -> &[u32] {
        &self.numbers
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }
}

/// One row of the prior-period meter-reading workbook.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeterReading {
    pub old_id: String,
    pub new_id: String,
    pub status: String,
    /// Consumption read off the meter, in kWh.
    pub reading: Option<f64>,
}

impl MeterReading {
    /// The new identifier as a unit number, when it is one.
    pub fn unit_number(&self) -> Option<u32> {
        self.new_id.trim().parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_lookup_is_best_effort() {
        let mapping: IdentifierMapping = [("5", "100")].into_iter().collect();

        assert_eq!(mapping.old_id_for(&CanonicalKey::Number(5)), "100");
        assert_eq!(mapping.old_id_for(&CanonicalKey::Number(6)), "");
        assert_eq!(mapping.old_id_for(&CanonicalKey::Tag(CommonTag::Lobby)), "");
    }

    #[test]
    fn display_order_keeps_first_occurrence() {
        let order = DisplayOrder::from_numbers([3, 1, 3, 2, 1]);
        assert_eq!(order.numbers(), &[3, 1, 2]);
    }
}
