use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Tunables for one pipeline run.
///
/// Every lookup the classifier, resolver and emitters need lives here so the
/// pipeline never reaches for process-wide state. The defaults describe the
/// building the tool was written for; a JSON file with any subset of the
/// fields overrides them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// First line of the report title block.
    pub building_name: String,
    /// Word that prefixes unit columns (`DAIRE 5A`) and grouped unit names.
    pub unit_word: String,
    /// Smallest accepted unit number.
    pub min_unit: u32,
    /// Largest accepted unit number.
    pub max_unit: u32,
    pub keywords: KeywordSet,
    /// Log a warning for every column with blank, non-numeric or
    /// non-positive cells. Totals are unaffected.
    pub warn_on_dropped_cells: bool,
}

/// Upper-case substrings that mark common-area columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordSet {
    pub lobby: Vec<String>,
    pub management: Vec<String>,
    pub fitness: Vec<String>,
    /// Shared spaces reported under the generic common tag.
    pub common: Vec<String>,
    /// Marks a column as common area without giving it a symbolic tag.
    pub untagged: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            building_name: "FOLKART BLU ÇEŞME YÖNETİMİ".to_string(),
            unit_word: "DAIRE".to_string(),
            min_unit: 1,
            max_unit: 80,
            keywords: KeywordSet::default(),
            warn_on_dropped_cells: false,
        }
    }
}

impl Default for KeywordSet {
    fn default() -> Self {
        Self {
            lobby: strings(&["LOBI"]),
            management: strings(&["YONETIM"]),
            fitness: strings(&["FITNESS"]),
            common: strings(&["MUTFAK", "P.O", "BAYBAYAN"]),
            untagged: strings(&["RES"]),
        }
    }
}

impl PipelineConfig {
    /// Reads a JSON configuration file; missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Accepted unit numbers.
    pub fn unit_range(&self) -> RangeInclusive<u32> {
        self.min_unit..=self.max_unit
    }
}

impl KeywordSet {
    /// Iterates over every common-area keyword regardless of its tag.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.lobby
            .iter()
            .chain(&self.management)
            .chain(&self.fitness)
            .chain(&self.common)
            .chain(&self.untagged)
            .map(String::as_str)
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
