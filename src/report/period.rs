use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static EXPORT_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{2})(\d{2})(\d{4})_(\d{2})(\d{2})(\d{4})").unwrap());

const MONTHS: [&str; 12] = [
    "OCAK", "ŞUBAT", "MART", "NİSAN", "MAYIS", "HAZİRAN", "TEMMUZ", "AĞUSTOS", "EYLÜL", "EKİM",
    "KASIM", "ARALIK",
];

const UNKNOWN: &str = "RAPOR";

/// Billing month a report covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportPeriod {
    stem: String,
    label: String,
}

/// Where the artifacts of one run are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub directory: PathBuf,
    pub text: PathBuf,
    pub workbook: PathBuf,
    pub cross_reference: PathBuf,
}

impl ReportPeriod {
    /// Period for `month` (1-12) of `year`.
    pub fn month(month: u32, year: u32) -> Option<Self> {
        let name = MONTHS.get(month.checked_sub(1)? as usize)?;
        Some(Self {
            stem: format!("{month}_{year}"),
            label: format!("{name} {year}"),
        })
    }

    /// Placeholder used when the export name carries no date range.
    pub fn unknown() -> Self {
        Self {
            stem: UNKNOWN.to_string(),
            label: UNKNOWN.to_string(),
        }
    }

    /// Reads the period from an export named like `PPD_01012026_01022026.csv`.
    /// The start date of the range decides the month.
    pub fn from_export_name(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        EXPORT_RANGE
            .captures(&name)
            .and_then(|captures| {
                let month = captures[2].parse().ok()?;
                let year = captures[3].parse().ok()?;
                Self::month(month, year)
            })
            .unwrap_or_else(Self::unknown)
    }

    /// File-system friendly form, e.g. `1_2026`.
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// Human readable form, e.g. `OCAK 2026`.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Artifact paths below `output_dir`.
    pub fn paths(&self, output_dir: &Path) -> ReportPaths {
        let stem = &self.stem;
        let directory = output_dir.join(stem);
        ReportPaths {
            text: directory.join(format!("Klima_{stem}_Tüketim.csv")),
            workbook: directory.join(format!("Klima_{stem}_Tüketim.xlsx")),
            cross_reference: directory.join(format!("Klima_{stem}_Sayaç_Okuma.xlsx")),
            directory,
        }
    }
}
