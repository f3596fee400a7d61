use regex::Regex;
use tracing::debug;

use crate::config::PipelineConfig;
use crate::error::{ReportError, Result};
use crate::identify::{contains_keyword, normalize_name};
use crate::model::{ColumnDescriptor, ColumnKind};

/// Decides which header columns carry meter readings.
#[derive(Debug, Clone)]
pub struct ColumnClassifier<'a> {
    config: &'a PipelineConfig,
    unit_pattern: Regex,
}

impl<'a> ColumnClassifier<'a> {
    pub fn new(config: &'a PipelineConfig) -> Result<Self> {
        let pattern = format!(
            r"(?i)^{}\s+(\d{{1,2}})([A-F])?$",
            regex::escape(config.unit_word.trim())
        );
        Ok(Self {
            config,
            unit_pattern: Regex::new(&pattern)?,
        })
    }

    /// Classifies a single column name.
    ///
    /// A unit-shaped name is decided by the unit rule alone: numbers outside
    /// the configured range are ignored even if the name also contains a
    /// common-area keyword.
    pub fn kind_of(&self, name: &str) -> ColumnKind {
        let trimmed = name.trim();
        if let Some(captures) = self.unit_pattern.captures(trimmed) {
            let in_range = captures[1]
                .parse::<u32>()
                .map(|number| self.config.unit_range().contains(&number))
                .unwrap_or(false);
            return if in_range {
                ColumnKind::Unit
            } else {
                ColumnKind::Ignored
            };
        }

        let normalized = normalize_name(trimmed);
        if contains_keyword(&normalized, self.config.keywords.all()) {
            ColumnKind::CommonArea
        } else {
            ColumnKind::Ignored
        }
    }

    /// Classifies the header row of an export.
    ///
    /// `header` is the full row; the first cell is the timestamp column and is
    /// never classified. Only unit and common-area columns are returned, with
    /// their positions in the full row.
    pub fn classify(&self, header: &[String]) -> Result<Vec<ColumnDescriptor>> {
        let mut columns = Vec::new();

        for (index, name) in header.iter().enumerate().skip(1) {
            let kind = self.kind_of(name);
            if kind == ColumnKind::Ignored {
                debug!(index, column = %name.trim(), "ignoring column");
                continue;
            }
            columns.push(ColumnDescriptor {
                name: name.trim().to_string(),
                index,
                kind,
            });
        }

        if columns.is_empty() {
            return Err(ReportError::NoDataColumnsFound);
        }
        Ok(columns)
    }
}
