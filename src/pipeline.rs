use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::aggregate::aggregate_column;
use crate::classify::ColumnClassifier;
use crate::config::PipelineConfig;
use crate::error::{ReportError, Result};
use crate::group::group_units;
use crate::identify::canonical_key;
use crate::io::{excel_write, export_read, text_write};
use crate::model::{
    AggregatedUnit, ColumnKind, DisplayOrder, IdentifierMapping, MeterExport, MeterReading,
    UnitKind, UnitRecord,
};
use crate::order::order_units;
use crate::report::{self, ReportPaths, ReportPeriod, ReportTable};
use crate::summary::SummaryStatistics;

/// Everything one run produces before it is written out.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumptionReport {
    pub period: ReportPeriod,
    /// Units in presentation order.
    pub units: Vec<AggregatedUnit>,
    pub statistics: SummaryStatistics,
    pub table: ReportTable,
}

/// Turns meter exports into consumption reports.
///
/// The configuration and the reference tables are supplied up front and only
/// read afterwards.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
    mapping: Option<IdentifierMapping>,
    order: DisplayOrder,
}

impl Pipeline {
    pub fn new(
        config: PipelineConfig,
        mapping: Option<IdentifierMapping>,
        order: DisplayOrder,
    ) -> Self {
        Self {
            config,
            mapping,
            order,
        }
    }

    /// Classifies the export's columns and totals each one.
    pub fn unit_records(&self, export: &MeterExport) -> Result<Vec<UnitRecord>> {
        let classifier = ColumnClassifier::new(&self.config)?;
        let columns = classifier.classify(&export.header)?;
        info!(
            columns = columns.len(),
            hours = export.records.len(),
            "classified meter columns"
        );

        let records = columns
            .into_iter()
            .filter_map(|column| {
                let kind = unit_kind(column.kind)?;
                let total = aggregate_column(export.column(column.index));
                if self.config.warn_on_dropped_cells && total.diagnostics.dropped() > 0 {
                    warn!(
                        column = %column.name,
                        blank = total.diagnostics.blank,
                        non_numeric = total.diagnostics.non_numeric,
                        non_positive = total.diagnostics.non_positive,
                        "cells left out of column total"
                    );
                }
                debug!(column = %column.name, watt_hours = total.watt_hours, "column total");

                Some(UnitRecord {
                    canonical: canonical_key(&column.name, &self.config.keywords),
                    display_name: column.name,
                    kind,
                    watt_hours: total.watt_hours,
                })
            })
            .collect();
        Ok(records)
    }

    /// Runs every stage up to the shaped report.
    pub fn build_report(
        &self,
        export: &MeterExport,
        period: ReportPeriod,
    ) -> Result<ConsumptionReport> {
        let records = self.unit_records(export)?;
        let grouped = group_units(records, &self.config.unit_word);
        let units = order_units(grouped, &self.order);
        let statistics = SummaryStatistics::compute(&units);
        info!(
            units = statistics.count,
            total_kwh = statistics.total_kwh,
            "aggregated consumption"
        );

        let table = report::shape_consumption_report(
            &units,
            &statistics,
            self.mapping.as_ref(),
            &period,
            &self.config,
        );
        Ok(ConsumptionReport {
            period,
            units,
            statistics,
            table,
        })
    }

    /// Reads `input`, builds the report and writes the text and workbook
    /// artifacts below `output_dir`.
    #[instrument(
        level = "info",
        skip_all,
        fields(input = %input.display(), output = %output_dir.display())
    )]
    pub fn run(
        &self,
        input: &Path,
        output_dir: &Path,
    ) -> Result<(ConsumptionReport, ReportPaths)> {
        if !input.exists() {
            return Err(ReportError::MissingInput(input.to_path_buf()));
        }
        let export = export_read::read_export(input)?;
        let period = ReportPeriod::from_export_name(input);
        let report = self.build_report(&export, period)?;

        let paths = report.period.paths(output_dir);
        write_consumption(&report.table, &paths)?;
        Ok((report, paths))
    }

    /// Joins prior meter readings with `report` and writes the
    /// cross-reference workbook.
    #[instrument(level = "info", skip_all, fields(output = %output_dir.display()))]
    pub fn write_cross_reference(
        &self,
        report: &ConsumptionReport,
        readings: &[MeterReading],
        output_dir: &Path,
    ) -> Result<PathBuf> {
        let table = report::shape_cross_reference(
            readings,
            &report.units,
            &self.order,
            &report.period,
            &self.config,
        );
        let paths = report.period.paths(output_dir);
        create_directory(&paths.directory)?;

        excel_write::write_workbook(&paths.cross_reference, &table)
            .map_err(|err| ReportError::output(&paths.cross_reference, err))?;
        info!(
            path = %paths.cross_reference.display(),
            rows = table.rows.len(),
            "wrote cross-reference workbook"
        );
        Ok(paths.cross_reference)
    }
}

/// Kind of the unit a classified column feeds; ignored columns feed none.
fn unit_kind(kind: ColumnKind) -> Option<UnitKind> {
    match kind {
        ColumnKind::Unit => Some(UnitKind::Suite),
        ColumnKind::CommonArea => Some(UnitKind::CommonArea),
        ColumnKind::Ignored => None,
    }
}

/// Writes both encodings of the consumption report.
pub fn write_consumption(table: &ReportTable, paths: &ReportPaths) -> Result<()> {
    create_directory(&paths.directory)?;

    text_write::write_text(&paths.text, table)
        .map_err(|err| ReportError::output(&paths.text, err))?;
    info!(path = %paths.text.display(), "wrote text report");

    excel_write::write_workbook(&paths.workbook, table)
        .map_err(|err| ReportError::output(&paths.workbook, err))?;
    info!(path = %paths.workbook.display(), "wrote workbook report");
    Ok(())
}

fn create_directory(directory: &Path) -> Result<()> {
    fs::create_dir_all(directory).map_err(|err| ReportError::output(directory, err.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CanonicalKey, CommonTag, RawRecord};

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|cell| cell.to_string()).collect()
    }

    fn export(header: &[&str], rows: &[&[&str]]) -> MeterExport {
        MeterExport {
            header: strings(header),
            records: rows
                .iter()
                .map(|row| RawRecord::new(strings(row)))
                .collect(),
        }
    }

    #[test]
    fn sub_meters_and_common_areas() {
        let export = export(
            &["TIME", "DAIRE 1A", "DAIRE 1B", "LOBI"],
            &[&["00:00", "5", "5", "2"], &["01:00", "7", "8", "3"]],
        );
        let report = Pipeline::default()
            .build_report(&export, ReportPeriod::unknown())
            .expect("report built");

        assert_eq!(
            report.units,
            vec![
                AggregatedUnit {
                    display_name: "DAIRE 1".to_string(),
                    canonical: CanonicalKey::Number(1),
                    kind: UnitKind::Suite,
                    watt_hours: 25.0,
                },
                AggregatedUnit {
                    display_name: "LOBI".to_string(),
                    canonical: CanonicalKey::Tag(CommonTag::Lobby),
                    kind: UnitKind::CommonArea,
                    watt_hours: 5.0,
                },
            ]
        );
    }

    #[test]
    fn energy_is_conserved_across_the_pipeline() {
        let export = export(
            &["TIME", "DAIRE 2A", "DAIRE 81", "DAIRE 2B", "MUTFAK", "FITNESS", "NOTE"],
            &[
                &["00:00", "1.5", "900", "-3", "-", "4", "77"],
                &["01:00", "", "900", "2", "x", "0", "77"],
                &["02:00", "3"],
            ],
        );
        let report = Pipeline::default()
            .build_report(&export, ReportPeriod::unknown())
            .expect("report built");
        let total: f64 = report.units.iter().map(|unit| unit.watt_hours).sum();

        assert_eq!(total, 1.5 + 2.0 + 4.0 + 3.0);
        assert_eq!(report.units.len(), 3);
    }

    #[test]
    fn display_order_and_mapping_shape_the_table() {
        let export = export(
            &["TIME", "DAIRE 1", "DAIRE 2", "LOBI"],
            &[&["00:00", "1000", "2000", "500"]],
        );
        let mapping: IdentifierMapping = [("2", "200")].into_iter().collect();
        let pipeline = Pipeline::new(
            PipelineConfig::default(),
            Some(mapping),
            DisplayOrder::from_numbers([2, 1]),
        );
        let report = pipeline
            .build_report(&export, ReportPeriod::unknown())
            .expect("report built");
        let names: Vec<&str> = report
            .units
            .iter()
            .map(|unit| unit.display_name.as_str())
            .collect();

        assert_eq!(names, ["DAIRE 2", "DAIRE 1", "LOBI"]);
        assert_eq!(report.table.columns[0], "ESKİ NO");
        assert_eq!(report.table.rows[0][0], report::Cell::Text("200".to_string()));
        assert_eq!(report.table.rows[1][0], report::Cell::Empty);
    }

    #[test]
    fn ignored_columns_produce_no_unit() {
        assert_eq!(unit_kind(ColumnKind::Unit), Some(UnitKind::Suite));
        assert_eq!(unit_kind(ColumnKind::CommonArea), Some(UnitKind::CommonArea));
        assert_eq!(unit_kind(ColumnKind::Ignored), None);
    }

    #[test]
    fn exports_without_meter_columns_fail() {
        let export = export(&["TIME", "NOTE"], &[&["00:00", "1"]]);
        let result = Pipeline::default().build_report(&export, ReportPeriod::unknown());

        assert!(matches!(result, Err(ReportError::NoDataColumnsFound)));
    }
}
