use serde::Serialize;

use crate::model::{AggregatedUnit, UnitKind};

/// Subtotal for one billing category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KindSubtotal {
    pub kind: UnitKind,
    pub count: usize,
    pub kilowatt_hours: f64,
}

/// Statistics over the final unit set, all in kWh.
///
/// An empty set reports zero for every figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub count: usize,
    pub total_kwh: f64,
    pub mean_kwh: f64,
    pub max_kwh: f64,
    pub min_kwh: f64,
    /// Present kinds only, suites before common areas.
    pub by_kind: Vec<KindSubtotal>,
}

impl SummaryStatistics {
    pub fn compute(units: &[AggregatedUnit]) -> Self {
        let values: Vec<f64> = units.iter().map(AggregatedUnit::kilowatt_hours).collect();
        let count = values.len();
        let total_kwh: f64 = values.iter().sum();

        let (mean_kwh, max_kwh, min_kwh) = if count == 0 {
            (0.0, 0.0, 0.0)
        } else {
            (
                total_kwh / count as f64,
                values.iter().copied().fold(f64::MIN, f64::max),
                values.iter().copied().fold(f64::MAX, f64::min),
            )
        };

        let by_kind = [UnitKind::Suite, UnitKind::CommonArea]
            .into_iter()
            .filter_map(|kind| {
                let subset: Vec<&AggregatedUnit> =
                    units.iter().filter(|unit| unit.kind == kind).collect();
                if subset.is_empty() {
                    return None;
                }
                Some(KindSubtotal {
                    kind,
                    count: subset.len(),
                    kilowatt_hours: subset.iter().map(|unit| unit.kilowatt_hours()).sum(),
                })
            })
            .collect();

        Self {
            count,
            total_kwh,
            mean_kwh,
            max_kwh,
            min_kwh,
            by_kind,
        }
    }
}
