use std::collections::BTreeMap;

use crate::model::{AggregatedUnit, CanonicalKey, UnitKind, UnitRecord};

/// Merges sub-meters of the same apartment.
///
/// Suite records are summed per canonical key and renamed
/// `"<unit_word> <key>"`, dropping the sub-meter suffixes. Common-area records
/// pass through unchanged. Suites come first in ascending key order, followed
/// by the common areas in their input order.
pub fn group_units(records: Vec<UnitRecord>, unit_word: &str) -> Vec<AggregatedUnit> {
    let mut suites: BTreeMap<CanonicalKey, f64> = BTreeMap::new();
    let mut common = Vec::new();

    for record in records {
        match record.kind {
            UnitKind::Suite => *suites.entry(record.canonical).or_insert(0.0) += record.watt_hours,
            UnitKind::CommonArea => common.push(AggregatedUnit::from(record)),
        }
    }

    let mut grouped: Vec<AggregatedUnit> = suites
        .into_iter()
        .map(|(canonical, watt_hours)| AggregatedUnit {
            display_name: format!("{unit_word} {canonical}"),
            canonical,
            kind: UnitKind::Suite,
            watt_hours,
        })
        .collect();
    grouped.extend(common);
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CommonTag;

    fn record(name: &str, canonical: CanonicalKey, kind: UnitKind, watt_hours: f64) -> UnitRecord {
        UnitRecord {
            display_name: name.to_string(),
            canonical,
            kind,
            watt_hours,
        }
    }

    fn sample() -> Vec<UnitRecord> {
        vec![
            record("DAIRE 2A", CanonicalKey::Number(2), UnitKind::Suite, 4.0),
            record("LOBI", CanonicalKey::Tag(CommonTag::Lobby), UnitKind::CommonArea, 5.0),
            record("DAIRE 1A", CanonicalKey::Number(1), UnitKind::Suite, 10.0),
            record("DAIRE 1B", CanonicalKey::Number(1), UnitKind::Suite, 15.0),
            record("MUTFAK", CanonicalKey::Tag(CommonTag::Common), UnitKind::CommonArea, 1.0),
            record("P.O", CanonicalKey::Tag(CommonTag::Common), UnitKind::CommonArea, 2.0),
        ]
    }

    #[test]
    fn sub_meters_are_summed() {
        let grouped = group_units(sample(), "DAIRE");
        let names: Vec<&str> = grouped.iter().map(|unit| unit.display_name.as_str()).collect();

        assert_eq!(names, ["DAIRE 1", "DAIRE 2", "LOBI", "MUTFAK", "P.O"]);
        assert_eq!(grouped[0].watt_hours, 25.0);
        assert_eq!(grouped[1].watt_hours, 4.0);
    }

    #[test]
    fn common_areas_sharing_a_tag_stay_separate() {
        let grouped = group_units(sample(), "DAIRE");
        let common: Vec<&AggregatedUnit> = grouped
            .iter()
            .filter(|unit| unit.canonical == CanonicalKey::Tag(CommonTag::Common))
            .collect();

        assert_eq!(common.len(), 2);
        assert!(common.iter().all(|unit| unit.kind == UnitKind::CommonArea));
    }

    #[test]
    fn energy_is_conserved() {
        let input: f64 = sample().iter().map(|record| record.watt_hours).sum();
        let output: f64 = group_units(sample(), "DAIRE")
            .iter()
            .map(|unit| unit.watt_hours)
            .sum();

        assert_eq!(input, output);
    }

    #[test]
    fn grouping_is_idempotent() {
        let once = group_units(sample(), "DAIRE");
        let twice = group_units(once.iter().cloned().map(UnitRecord::from).collect(), "DAIRE");

        assert_eq!(once, twice);
    }

    #[test]
    fn without_suites_only_common_areas_remain() {
        let records: Vec<UnitRecord> = sample()
            .into_iter()
            .filter(|record| record.kind == UnitKind::CommonArea)
            .collect();
        let grouped = group_units(records.clone(), "DAIRE");

        assert_eq!(grouped.len(), 3);
        assert_eq!(grouped[0].display_name, "LOBI");
    }
}
