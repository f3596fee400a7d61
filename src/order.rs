use crate::model::{AggregatedUnit, DisplayOrder};

/// Arranges units for presentation.
///
/// Units numbered in `order` come first, in the order's sequence. Everything
/// else follows sorted by display name. Should the order match several units
/// they are all emitted in input order.
pub fn order_units(units: Vec<AggregatedUnit>, order: &DisplayOrder) -> Vec<AggregatedUnit> {
    let mut remaining: Vec<Option<AggregatedUnit>> = units.into_iter().map(Some).collect();
    let mut ordered = Vec::with_capacity(remaining.len());

    for number in order.numbers() {
        for slot in remaining.iter_mut() {
            if slot
                .as_ref()
                .and_then(|unit| unit.canonical.as_number())
                .is_some_and(|candidate| candidate == *number)
            {
                ordered.extend(slot.take());
            }
        }
    }

    let mut rest: Vec<AggregatedUnit> = remaining.into_iter().flatten().collect();
    rest.sort_by(|lhs, rhs| lhs.display_name.cmp(&rhs.display_name));
    ordered.extend(rest);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CanonicalKey, CommonTag, UnitKind};

    fn unit(name: &str, canonical: CanonicalKey) -> AggregatedUnit {
        let kind = match canonical {
            CanonicalKey::Number(_) => UnitKind::Suite,
            _ => UnitKind::CommonArea,
        };
        AggregatedUnit {
            display_name: name.to_string(),
            canonical,
            kind,
            watt_hours: 1.0,
        }
    }

    fn names(units: &[AggregatedUnit]) -> Vec<&str> {
        units.iter().map(|unit| unit.display_name.as_str()).collect()
    }

    fn sample() -> Vec<AggregatedUnit> {
        vec![
            unit("DAIRE 1", CanonicalKey::Number(1)),
            unit("DAIRE 2", CanonicalKey::Number(2)),
            unit("LOBI", CanonicalKey::Tag(CommonTag::Lobby)),
        ]
    }

    #[test]
    fn display_order_then_remainder() {
        let ordered = order_units(sample(), &DisplayOrder::from_numbers([2, 1]));
        assert_eq!(names(&ordered), ["DAIRE 2", "DAIRE 1", "LOBI"]);
    }

    #[test]
    fn unlisted_units_sorted_by_name() {
        let mut units = sample();
        units.push(unit("DAIRE 10", CanonicalKey::Number(10)));
        units.push(unit("FITNESS", CanonicalKey::Tag(CommonTag::Fitness)));

        let ordered = order_units(units, &DisplayOrder::from_numbers([2]));
        assert_eq!(
            names(&ordered),
            ["DAIRE 2", "DAIRE 1", "DAIRE 10", "FITNESS", "LOBI"]
        );
    }

    #[test]
    fn empty_order_sorts_everything_by_name() {
        let mut units = sample();
        units.reverse();
        units.push(unit("Daire 3", CanonicalKey::Number(3)));

        let ordered = order_units(units, &DisplayOrder::default());
        assert_eq!(names(&ordered), ["DAIRE 1", "DAIRE 2", "Daire 3", "LOBI"]);
    }

    #[test]
    fn order_numbers_without_units_are_skipped() {
        let ordered = order_units(sample(), &DisplayOrder::from_numbers([9, 1]));
        assert_eq!(names(&ordered), ["DAIRE 1", "DAIRE 2", "LOBI"]);
    }

    #[test]
    fn duplicate_matches_keep_encounter_order() {
        let mut units = sample();
        units.insert(0, unit("DAIRE 1 (eski)", CanonicalKey::Number(1)));

        let ordered = order_units(units, &DisplayOrder::from_numbers([1]));
        assert_eq!(
            names(&ordered),
            ["DAIRE 1 (eski)", "DAIRE 1", "DAIRE 2", "LOBI"]
        );
    }

    #[test]
    fn ordering_is_deterministic() {
        let order = DisplayOrder::from_numbers([2]);
        assert_eq!(order_units(sample(), &order), order_units(sample(), &order));
    }
}
