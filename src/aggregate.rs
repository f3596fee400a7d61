use serde::Serialize;

/// Counts of cells that did not add to a column total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CellDiagnostics {
    /// Empty cells and the `-` placeholder.
    pub blank: usize,
    /// Text that is not a finite number.
    pub non_numeric: usize,
    /// Zero and negative readings.
    pub non_positive: usize,
}

impl CellDiagnostics {
    pub fn dropped(&self) -> usize {
        self.blank + self.non_numeric + self.non_positive
    }
}

/// Monthly total of one column along with what was left out of it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ColumnTotal {
    pub watt_hours: f64,
    pub diagnostics: CellDiagnostics,
}

enum Cell {
    Blank,
    NonNumeric,
    Value(f64),
}

fn coerce(cell: &str) -> Cell {
    let trimmed = cell.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return Cell::Blank;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Cell::Value(value),
        _ => Cell::NonNumeric,
    }
}

/// Sums the strictly positive readings of one column.
///
/// Blank, non-numeric, zero and negative cells contribute nothing. Meters do
/// not run backwards, so negative deltas are sensor noise.
pub fn aggregate_column<'a>(cells: impl IntoIterator<Item = &'a str>) -> ColumnTotal {
    let mut total = ColumnTotal::default();
    for cell in cells {
        match coerce(cell) {
            Cell::Value(value) if value > 0.0 => total.watt_hours += value,
            Cell::Value(_) => total.diagnostics.non_positive += 1,
            Cell::Blank => total.diagnostics.blank += 1,
            Cell::NonNumeric => total.diagnostics.non_numeric += 1,
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_cells_contribute_nothing() {
        for cell in ["-3", "-", "", "  ", "abc", "0", "NaN", "inf"] {
            assert_eq!(aggregate_column([cell]).watt_hours, 0.0, "{cell:?}");
        }
        assert_eq!(aggregate_column([" 7.5 "]).watt_hours, 7.5);
    }

    #[test]
    fn totals_only_positive_values() {
        let total = aggregate_column(["5", "-3", "-", "", "x", "0", "2.5"]);

        assert_eq!(total.watt_hours, 7.5);
        assert_eq!(
            total.diagnostics,
            CellDiagnostics {
                blank: 2,
                non_numeric: 1,
                non_positive: 2,
            }
        );
        assert_eq!(total.diagnostics.dropped(), 5);
    }

    #[test]
    fn empty_column_totals_zero() {
        let total = aggregate_column(std::iter::empty());
        assert_eq!(total, ColumnTotal::default());
    }
}
