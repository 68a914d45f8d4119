//! Per-column summary statistics for display surfaces.

use crate::ops::parse_numeric;
use scrubtable_table::{CellValue, Table};
use serde::Serialize;
use std::collections::HashSet;

/// Summary statistics for one column.
///
/// `min`, `max` and `avg` are present only when the column holds at least
/// one parseable number; `avg` is rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
    pub count: usize,
    pub unique: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub avg: Option<f64>,
}

/// Compute statistics over a column's non-missing values.
#[must_use]
pub fn column_stats(table: &Table, column: &str) -> ColumnStats {
    let values: Vec<&CellValue> = table
        .column(column)
        .filter(|v| !v.is_missing())
        .collect();

    let unique: HashSet<String> = values
        .iter()
        .map(|v| {
            // Type-prefixed so the string "1" and the integer 1 stay distinct
            match v {
                CellValue::Null => "N".to_string(),
                CellValue::Bool(b) => format!("B{b}"),
                CellValue::Int(i) => format!("I{i}"),
                CellValue::Float(f) => format!("F{f:?}"),
                CellValue::String(s) => format!("S{s}"),
            }
        })
        .collect();

    let numeric: Vec<f64> = values.iter().filter_map(|v| parse_numeric(*v)).collect();

    let (min, max, avg) = if numeric.is_empty() {
        (None, None, None)
    } else {
        let min = numeric.iter().copied().fold(f64::INFINITY, f64::min);
        let max = numeric.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = numeric.iter().sum::<f64>() / numeric.len() as f64;
        (Some(min), Some(max), Some((mean * 100.0).round() / 100.0))
    };

    ColumnStats {
        count: values.len(),
        unique: unique.len(),
        min,
        max,
        avg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrubtable_table::Table;

    #[test]
    fn test_numeric_column() {
        let (table, _) = Table::from_csv_str("n\n1\n2\n2\n4").unwrap();
        let stats = column_stats(&table, "n");
        assert_eq!(stats.count, 4);
        assert_eq!(stats.unique, 3);
        assert_eq!(stats.min, Some(1.0));
        assert_eq!(stats.max, Some(4.0));
        assert_eq!(stats.avg, Some(2.25));
    }

    #[test]
    fn test_text_column_has_no_numeric_stats() {
        let (table, _) = Table::from_csv_str("c\nx\ny\n").unwrap();
        let stats = column_stats(&table, "c");
        assert_eq!(stats.count, 2);
        assert_eq!(stats.unique, 2);
        assert_eq!(stats.min, None);
        assert_eq!(stats.avg, None);
    }
}
