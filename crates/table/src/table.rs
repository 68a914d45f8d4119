use crate::cell::CellValue;
use indexmap::IndexMap;

/// A row is an ordered mapping from column name to cell value.
///
/// A row's key set is always a subset of the session's header list; columns
/// absent from a row read as `CellValue::Null`.
pub type Row = IndexMap<String, CellValue>;

static NULL_CELL: CellValue = CellValue::Null;

/// An ordered sequence of rows, the unit operated on by every transform.
///
/// The authoritative column order (the header list) is tracked by the caller,
/// not by the table itself; operations that add columns hand back an updated
/// header list alongside the new table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Table { rows: Vec::new() }
    }

    /// Create a table from a sequence of rows
    #[must_use]
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Table { rows }
    }

    /// Get the number of rows
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the rows as a slice
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Consume the table, returning its rows
    #[must_use]
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Get a cell by row index and column name; absent keys read as null
    #[must_use]
    pub fn cell(&self, row: usize, column: &str) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&NULL_CELL)
    }

    /// Iterate a column's cells in row order; absent keys read as null
    pub fn column<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a CellValue> + 'a {
        self.rows
            .iter()
            .map(move |row| row.get(column).unwrap_or(&NULL_CELL))
    }

    /// Build a new table by mapping every row through `f`
    #[must_use]
    pub fn map_rows<F>(&self, f: F) -> Table
    where
        F: Fn(&Row) -> Row,
    {
        Table {
            rows: self.rows.iter().map(f).collect(),
        }
    }

    /// Build a new table keeping only the rows matching `predicate`
    #[must_use]
    pub fn filter_rows<F>(&self, predicate: F) -> Table
    where
        F: Fn(&Row) -> bool,
    {
        Table {
            rows: self.rows.iter().filter(|r| predicate(r)).cloned().collect(),
        }
    }

    /// Canonical serialization key for a row, used to detect duplicates.
    ///
    /// Fields are encoded in header order with a type prefix so that e.g. the
    /// string "1" and the integer 1 produce distinct keys.
    #[must_use]
    pub fn canonical_key(row: &Row, headers: &[String]) -> String {
        let mut key = String::new();
        for header in headers {
            let cell = row.get(header).unwrap_or(&NULL_CELL);
            match cell {
                CellValue::Null => key.push('N'),
                CellValue::Bool(b) => {
                    key.push('B');
                    key.push_str(&b.to_string());
                }
                CellValue::Int(i) => {
                    key.push('I');
                    key.push_str(&i.to_string());
                }
                CellValue::Float(f) => {
                    key.push('F');
                    key.push_str(&format!("{f:?}"));
                }
                CellValue::String(s) => {
                    key.push('S');
                    key.push_str(s);
                }
            }
            key.push('\x1f');
        }
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, CellValue)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_absent_key_reads_null() {
        let table = Table::from_rows(vec![row(&[("name", CellValue::from("Alice"))])]);
        assert!(table.cell(0, "age").is_null());
        assert!(table.cell(5, "name").is_null());
    }

    #[test]
    fn test_canonical_key_type_sensitive() {
        let headers = vec!["a".to_string()];
        let as_int = row(&[("a", CellValue::Int(1))]);
        let as_str = row(&[("a", CellValue::from("1"))]);
        assert_ne!(
            Table::canonical_key(&as_int, &headers),
            Table::canonical_key(&as_str, &headers)
        );
    }

    #[test]
    fn test_canonical_key_header_order() {
        // Rows with the same cells in different insertion order collide.
        let headers = vec!["a".to_string(), "b".to_string()];
        let ab = row(&[("a", CellValue::Int(1)), ("b", CellValue::Int(2))]);
        let ba = row(&[("b", CellValue::Int(2)), ("a", CellValue::Int(1))]);
        assert_eq!(
            Table::canonical_key(&ab, &headers),
            Table::canonical_key(&ba, &headers)
        );
    }

    #[test]
    fn test_filter_rows() {
        let table = Table::from_rows(vec![
            row(&[("n", CellValue::Int(1))]),
            row(&[("n", CellValue::Int(2))]),
        ]);
        let kept = table.filter_rows(|r| r.get("n") == Some(&CellValue::Int(2)));
        assert_eq!(kept.row_count(), 1);
        assert_eq!(table.row_count(), 2);
    }
}
