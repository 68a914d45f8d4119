//! The transform operation catalog.
//!
//! Every operation is a pure function taking the current table (plus column
//! selection and parameters where applicable) and returning a new table; none
//! mutate their input. Operations that change the column set also return the
//! updated header list. Per-cell failures (unparseable dates or numbers) are
//! skipped silently, never aborting the operation.

use regex::Regex;
use scrubtable_table::{CellValue, Result, Row, Table, TableError};
use std::collections::HashSet;

/// Case folding mode for the change-case operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseMode {
    Upper,
    Lower,
    Proper,
}

impl CaseMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CaseMode::Upper => "upper",
            CaseMode::Lower => "lower",
            CaseMode::Proper => "proper",
        }
    }
}

/// Sort direction for the single-column sort operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

/// Numeric reading of a cell for outlier detection and statistics.
///
/// Booleans deliberately do not coerce; only actual numbers and numeric
/// strings participate.
pub(crate) fn parse_numeric(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Int(i) => Some(*i as f64),
        CellValue::Float(f) => Some(*f),
        CellValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn collapse_whitespace(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last_was_space = false;
    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                out.push(' ');
                last_was_space = true;
            }
        } else {
            out.push(ch);
            last_was_space = false;
        }
    }
    out
}

fn map_string_cells<F>(table: &Table, columns: &[String], f: F) -> Table
where
    F: Fn(&str) -> String,
{
    table.map_rows(|row| {
        let mut new_row = row.clone();
        for column in columns {
            if let Some(CellValue::String(s)) = row.get(column) {
                new_row.insert(column.clone(), CellValue::String(f(s)));
            }
        }
        new_row
    })
}

/// Keep the first occurrence per canonical-serialization key, dropping later
/// duplicates. Returns the new table and the number of rows removed.
#[must_use]
pub fn remove_duplicates(table: &Table, headers: &[String]) -> (Table, usize) {
    let mut seen = HashSet::new();
    let mut rows = Vec::with_capacity(table.row_count());
    for row in table.rows() {
        if seen.insert(Table::canonical_key(row, headers)) {
            rows.push(row.clone());
        }
    }
    let removed = table.row_count() - rows.len();
    (Table::from_rows(rows), removed)
}

/// Trim outer whitespace and collapse internal whitespace runs to a single
/// space, for every string cell in the table.
#[must_use]
pub fn trim_spaces(table: &Table, headers: &[String]) -> Table {
    map_string_cells(table, headers, collapse_whitespace)
}

/// Change the case of string cells in the selected columns.
#[must_use]
pub fn change_case(table: &Table, columns: &[String], mode: CaseMode) -> Table {
    map_string_cells(table, columns, |s| match mode {
        CaseMode::Upper => s.to_uppercase(),
        CaseMode::Lower => s.to_lowercase(),
        CaseMode::Proper => proper_case(s),
    })
}

// Lowercase, then capitalize the first letter of each space-separated token.
fn proper_case(s: &str) -> String {
    s.to_lowercase()
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Drop rows where any of the given columns' cells is missing, applied
/// sequentially per column. Returns the new table and the number of rows
/// removed in total.
#[must_use]
pub fn remove_missing_rows(table: &Table, columns: &[String]) -> (Table, usize) {
    let mut result = table.clone();
    for column in columns {
        result = result.filter_rows(|row| {
            !row.get(column).unwrap_or(&CellValue::Null).is_missing()
        });
    }
    let removed = table.row_count() - result.row_count();
    (result, removed)
}

/// Replace missing cells in the selected columns with the fill value.
#[must_use]
pub fn fill_missing(table: &Table, columns: &[String], fill: &str) -> Table {
    table.map_rows(|row| {
        let mut new_row = row.clone();
        for column in columns {
            if row.get(column).unwrap_or(&CellValue::Null).is_missing() {
                new_row.insert(column.clone(), CellValue::String(fill.to_string()));
            }
        }
        new_row
    })
}

/// Literal global substring replacement over string cells in the selected
/// columns.
#[must_use]
pub fn find_replace(table: &Table, columns: &[String], find: &str, replace: &str) -> Table {
    map_string_cells(table, columns, |s| s.replace(find, replace))
}

/// Strip every character that is not an ASCII letter, an ASCII digit, or
/// whitespace.
#[must_use]
pub fn remove_special_chars(table: &Table, columns: &[String]) -> Table {
    map_string_cells(table, columns, |s| {
        s.chars()
            .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
            .collect()
    })
}

/// Replace each string cell with the concatenation of all its digit runs;
/// empty string if it contains none.
#[must_use]
pub fn extract_numbers(table: &Table, columns: &[String]) -> Table {
    map_string_cells(table, columns, |s| {
        s.chars().filter(char::is_ascii_digit).collect()
    })
}

/// Remove all digit characters from string cells.
#[must_use]
pub fn extract_text(table: &Table, columns: &[String]) -> Table {
    map_string_cells(table, columns, |s| {
        s.chars().filter(|c| !c.is_ascii_digit()).collect()
    })
}

/// Split a column's string values by a delimiter into new `name_1..name_k`
/// columns, each part trimmed. The new header names are inserted immediately
/// after the source column; `k` is the maximum part count across all rows and
/// only names not already present are inserted. Non-string values contribute
/// zero parts.
#[must_use]
pub fn split_column(
    table: &Table,
    column: &str,
    delimiter: &str,
    headers: &[String],
) -> (Table, Vec<String>) {
    let mut max_parts = 0usize;
    let new_table = table.map_rows(|row| {
        let mut new_row = row.clone();
        if let Some(CellValue::String(s)) = row.get(column) {
            for (idx, part) in s.split(delimiter).enumerate() {
                new_row.insert(
                    format!("{column}_{}", idx + 1),
                    CellValue::String(part.trim().to_string()),
                );
            }
        }
        new_row
    });

    for row in table.rows() {
        if let Some(CellValue::String(s)) = row.get(column) {
            max_parts = max_parts.max(s.split(delimiter).count());
        }
    }

    let mut new_headers = headers.to_vec();
    let insert_index = headers
        .iter()
        .position(|h| h == column)
        .map_or(0, |p| p + 1);
    for i in 1..=max_parts {
        let name = format!("{column}_{i}");
        if !new_headers.contains(&name) {
            let idx = (insert_index + i - 1).min(new_headers.len());
            new_headers.insert(idx, name);
        }
    }

    (new_table, new_headers)
}

/// Merge the selected columns into a new column named by joining the
/// selected names with `_`; missing cells contribute the empty string. The
/// new name is appended to the header list if not already present.
#[must_use]
pub fn merge_columns(
    table: &Table,
    columns: &[String],
    separator: &str,
    headers: &[String],
) -> (Table, Vec<String>) {
    let new_name = columns.join("_");
    let new_table = table.map_rows(|row| {
        let mut new_row = row.clone();
        let merged: Vec<String> = columns
            .iter()
            .map(|column| {
                let cell = row.get(column).unwrap_or(&CellValue::Null);
                if cell.is_missing() {
                    String::new()
                } else {
                    cell.as_str()
                }
            })
            .collect();
        new_row.insert(new_name.clone(), CellValue::String(merged.join(separator)));
        new_row
    });

    let mut new_headers = headers.to_vec();
    if !new_headers.contains(&new_name) {
        new_headers.push(new_name);
    }

    (new_table, new_headers)
}

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d %b %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

fn parse_date(s: &str) -> Option<chrono::NaiveDate> {
    let trimmed = s.trim();
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| chrono::NaiveDate::parse_from_str(trimmed, fmt).ok())
}

/// Rewrite parseable date strings as `YYYY-MM-DD`; unparseable or non-string
/// cells are left unchanged.
#[must_use]
pub fn format_dates(table: &Table, columns: &[String]) -> Table {
    table.map_rows(|row| {
        let mut new_row = row.clone();
        for column in columns {
            if let Some(CellValue::String(s)) = row.get(column) {
                if let Some(date) = parse_date(s) {
                    new_row.insert(
                        column.clone(),
                        CellValue::String(date.format("%Y-%m-%d").to_string()),
                    );
                }
            }
        }
        new_row
    })
}

/// Blank cells outside the IQR fences, per selected column.
///
/// Q1 and Q3 are taken by index (`floor(n*0.25)` / `floor(n*0.75)`) on the
/// ascending-sorted numeric subsequence; fences are Q1/Q3 ∓/± 1.5·IQR. A
/// column with no numeric values is skipped entirely; non-numeric cells are
/// unaffected.
#[must_use]
pub fn remove_outliers(table: &Table, columns: &[String]) -> Table {
    let mut rows: Vec<Row> = table.rows().to_vec();
    for column in columns {
        let mut numeric: Vec<f64> = rows
            .iter()
            .filter_map(|row| row.get(column).and_then(parse_numeric))
            .collect();
        if numeric.is_empty() {
            continue;
        }
        numeric.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let q1 = numeric[(numeric.len() as f64 * 0.25).floor() as usize];
        let q3 = numeric[(numeric.len() as f64 * 0.75).floor() as usize];
        let iqr = q3 - q1;
        let lower_bound = q1 - 1.5 * iqr;
        let upper_bound = q3 + 1.5 * iqr;

        for row in &mut rows {
            if let Some(value) = row.get(column).and_then(parse_numeric) {
                if value < lower_bound || value > upper_bound {
                    row.insert(column.clone(), CellValue::String(String::new()));
                }
            }
        }
    }
    Table::from_rows(rows)
}

/// Count cells in the selected columns that are non-missing and fail the
/// `local@domain.tld` email pattern. Read-only: reports a count and performs
/// no mutation, so it never enters history.
pub fn validate_emails(table: &Table, columns: &[String]) -> Result<usize> {
    let email_regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
        .map_err(|e| TableError::Parse(format!("Invalid email validation regex: {e}")))?;

    let mut invalid = 0usize;
    for row in table.rows() {
        for column in columns {
            let cell = row.get(column).unwrap_or(&CellValue::Null);
            if !cell.is_missing() && !email_regex.is_match(&cell.as_str()) {
                invalid += 1;
            }
        }
    }
    Ok(invalid)
}

/// Strip non-digits from string cells; values with exactly 10 digits are
/// reformatted as `(XXX) XXX-XXXX`, anything else is left unchanged.
#[must_use]
pub fn format_phone_numbers(table: &Table, columns: &[String]) -> Table {
    map_string_cells(table, columns, |s| {
        let digits: String = s.chars().filter(char::is_ascii_digit).collect();
        if digits.len() == 10 {
            format!("({}) {}-{}", &digits[0..3], &digits[3..6], &digits[6..])
        } else {
            s.to_string()
        }
    })
}

/// Stable sort of the whole table by one column's raw cell values.
#[must_use]
pub fn sort_by_column(table: &Table, column: &str, direction: SortDirection) -> Table {
    let mut rows: Vec<Row> = table.rows().to_vec();
    rows.sort_by(|a, b| {
        let left = a.get(column).unwrap_or(&CellValue::Null);
        let right = b.get(column).unwrap_or(&CellValue::Null);
        let ordering = left.compare(right);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
    Table::from_rows(rows)
}
