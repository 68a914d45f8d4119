//! The heuristic data-quality analyzer.
//!
//! `analyze` is a pure function from a table (plus header list) to a report
//! of detected issues and an overall quality score. The heuristics and their
//! problem-cell weightings are part of the observable contract and are kept
//! as-is rather than replaced with statistically sharper measures.

use scrubtable_table::{CellValue, Table};
use serde::Serialize;
use std::collections::HashSet;

/// Severity of a detected data-quality issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
}

/// A single detected issue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub severity: Severity,
    pub title: String,
    pub count: usize,
    pub description: String,
}

/// The quality assessment for one table snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub total_rows: usize,
    pub total_columns: usize,
    pub issues: Vec<Issue>,
    pub quality_score: u8,
}

/// Analyze a table against its header list.
///
/// Issue order is deterministic: the duplicate scan first, then per column in
/// header order, each column's missing/case/space checks in that fixed order.
#[must_use]
pub fn analyze(table: &Table, headers: &[String]) -> AnalysisReport {
    let total_rows = table.row_count();
    let total_columns = headers.len();
    let total_cells = total_rows * total_columns;

    let mut issues = Vec::new();
    let mut problem_cells = 0usize;

    let unique: HashSet<String> = table
        .rows()
        .iter()
        .map(|row| Table::canonical_key(row, headers))
        .collect();
    let duplicates = total_rows - unique.len();
    if duplicates > 0 {
        issues.push(Issue {
            severity: Severity::Critical,
            title: "Duplicate Rows Found".to_string(),
            count: duplicates,
            description: format!("{duplicates} duplicate rows detected"),
        });
        problem_cells += duplicates * total_columns;
    }

    for header in headers {
        let values: Vec<&CellValue> = table.column(header).collect();

        let null_count = values.iter().filter(|v| v.is_missing()).count();
        if null_count > 0 {
            let percentage = (null_count as f64 / total_rows as f64) * 100.0;
            issues.push(Issue {
                severity: Severity::High,
                title: format!("Missing Values in \"{header}\""),
                count: null_count,
                description: format!("{null_count} missing values ({percentage:.1}%)"),
            });
            problem_cells += null_count;
        }

        let string_values: Vec<&str> = values
            .iter()
            .filter_map(|v| match v {
                CellValue::String(s) if !s.is_empty() => Some(s.as_str()),
                _ => None,
            })
            .collect();

        // Mixed-case heuristic: the column holds at least one string that is
        // entirely uppercase-invariant and one entirely lowercase-invariant.
        // Deliberately a proxy, not a per-cell count.
        let has_upper = string_values
            .iter()
            .any(|s| *s == s.to_uppercase() && *s != s.to_lowercase());
        let has_lower = string_values
            .iter()
            .any(|s| *s == s.to_lowercase() && *s != s.to_uppercase());
        if has_upper && has_lower && string_values.len() > 5 {
            let inconsistent_count = string_values.len();
            issues.push(Issue {
                severity: Severity::Medium,
                title: format!("Inconsistent Case in \"{header}\""),
                count: inconsistent_count,
                description: "Mixed uppercase and lowercase values found".to_string(),
            });
            problem_cells += (inconsistent_count as f64 * 0.3).floor() as usize;
        }

        let spaces_count = string_values
            .iter()
            .filter(|s| **s != s.trim() || s.contains("  "))
            .count();
        if spaces_count > 0 {
            issues.push(Issue {
                severity: Severity::Medium,
                title: format!("Extra Spaces in \"{header}\""),
                count: spaces_count,
                description: "Leading, trailing, or double spaces detected".to_string(),
            });
            problem_cells += (spaces_count as f64 * 0.5).floor() as usize;
        }
    }

    let quality_score = if total_cells == 0 {
        100
    } else {
        let score = 100.0 - (problem_cells as f64 / total_cells as f64) * 100.0;
        score.round().clamp(0.0, 100.0) as u8
    };

    AnalysisReport {
        total_rows,
        total_columns,
        issues,
        quality_score,
    }
}
