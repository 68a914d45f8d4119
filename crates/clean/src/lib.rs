//! Cleaning operations and quality analysis for scrubtable
//!
//! The transform catalog in [`ops`] contains one pure function per cleaning
//! action; [`analyze`] produces the heuristic quality report that drives the
//! reported issue list and score; [`column_stats`] summarizes one column.
//!
//! # Examples
//!
//! ```
//! use scrubtable_clean::{analyze, ops};
//! use scrubtable_table::Table;
//!
//! let (table, headers) = Table::from_csv_str("name\n\"Bob \"\nBob").unwrap();
//!
//! let report = analyze(&table, &headers);
//! assert_eq!(report.issues.len(), 1); // extra spaces in "name"
//!
//! let trimmed = ops::trim_spaces(&table, &headers);
//! let (deduped, removed) = ops::remove_duplicates(&trimmed, &headers);
//! assert_eq!(removed, 1);
//! assert_eq!(deduped.row_count(), 1);
//! ```

mod analyze;
pub mod ops;
mod stats;

/// Re-export the analyzer and its report types.
pub use analyze::{analyze, AnalysisReport, Issue, Severity};
/// Re-export operation parameter types.
pub use ops::{CaseMode, SortDirection};
/// Re-export column statistics.
pub use stats::{column_stats, ColumnStats};
