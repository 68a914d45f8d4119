//! Table model and file formats for scrubtable
//!
//! Provides the row/column data structure the cleaning engine operates on,
//! plus CSV, JSON and XLSX import/export.
//!
//! # Examples
//!
//! ```
//! use scrubtable_table::{CellValue, Table};
//!
//! let (table, headers) = Table::from_csv_str("name,age\nAlice,30\nBob,25").unwrap();
//!
//! assert_eq!(headers, vec!["name", "age"]);
//! assert_eq!(table.row_count(), 2);
//! assert_eq!(table.cell(0, "age"), &CellValue::Int(30));
//! ```

mod cell;
mod csv;
mod error;
mod json;
mod table;
mod xlsx;

/// Re-export cell value type.
pub use cell::CellValue;
/// Re-export table error types.
pub use error::{Result, TableError};
/// Re-export table and row types.
pub use table::{Row, Table};
