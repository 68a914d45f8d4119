//! Session controller for interactive table cleaning.
//!
//! A [`Session`] owns the loaded table, the ordered header list, the column
//! selection, a linear undo/redo [`History`] of table snapshots, and an
//! append-only cleaning log. Cleaning operations are dispatched through
//! [`Session::apply`] as [`Action`] values; each successful action commits
//! one snapshot and one log line.
//!
//! ```
//! use scrubtable_session::{Action, Session};
//! use scrubtable_table::Table;
//!
//! let (table, headers) = Table::from_csv_str("name\n  Ada  \n").unwrap();
//! let mut session = Session::load("people", table, headers);
//! session.apply(Action::TrimSpaces).unwrap();
//! assert!(session.can_undo());
//! ```

mod history;
mod session;

pub use history::History;
pub use session::{Action, LogEntry, Result, Session, SessionError, ViewState};
