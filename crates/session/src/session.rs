use crate::history::History;
use chrono::{DateTime, Local};
use scrubtable_clean::{analyze, ops, AnalysisReport, CaseMode, SortDirection};
use scrubtable_table::{Row, Table, TableError};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// One line of the cleaning log: `{timestamp, message}`.
///
/// The log is append-only; undo never rolls it back.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub time: DateTime<Local>,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.time.format("%H:%M:%S"), self.message)
    }
}

/// View-only state: never part of undo history.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub search_query: String,
    pub sort_column: Option<String>,
    pub sort_direction: SortDirection,
    pub dark_mode: bool,
}

/// A cleaning action, as invoked from the UI surface.
///
/// Scoped actions operate on the session's current column selection.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    RemoveDuplicates,
    TrimSpaces,
    ChangeCase(CaseMode),
    RemoveMissingRows,
    FillMissing { value: String },
    FindReplace { find: String, replace: String },
    RemoveSpecialChars,
    ExtractNumbers,
    ExtractText,
    SplitColumn { delimiter: String },
    MergeColumns { separator: String },
    FormatDates,
    RemoveOutliers,
    ValidateEmails,
    FormatPhoneNumbers,
    Sort { column: String },
}

/// User-visible validation failures.
///
/// These block the operation before any mutation: no table change, no
/// history commit.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No dataset is loaded")]
    NoTable,

    #[error("Please select at least one column first")]
    NoSelection,

    #[error("Please select exactly one column to split")]
    SplitNeedsOneColumn,

    #[error("Please select at least two columns to merge")]
    MergeNeedsTwoColumns,

    #[error("Please enter a value to fill")]
    EmptyFillValue,

    #[error("Please enter text to find")]
    EmptyFindText,

    #[error("Please enter a delimiter")]
    EmptyDelimiter,

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error(transparent)]
    Table(#[from] TableError),
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// The session controller: owns the header list, column selection, history,
/// cleaning log and view state, and exposes the operation catalog to the
/// surrounding UI.
#[derive(Debug, Clone, Default)]
pub struct Session {
    name: String,
    headers: Vec<String>,
    selected: Vec<String>,
    history: History,
    log: Vec<LogEntry>,
    analysis: Option<AnalysisReport>,
    view: ViewState,
}

impl Session {
    /// Install a freshly loaded table and run the quality analysis once.
    #[must_use]
    pub fn load(name: &str, table: Table, headers: Vec<String>) -> Self {
        tracing::debug!(rows = table.row_count(), columns = headers.len(), "loading dataset");
        let analysis = analyze(&table, &headers);
        Session {
            name: name.to_string(),
            headers,
            selected: Vec::new(),
            history: History::start(table),
            log: Vec::new(),
            analysis: Some(analysis),
            view: ViewState::default(),
        }
    }

    /// The dataset name (used for export sheet naming)
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The authoritative, ordered column list
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// The table currently shown, or `None` after a reset
    #[must_use]
    pub fn current(&self) -> Option<&Table> {
        self.history.current()
    }

    /// The currently selected columns, in selection order
    #[must_use]
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    /// The cached analysis report from load time (or the last explicit
    /// [`Session::analyze`] call)
    #[must_use]
    pub fn analysis(&self) -> Option<&AnalysisReport> {
        self.analysis.as_ref()
    }

    /// The append-only cleaning log
    #[must_use]
    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// View-only state (search, sort indicator, dark mode)
    #[must_use]
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Toggle a column in the selection set
    pub fn toggle_selection(&mut self, column: &str) -> Result<()> {
        if !self.headers.iter().any(|h| h == column) {
            return Err(SessionError::UnknownColumn(column.to_string()));
        }
        if let Some(pos) = self.selected.iter().position(|c| c == column) {
            self.selected.remove(pos);
        } else {
            self.selected.push(column.to_string());
        }
        Ok(())
    }

    /// Replace the selection set, validating every name
    pub fn set_selection(&mut self, columns: Vec<String>) -> Result<()> {
        for column in &columns {
            if !self.headers.iter().any(|h| h == column) {
                return Err(SessionError::UnknownColumn(column.clone()));
            }
        }
        self.selected = columns;
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Apply a cleaning action to the current table.
    ///
    /// Preconditions are enforced first; on failure nothing is mutated and
    /// the error carries the user-visible message. On success the new
    /// snapshot is committed (discarding any redo tail), the action is
    /// logged, and the log message is returned. `ValidateEmails` is
    /// read-only and never commits.
    pub fn apply(&mut self, action: Action) -> Result<String> {
        let table = self.history.current().ok_or(SessionError::NoTable)?;
        tracing::debug!(?action, "applying action");

        let scoped = &self.selected;
        let message;
        let mut new_headers = None;

        let new_table = match &action {
            Action::RemoveDuplicates => {
                let (result, removed) = ops::remove_duplicates(table, &self.headers);
                message = format!("Removed {removed} duplicate rows");
                result
            }
            Action::TrimSpaces => {
                let result = ops::trim_spaces(table, &self.headers);
                message = "Trimmed spaces in all columns".to_string();
                result
            }
            Action::ChangeCase(mode) => {
                Self::require_selection(scoped)?;
                let result = ops::change_case(table, scoped, *mode);
                message = format!(
                    "Changed case to {} in {} column(s)",
                    mode.as_str(),
                    scoped.len()
                );
                result
            }
            Action::RemoveMissingRows => {
                Self::require_selection(scoped)?;
                let (result, removed) = ops::remove_missing_rows(table, scoped);
                message = format!(
                    "Removed {removed} rows with missing values in {} column(s)",
                    scoped.len()
                );
                result
            }
            Action::FillMissing { value } => {
                Self::require_selection(scoped)?;
                if value.trim().is_empty() {
                    return Err(SessionError::EmptyFillValue);
                }
                let result = ops::fill_missing(table, scoped, value);
                message = format!(
                    "Filled missing values in {} column(s) with \"{value}\"",
                    scoped.len()
                );
                result
            }
            Action::FindReplace { find, replace } => {
                Self::require_selection(scoped)?;
                if find.trim().is_empty() {
                    return Err(SessionError::EmptyFindText);
                }
                let result = ops::find_replace(table, scoped, find, replace);
                message = format!(
                    "Replaced \"{find}\" with \"{replace}\" in {} column(s)",
                    scoped.len()
                );
                result
            }
            Action::RemoveSpecialChars => {
                Self::require_selection(scoped)?;
                let result = ops::remove_special_chars(table, scoped);
                message = format!("Removed special characters from {} column(s)", scoped.len());
                result
            }
            Action::ExtractNumbers => {
                Self::require_selection(scoped)?;
                let result = ops::extract_numbers(table, scoped);
                message = format!("Extracted numbers from {} column(s)", scoped.len());
                result
            }
            Action::ExtractText => {
                Self::require_selection(scoped)?;
                let result = ops::extract_text(table, scoped);
                message = format!("Extracted text from {} column(s)", scoped.len());
                result
            }
            Action::SplitColumn { delimiter } => {
                if scoped.len() != 1 {
                    return Err(SessionError::SplitNeedsOneColumn);
                }
                if delimiter.is_empty() {
                    return Err(SessionError::EmptyDelimiter);
                }
                let column = &scoped[0];
                let (result, headers) =
                    ops::split_column(table, column, delimiter, &self.headers);
                message = format!("Split column \"{column}\" by delimiter \"{delimiter}\"");
                new_headers = Some(headers);
                result
            }
            Action::MergeColumns { separator } => {
                if scoped.len() < 2 {
                    return Err(SessionError::MergeNeedsTwoColumns);
                }
                let (result, headers) =
                    ops::merge_columns(table, scoped, separator, &self.headers);
                message = format!(
                    "Merged {} columns into \"{}\"",
                    scoped.len(),
                    scoped.join("_")
                );
                new_headers = Some(headers);
                result
            }
            Action::FormatDates => {
                Self::require_selection(scoped)?;
                let result = ops::format_dates(table, scoped);
                message = format!("Formatted dates in {} column(s) to YYYY-MM-DD", scoped.len());
                result
            }
            Action::RemoveOutliers => {
                Self::require_selection(scoped)?;
                let result = ops::remove_outliers(table, scoped);
                message = format!("Removed outliers from {} column(s)", scoped.len());
                result
            }
            Action::ValidateEmails => {
                // Read-only: reports a count, no history commit
                Self::require_selection(scoped)?;
                let invalid = ops::validate_emails(table, scoped)?;
                self.add_log(format!(
                    "Validated {} column(s) for email format",
                    scoped.len()
                ));
                return Ok(format!(
                    "Found {invalid} invalid email(s) in selected column(s)"
                ));
            }
            Action::FormatPhoneNumbers => {
                Self::require_selection(scoped)?;
                let result = ops::format_phone_numbers(table, scoped);
                message = format!("Formatted phone numbers in {} column(s)", scoped.len());
                result
            }
            Action::Sort { column } => {
                if !self.headers.iter().any(|h| h == column) {
                    return Err(SessionError::UnknownColumn(column.clone()));
                }
                let direction = if self.view.sort_column.as_deref() == Some(column) {
                    self.view.sort_direction.toggled()
                } else {
                    SortDirection::Ascending
                };
                let result = ops::sort_by_column(table, column, direction);
                message = format!("Sorted by \"{column}\" ({})", direction.as_str());
                self.view.sort_column = Some(column.clone());
                self.view.sort_direction = direction;
                result
            }
        };

        if let Some(headers) = new_headers {
            self.headers = headers;
        }
        self.history.commit(new_table);
        self.add_log(message.clone());
        Ok(message)
    }

    /// Step back one snapshot; a no-op at the oldest entry
    pub fn undo(&mut self) -> bool {
        let moved = self.history.undo();
        if moved {
            self.add_log("Undo: Reverted last change".to_string());
        }
        moved
    }

    /// Step forward one snapshot; a no-op at the newest entry
    pub fn redo(&mut self) -> bool {
        let moved = self.history.redo();
        if moved {
            self.add_log("Redo: Reapplied change".to_string());
        }
        moved
    }

    /// Recompute the quality analysis from the current table
    pub fn analyze(&mut self) -> Result<&AnalysisReport> {
        let table = self.history.current().ok_or(SessionError::NoTable)?;
        Ok(self.analysis.insert(analyze(table, &self.headers)))
    }

    /// Rows matching the view's search query, case-insensitively, across
    /// every cell; all rows when the query is empty
    #[must_use]
    pub fn filtered_rows(&self) -> Vec<&Row> {
        let Some(table) = self.history.current() else {
            return Vec::new();
        };
        if self.view.search_query.is_empty() {
            return table.rows().iter().collect();
        }
        let needle = self.view.search_query.to_lowercase();
        table
            .rows()
            .iter()
            .filter(|row| {
                row.values()
                    .any(|cell| cell.as_str().to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Export the current table as CSV
    pub fn export_csv<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let table = self.history.current().ok_or(SessionError::NoTable)?;
        table.save_as_csv(path, &self.headers)?;
        self.add_log("Exported to CSV".to_string());
        Ok(())
    }

    /// Export the current table as pretty-printed JSON
    pub fn export_json<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let table = self.history.current().ok_or(SessionError::NoTable)?;
        table.save_as_json(path, &self.headers)?;
        self.add_log("Exported to JSON".to_string());
        Ok(())
    }

    /// Export the current table as a one-sheet workbook named for the
    /// dataset
    pub fn export_xlsx<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let table = self.history.current().ok_or(SessionError::NoTable)?;
        table.save_as_xlsx(path, &self.headers, &self.name)?;
        self.add_log("Exported to Excel".to_string());
        Ok(())
    }

    /// Tear the session down: no current table, empty history and log
    pub fn reset(&mut self) {
        tracing::debug!("resetting session");
        self.name.clear();
        self.headers.clear();
        self.selected.clear();
        self.history.reset();
        self.log.clear();
        self.analysis = None;
        self.view = ViewState::default();
    }

    fn require_selection(selected: &[String]) -> Result<()> {
        if selected.is_empty() {
            Err(SessionError::NoSelection)
        } else {
            Ok(())
        }
    }

    fn add_log(&mut self, message: String) {
        self.log.push(LogEntry {
            time: Local::now(),
            message,
        });
    }
}
