use scrubtable_table::Table;

/// Linear, branch-discarding undo/redo stack over table snapshots.
///
/// Invariant: `index < entries.len()` whenever the stack is non-empty; the
/// table currently shown is always `entries[index]`. Committing after an
/// undo truncates the redo tail, as in standard linear undo semantics.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<Table>,
    index: usize,
}

impl History {
    /// Create an empty history with no current table
    #[must_use]
    pub fn new() -> Self {
        History {
            entries: Vec::new(),
            index: 0,
        }
    }

    /// Create a history seeded with a single snapshot
    #[must_use]
    pub fn start(initial: Table) -> Self {
        History {
            entries: vec![initial],
            index: 0,
        }
    }

    /// The snapshot currently shown, or `None` if the history is empty
    #[must_use]
    pub fn current(&self) -> Option<&Table> {
        self.entries.get(self.index)
    }

    /// Number of snapshots held
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the history holds no snapshots
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.entries.is_empty() && self.index < self.entries.len() - 1
    }

    /// Truncate any redo tail, append the snapshot, and advance to it.
    /// Always succeeds.
    pub fn commit(&mut self, table: Table) {
        self.entries.truncate(self.index + 1);
        self.entries.push(table);
        self.index = self.entries.len() - 1;
    }

    /// Step back one snapshot; no-op at the oldest entry.
    /// Returns whether anything changed.
    pub fn undo(&mut self) -> bool {
        if self.can_undo() {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// Step forward one snapshot; no-op at the newest entry.
    /// Returns whether anything changed.
    pub fn redo(&mut self) -> bool {
        if self.can_redo() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Drop every snapshot; used on session teardown
    pub fn reset(&mut self) {
        self.entries.clear();
        self.index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrubtable_table::Table;

    fn snapshot(rows: &str) -> Table {
        Table::from_csv_str(&format!("n\n{rows}")).unwrap().0
    }

    #[test]
    fn test_empty_history_has_no_current() {
        let mut history = History::new();
        assert!(history.current().is_none());
        assert!(!history.undo());
        assert!(!history.redo());
    }

    #[test]
    fn test_commit_undo_redo() {
        let mut history = History::start(snapshot("1"));
        history.commit(snapshot("2"));
        history.commit(snapshot("3"));
        assert_eq!(history.len(), 3);

        assert!(history.undo());
        assert_eq!(history.current(), Some(&snapshot("2")));
        assert!(history.undo());
        assert_eq!(history.current(), Some(&snapshot("1")));
        assert!(!history.undo());

        assert!(history.redo());
        assert!(history.redo());
        assert_eq!(history.current(), Some(&snapshot("3")));
        assert!(!history.redo());
    }

    #[test]
    fn test_commit_after_undo_discards_redo_tail() {
        let mut history = History::start(snapshot("1"));
        history.commit(snapshot("2"));
        history.commit(snapshot("3"));
        history.commit(snapshot("4"));

        history.undo();
        history.commit(snapshot("5"));

        // Entry "4" was discarded and replaced; length is 4 again
        assert_eq!(history.len(), 4);
        assert_eq!(history.current(), Some(&snapshot("5")));
        assert!(!history.redo());
    }

    #[test]
    fn test_n_commits_u_undos_r_redos() {
        // After N commits, U undos and R redos (R <= U), the current table
        // equals the table after N-U+R commits from the start.
        let mut history = History::start(snapshot("0"));
        for i in 1..=5 {
            history.commit(snapshot(&i.to_string()));
        }
        for _ in 0..3 {
            assert!(history.undo());
        }
        for _ in 0..2 {
            assert!(history.redo());
        }
        assert_eq!(history.current(), Some(&snapshot("4")));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut history = History::start(snapshot("1"));
        history.commit(snapshot("2"));
        history.reset();
        assert!(history.is_empty());
        assert!(history.current().is_none());
    }
}
