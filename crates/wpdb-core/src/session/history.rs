//! Command history for ↑/↓ recall.
//!
//! Entries are stored most-recent-first. Navigation wraps around at both
//! ends and never returns to the fresh-input position on its own; only a
//! dispatch (or an explicit reset) does that.

use std::collections::VecDeque;

/// Maximum number of remembered commands.
pub const HISTORY_CAPACITY: usize = 10;

/// Bounded, most-recent-first command history with a recall cursor.
#[derive(Debug, Clone, Default)]
pub struct CommandHistory {
    entries: VecDeque<String>,

    /// Current recall position (None = editing fresh input).
    cursor: Option<usize>,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a dispatched command.
    ///
    /// Empty commands and repeats of the most recent entry are skipped.
    /// Returns true if the entry was stored.
    pub fn record(&mut self, command: &str) -> bool {
        if command.is_empty() || self.entries.front().is_some_and(|head| head == command) {
            return false;
        }
        self.entries.push_front(command.to_string());
        self.entries.truncate(HISTORY_CAPACITY);
        true
    }

    /// Returns to the fresh-input position.
    pub fn reset_cursor(&mut self) {
        self.cursor = None;
    }

    /// Moves toward older entries (↑), wrapping to the newest past the end.
    pub fn older(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let next = match self.cursor {
            None => 0,
            Some(idx) if idx + 1 >= self.entries.len() => 0,
            Some(idx) => idx + 1,
        };
        self.cursor = Some(next);
        self.entries.get(next).map(String::as_str)
    }

    /// Moves toward newer entries (↓), wrapping to the oldest past the start.
    pub fn newer(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let last = self.entries.len() - 1;
        let next = match self.cursor {
            None | Some(0) => last,
            Some(idx) if idx > last => 0,
            Some(idx) => idx - 1,
        };
        self.cursor = Some(next);
        self.entries.get(next).map(String::as_str)
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Entry at `idx`, 0 being the most recent.
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.entries.get(idx).map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
