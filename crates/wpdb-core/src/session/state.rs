//! Last-known view of the remote session.
//!
//! Only the reconciler writes here. Front ends read through the accessors
//! and hand `&mut SessionState` to [`crate::reconcile::reconcile`].

use std::collections::BTreeSet;

use super::snapshot::NO_LINE;

/// Display fields refreshed on every snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameView {
    pub dirname: Option<String>,
    pub filename: Option<String>,
    pub listing: String,
    pub globals: String,
    pub locals: String,
    /// Line highlighted in the listing, or [`NO_LINE`].
    pub current_line: i64,
}

impl Default for FrameView {
    fn default() -> Self {
        Self {
            dirname: None,
            filename: None,
            listing: String::new(),
            globals: String::new(),
            locals: String::new(),
            current_line: NO_LINE,
        }
    }
}

impl FrameView {
    /// Path used in breakpoint commands (`dirname` + `filename`).
    ///
    /// `None` when no file is shown. The backend reports that as an empty
    /// filename and leaves `dirname` untouched.
    pub fn source_path(&self) -> Option<String> {
        let filename = self.filename.as_deref().filter(|name| !name.is_empty())?;
        Some(format!("{}{filename}", self.dirname.as_deref().unwrap_or("")))
    }

    /// Number of lines in the listing.
    pub fn line_count(&self) -> usize {
        self.listing.lines().count()
    }
}

/// Mirror of one remote debugger session.
#[derive(Debug, Clone)]
pub struct SessionState {
    console_history: String,
    last_file: Option<String>,
    last_line: i64,
    breakpoints: BTreeSet<u32>,
    frame: FrameView,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            console_history: String::new(),
            last_file: None,
            last_line: NO_LINE,
            breakpoints: BTreeSet::new(),
            frame: FrameView::default(),
        }
    }

    /// Full console transcript. Only ever grows.
    pub fn console_history(&self) -> &str {
        &self.console_history
    }

    pub fn last_file(&self) -> Option<&str> {
        self.last_file.as_deref()
    }

    /// Line the view last scrolled to, or [`NO_LINE`].
    pub fn last_line(&self) -> i64 {
        self.last_line
    }

    pub fn breakpoints(&self) -> &BTreeSet<u32> {
        &self.breakpoints
    }

    pub fn frame(&self) -> &FrameView {
        &self.frame
    }

    pub fn is_stopped(&self) -> bool {
        self.last_line != NO_LINE
    }

    pub(crate) fn append_console(&mut self, text: &str) {
        self.console_history.push_str(text);
    }

    pub(crate) fn set_position(&mut self, file: Option<String>, line: i64) {
        self.last_file = file;
        self.last_line = line;
    }

    pub(crate) fn set_breakpoints(&mut self, breakpoints: BTreeSet<u32>) {
        self.breakpoints = breakpoints;
    }

    pub(crate) fn frame_mut(&mut self) -> &mut FrameView {
        &mut self.frame
    }
}
