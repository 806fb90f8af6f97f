//! Applies snapshots to the session mirror.
//!
//! The order inside [`reconcile`] matters: the "has the position moved"
//! test must see the position from *before* this snapshot, so it runs
//! before the position is overwritten.

use tracing::debug;

use crate::session::{NO_LINE, SessionState, Snapshot};

/// What the view must do after a snapshot was applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderInstruction {
    /// Centre the listing on this line.
    pub scroll_to_line: Option<u32>,
    /// New console output arrived; pin the console to its end.
    pub console_grew: bool,
}

/// Applies one snapshot and reports what the view must do.
pub fn reconcile(state: &mut SessionState, snapshot: Snapshot) -> RenderInstruction {
    let Snapshot {
        console_delta,
        breakpoints,
        dirname,
        current_file,
        current_line,
        variable_scopes,
        file_listing,
    } = snapshot;

    let console_grew = !console_delta.is_empty();
    if console_grew {
        state.append_console(&console_delta);
    }

    let line = current_line.unwrap_or(NO_LINE);
    let file = current_file.clone().or_else(|| state.frame().filename.clone());
    let moved = line != NO_LINE && (file.as_deref() != state.last_file() || line != state.last_line());

    let scroll_to_line = if moved {
        debug!(file = file.as_deref().unwrap_or(""), line, "Position moved");
        state.set_position(file, line);
        u32::try_from(line).ok()
    } else {
        None
    };

    if let Some(breakpoints) = breakpoints {
        state.set_breakpoints(breakpoints);
    }

    let frame = state.frame_mut();
    if let Some(listing) = file_listing {
        frame.listing = listing;
    }
    if let Some(globals) = variable_scopes.globals {
        frame.globals = globals;
    }
    if let Some(locals) = variable_scopes.locals {
        frame.locals = locals;
    }
    if current_file.is_some() {
        frame.filename = current_file;
    }
    if dirname.is_some() {
        frame.dirname = dirname;
    }
    if current_line.is_some() {
        frame.current_line = line;
    }

    RenderInstruction {
        scroll_to_line,
        console_grew,
    }
}

/// Seeds the console with the full transcript fetched at attach.
///
/// Ignored once the console already has content, so a late bootstrap
/// response cannot duplicate output that arrived through snapshots.
pub fn seed_console(state: &mut SessionState, transcript: &str) -> bool {
    if transcript.is_empty() || !state.console_history().is_empty() {
        return false;
    }
    state.append_console(transcript);
    true
}
