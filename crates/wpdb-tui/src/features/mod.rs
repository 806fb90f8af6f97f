//! Feature slices for the TUI (state/render per slice).

pub mod console;
pub mod input;
pub mod listing;
pub mod statusline;
pub mod variables;
