//! Single-line command input.
//!
//! - `state.rs`: text buffer and cursor editing
//! - `render.rs`: prompt line and terminal cursor

mod render;
mod state;

pub use render::render_input;
pub use state::{EditAction, InputState};
