//! Source listing pane.
//!
//! - `state.rs`: scroll offset and gutter hit-testing
//! - `render.rs`: breakpoint and current-line markers

mod render;
mod state;

pub use render::render_listing;
pub use state::{ListingState, gutter_line_at};
