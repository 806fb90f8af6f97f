//! Pure view functions for the TUI.
//!
//! `render` reads `&AppState` and draws; it never mutates state. Pane
//! rectangles come from `AppState::layout`, the same rects the reducer uses
//! for hit testing.

use ratatui::Frame;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Paragraph;
use wpdb_core::command::Button;

use crate::features::console::render_console;
use crate::features::input::render_input;
use crate::features::listing::render_listing;
use crate::features::statusline::render_status_line;
use crate::features::variables::render_scope;
use crate::layout::{ScreenLayout, button_text};
use crate::overlays::{Overlay, help};
use crate::state::AppState;

/// Renders the entire TUI to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let layout = &app.layout;
    if layout.area.is_empty() {
        return;
    }
    let session = &app.session;

    render_listing(session, app.listing, layout.listing, frame);
    render_scope("Locals", &session.frame().locals, layout.locals, frame);
    render_scope("Globals", &session.frame().globals, layout.globals, frame);
    render_console(session.console_history(), app.console, layout.console, frame);
    render_input(&app.input, layout.input, frame);
    render_buttons(layout, frame);
    render_status_line(&app.status, session, layout.status, frame);

    match app.overlay {
        Some(Overlay::Help) => help::render_help(layout.area, frame),
        None => {}
    }
}

fn render_buttons(layout: &ScreenLayout, frame: &mut Frame) {
    for (button, rect) in layout.button_rects() {
        let style = match button {
            Button::Command(_) => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            Button::Help | Button::Send => Style::default().fg(Color::Gray),
        };
        frame.render_widget(Paragraph::new(button_text(button)).style(style), rect);
    }
}
