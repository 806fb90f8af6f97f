//! Screen layout shared by the reducer (hit testing) and the renderer.
//!
//! Computed once per `Frame` event so clicks resolve against exactly the
//! rectangles that were drawn.

use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};
use unicode_width::UnicodeWidthStr;
use wpdb_core::command::Button;
use wpdb_core::projector::{ConsoleLayout, console_pane_height};

const INPUT_HEIGHT: u16 = 3;
const BUTTONS_HEIGHT: u16 = 1;
const STATUS_HEIGHT: u16 = 1;
const BUTTON_GAP: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenLayout {
    pub area: Rect,
    pub listing: Rect,
    pub locals: Rect,
    pub globals: Rect,
    pub console: Rect,
    pub input: Rect,
    pub buttons: Rect,
    pub status: Rect,
}

impl ScreenLayout {
    pub fn compute(width: u16, height: u16, console: &ConsoleLayout) -> Self {
        let area = Rect::new(0, 0, width, height);
        let console_height = console_pane_height(height, console);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(console_height),
                Constraint::Length(INPUT_HEIGHT),
                Constraint::Length(BUTTONS_HEIGHT),
                Constraint::Length(STATUS_HEIGHT),
            ])
            .split(area);

        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(rows[0]);

        let scopes = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(top[1]);

        Self {
            area,
            listing: top[0],
            locals: scopes[0],
            globals: scopes[1],
            console: rows[1],
            input: rows[2],
            buttons: rows[3],
            status: rows[4],
        }
    }

    /// Listing area inside its border.
    pub fn listing_inner(&self) -> Rect {
        inner(self.listing)
    }

    pub fn console_inner(&self) -> Rect {
        inner(self.console)
    }

    pub fn listing_rows(&self) -> u16 {
        self.listing_inner().height
    }

    pub fn console_rows(&self) -> u16 {
        self.console_inner().height
    }

    /// Button bar entries with their click targets. Buttons that do not fit
    /// are left out.
    pub fn button_rects(&self) -> Vec<(Button, Rect)> {
        let mut x = self.buttons.x;
        let mut rects = Vec::with_capacity(Button::BAR.len());
        for button in Button::BAR {
            let width = button_text(button).width() as u16;
            if x + width > self.buttons.right() {
                break;
            }
            rects.push((button, Rect::new(x, self.buttons.y, width, 1)));
            x += width + BUTTON_GAP;
        }
        rects
    }

    pub fn button_at(&self, column: u16, row: u16) -> Option<Button> {
        self.button_rects()
            .into_iter()
            .find(|(_, rect)| contains(*rect, column, row))
            .map(|(button, _)| button)
    }
}

/// Text drawn for a button, brackets included.
pub fn button_text(button: Button) -> String {
    match button {
        Button::Command(command) => match command.key_hint() {
            Some(hint) => format!("[{} {hint}]", command.label()),
            None => format!("[{} {}]", command.label(), command.as_str()),
        },
        Button::Help => "[Help F1]".to_string(),
        Button::Send => "[Send ⏎]".to_string(),
    }
}

pub fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

fn inner(rect: Rect) -> Rect {
    rect.inner(Margin {
        horizontal: 1,
        vertical: 1,
    })
}

#[cfg(test)]
mod tests {
    use wpdb_core::command::DebuggerCommand;

    use super::*;

    const ROWS: ConsoleLayout = ConsoleLayout {
        min_height: 6,
        reserved: 16,
    };

    #[test]
    fn test_console_gets_configured_height() {
        let layout = ScreenLayout::compute(120, 50, &ROWS);
        assert_eq!(layout.console.height, 34);
        assert_eq!(layout.listing.height, 11);
        assert_eq!(layout.status.y, 49);
    }

    #[test]
    fn test_console_min_height_on_short_terminal() {
        let layout = ScreenLayout::compute(80, 20, &ROWS);
        assert_eq!(layout.console.height, 6);
        assert_eq!(layout.console_rows(), 4);
    }

    #[test]
    fn test_button_hit_testing() {
        let layout = ScreenLayout::compute(160, 40, &ROWS);
        let rects = layout.button_rects();
        assert_eq!(rects.len(), Button::BAR.len());

        let (_, next) = rects[0];
        assert_eq!(
            layout.button_at(next.x, next.y),
            Some(Button::Command(DebuggerCommand::Next))
        );
        // The gap between buttons is not a target.
        assert_eq!(layout.button_at(next.right(), next.y), None);
        assert_eq!(layout.button_at(next.x, next.y - 1), None);
    }

    #[test]
    fn test_narrow_terminal_drops_trailing_buttons() {
        let layout = ScreenLayout::compute(30, 40, &ROWS);
        assert!(layout.button_rects().len() < Button::BAR.len());
    }
}
