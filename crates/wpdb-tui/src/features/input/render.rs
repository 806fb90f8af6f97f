use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthStr;

use super::InputState;

const PROMPT: &str = "(Pdb) ";

pub fn render_input(input: &InputState, area: Rect, frame: &mut Frame) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);

    let line = Line::from(vec![
        Span::styled(PROMPT, Style::default().fg(Color::Yellow)),
        Span::raw(input.text()),
    ]);
    frame.render_widget(Paragraph::new(line).block(block), area);

    let before_cursor: String = input.text().chars().take(input.cursor()).collect();
    let x = inner.x + (PROMPT.width() + before_cursor.width()) as u16;
    if inner.height > 0 && x < inner.right() {
        frame.set_cursor_position(Position::new(x, inner.y));
    }
}
