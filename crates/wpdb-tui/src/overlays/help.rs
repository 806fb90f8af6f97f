//! Help overlay: key bindings and what the command buttons do.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use wpdb_core::command::DebuggerCommand;

const KEY_COLUMN: usize = 12;

const OTHER_KEYS: &[(&str, &str)] = &[
    ("Enter", "Send the input line (empty repeats the last command)"),
    ("↑ / ↓", "Recall older / newer commands"),
    ("PgUp/PgDn", "Scroll the console"),
    ("Ctrl+End", "Follow console output"),
    ("Click", "Line number: toggle breakpoint; button: run it"),
    ("F1", "Toggle this help"),
    ("Esc", "Close this help"),
    ("Ctrl+Q", "Quit"),
];

fn help_lines() -> Vec<Line<'static>> {
    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let mut lines = Vec::new();

    for command in DebuggerCommand::ALL {
        let key = command.key_hint().unwrap_or("");
        lines.push(Line::from(vec![
            Span::styled(format!("{key:<KEY_COLUMN$}"), key_style),
            Span::styled(format!("{} ", command.as_str()), Style::default().fg(Color::Cyan)),
            Span::raw(command.description()),
        ]));
    }
    lines.push(Line::raw(""));
    for (key, action) in OTHER_KEYS {
        lines.push(Line::from(vec![
            Span::styled(format!("{key:<KEY_COLUMN$}"), key_style),
            Span::raw(*action),
        ]));
    }
    lines
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    )
}

pub fn render_help(area: Rect, frame: &mut Frame) {
    let lines = help_lines();
    let popup = centered(area, 72, lines.len() as u16 + 2);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Help ")
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
