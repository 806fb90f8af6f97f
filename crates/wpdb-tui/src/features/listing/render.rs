use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use wpdb_core::projector::{ListingLine, project_listing};
use wpdb_core::session::SessionState;

use super::ListingState;

const BREAKPOINT_MARK: &str = "●";
const CURRENT_MARK: &str = "▶";

fn render_line(line: &ListingLine<'_>, digits: usize) -> Line<'static> {
    let mark = if line.is_breakpoint { BREAKPOINT_MARK } else { " " };
    let arrow = if line.is_current { CURRENT_MARK } else { " " };
    let number_style = if line.is_breakpoint {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let text_style = if line.is_current {
        Style::default().bg(Color::Blue).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::styled(mark, Style::default().fg(Color::Red)),
        Span::styled(format!("{:>digits$}", line.number), number_style),
        Span::styled(arrow, Style::default().fg(Color::Yellow)),
        Span::raw(" "),
        Span::styled(line.text.replace('\t', "    "), text_style),
    ])
}

pub fn render_listing(session: &SessionState, listing: ListingState, area: Rect, frame: &mut Frame) {
    let frame_view = session.frame();
    let title = match frame_view.source_path() {
        Some(path) => format!(" {path} "),
        None => " (no source) ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::DarkGray));
    let rows = block.inner(area).height as usize;

    let projected = project_listing(session);
    let digits = projected.len().max(1).to_string().len();
    let lines: Vec<Line<'static>> = projected
        .iter()
        .skip(listing.offset)
        .take(rows)
        .map(|line| render_line(line, digits))
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
