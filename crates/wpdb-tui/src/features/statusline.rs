//! Connection status and transient notices.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use wpdb_core::session::SessionState;
use wpdb_core::transport::TransportMode;

/// What the last transport interaction told us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connection {
    Connecting,
    Live,
    /// The session answered 403 while running a command.
    Busy,
    Failing(String),
    /// Push mode only: the WebSocket is down.
    Disconnected,
}

impl Connection {
    fn label(&self) -> (&str, Color) {
        match self {
            Connection::Connecting => ("connecting", Color::Yellow),
            Connection::Live => ("live", Color::Green),
            Connection::Busy => ("busy", Color::Yellow),
            Connection::Failing(_) => ("error", Color::Red),
            Connection::Disconnected => ("disconnected", Color::Red),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatusState {
    pub mode: TransportMode,
    pub target: String,
    pub connection: Connection,
    /// One-shot message, cleared by the next successful snapshot.
    pub notice: Option<String>,
}

impl StatusState {
    pub fn new(mode: TransportMode, target: String) -> Self {
        Self {
            mode,
            target,
            connection: Connection::Connecting,
            notice: None,
        }
    }
}

pub fn render_status_line(status: &StatusState, session: &SessionState, area: Rect, frame: &mut Frame) {
    let (label, color) = status.connection.label();
    let mut spans = vec![
        Span::styled("● ", Style::default().fg(color)),
        Span::styled(label.to_string(), Style::default().fg(color)),
        Span::styled(
            format!(" │ {} {}", status.mode, status.target),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    if let (Some(file), true) = (session.last_file(), session.is_stopped()) {
        spans.push(Span::styled(
            format!(" │ {file}:{}", session.last_line()),
            Style::default().fg(Color::Gray),
        ));
    }

    let message = match (&status.notice, &status.connection) {
        (Some(notice), _) => Some(notice.as_str()),
        (None, Connection::Failing(error)) => Some(error.as_str()),
        _ => None,
    };
    if let Some(message) = message {
        spans.push(Span::styled(
            format!(" │ {message}"),
            Style::default().fg(Color::Yellow),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
