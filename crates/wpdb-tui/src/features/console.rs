//! Console transcript pane.
//!
//! Follows the end of the transcript unless the operator scrolled back.
//! New output snaps it back to following.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleState {
    follow: bool,
    offset: usize,
}

impl Default for ConsoleState {
    fn default() -> Self {
        Self {
            follow: true,
            offset: 0,
        }
    }
}

impl ConsoleState {
    pub fn is_following(&self) -> bool {
        self.follow
    }

    pub fn follow(&mut self) {
        self.follow = true;
    }

    /// First visible line for a transcript of `total` lines in `rows` rows.
    pub fn visible_offset(&self, total: usize, rows: u16) -> usize {
        let max = total.saturating_sub(rows as usize);
        if self.follow { max } else { self.offset.min(max) }
    }

    pub fn scroll_by(&mut self, delta: isize, total: usize, rows: u16) {
        let max = total.saturating_sub(rows as usize);
        let next = self.visible_offset(total, rows).saturating_add_signed(delta).min(max);
        self.offset = next;
        self.follow = next >= max;
    }

    pub fn page_up(&mut self, total: usize, rows: u16) {
        self.scroll_by(-page(rows), total, rows);
    }

    pub fn page_down(&mut self, total: usize, rows: u16) {
        self.scroll_by(page(rows), total, rows);
    }
}

fn page(rows: u16) -> isize {
    rows.saturating_sub(1).max(1) as isize
}

pub fn line_count(transcript: &str) -> usize {
    transcript.lines().count()
}

pub fn render_console(transcript: &str, console: ConsoleState, area: Rect, frame: &mut Frame) {
    let title = if console.is_following() {
        " Console ".to_string()
    } else {
        " Console (scrolled, End to follow) ".to_string()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::DarkGray));
    let rows = block.inner(area).height;

    let total = line_count(transcript);
    let offset = console.visible_offset(total, rows);
    let lines: Vec<Line<'_>> = transcript
        .lines()
        .skip(offset)
        .take(rows as usize)
        .map(Line::raw)
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_shows_tail() {
        let console = ConsoleState::default();
        assert_eq!(console.visible_offset(100, 10), 90);
        assert_eq!(console.visible_offset(4, 10), 0);
    }

    #[test]
    fn test_page_up_then_down_resumes_follow() {
        let mut console = ConsoleState::default();
        console.page_up(100, 10);
        assert!(!console.is_following());
        assert_eq!(console.visible_offset(100, 10), 81);

        // More output arrives while scrolled back: position is kept.
        assert_eq!(console.visible_offset(150, 10), 81);

        for _ in 0..6 {
            console.page_down(150, 10);
        }
        assert!(!console.is_following());
        console.page_down(150, 10);
        assert!(console.is_following());
        assert_eq!(console.visible_offset(150, 10), 140);
    }

    #[test]
    fn test_line_count_counts_partial_prompt() {
        assert_eq!(line_count("a\nb\n(Pdb) "), 3);
        assert_eq!(line_count(""), 0);
    }
}
