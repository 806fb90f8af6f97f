use ratatui::layout::Rect;
use wpdb_core::projector::{ScrollMetrics, center_scroll_offset};

use crate::layout::contains;

/// Scroll position of the listing, in lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListingState {
    pub offset: usize,
}

impl ListingState {
    /// Centres `line` in a pane of `rows` rows.
    pub fn center_on(&mut self, line: u32, line_count: usize, rows: u16) {
        let metrics = ScrollMetrics::for_rows(line, line_count, rows);
        self.offset = center_scroll_offset(&metrics) as usize;
    }

    pub fn scroll_by(&mut self, delta: isize, line_count: usize, rows: u16) {
        let max = line_count.saturating_sub(rows as usize);
        self.offset = self.offset.saturating_add_signed(delta).min(max);
    }
}

/// Width of the marker and line-number gutter for a listing of `line_count` lines.
fn gutter_width(line_count: usize) -> u16 {
    let digits = line_count.max(1).to_string().len() as u16;
    // breakpoint mark, digits, current mark, space
    digits + 3
}

/// Line number under a click, if the click landed on the gutter.
pub fn gutter_line_at(
    inner: Rect,
    listing: ListingState,
    line_count: usize,
    column: u16,
    row: u16,
) -> Option<u32> {
    if !contains(inner, column, row) || column >= inner.x + gutter_width(line_count) {
        return None;
    }
    let index = listing.offset + (row - inner.y) as usize;
    (index < line_count).then(|| index as u32 + 1)
}
