//! Pure mapping from session state to what a view shows.
//!
//! Nothing here holds state. Views call these every frame and derive click
//! targets from the same projection they draw.

use crate::command::BreakpointCommand;
use crate::session::SessionState;

/// Geometry needed to centre an element inside a scrolling container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollMetrics {
    pub element_offset_top: i64,
    pub container_offset_top: i64,
    pub container_scroll_top: i64,
    pub container_height: i64,
    /// Total scrollable content height.
    pub scroll_height: i64,
}

impl ScrollMetrics {
    /// Metrics for a pane of `viewport_rows` rows showing `line_count`
    /// one-row lines, targeting 1-based `line`.
    pub fn for_rows(line: u32, line_count: usize, viewport_rows: u16) -> Self {
        Self {
            element_offset_top: i64::from(line.saturating_sub(1)),
            container_offset_top: 0,
            container_scroll_top: 0,
            container_height: i64::from(viewport_rows),
            scroll_height: i64::try_from(line_count).unwrap_or(i64::MAX),
        }
    }
}

/// Scroll offset that puts the element at the container's midpoint.
///
/// Clamped to `[0, max(0, scroll_height - container_height)]`.
pub fn center_scroll_offset(metrics: &ScrollMetrics) -> u64 {
    let raw = metrics.element_offset_top - metrics.container_offset_top
        + metrics.container_scroll_top
        - metrics.container_height / 2;
    let max = (metrics.scroll_height - metrics.container_height).max(0);
    raw.clamp(0, max) as u64
}

/// Sizing rule for the console pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleLayout {
    pub min_height: u16,
    /// Height taken by everything else on screen.
    pub reserved: u16,
}

/// Console height for a window of `window_height`.
pub fn console_pane_height(window_height: u16, layout: &ConsoleLayout) -> u16 {
    window_height
        .saturating_sub(layout.reserved)
        .max(layout.min_height)
}

/// One row of the source listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingLine<'a> {
    /// 1-based line number.
    pub number: u32,
    pub text: &'a str,
    pub is_breakpoint: bool,
    pub is_current: bool,
}

/// Projects the listing with breakpoint and current-line markers.
pub fn project_listing(state: &SessionState) -> Vec<ListingLine<'_>> {
    let frame = state.frame();
    let current = u32::try_from(frame.current_line).ok();
    frame
        .listing
        .lines()
        .zip(1u32..)
        .map(|(text, number)| ListingLine {
            number,
            text,
            is_breakpoint: state.breakpoints().contains(&number),
            is_current: current == Some(number),
        })
        .collect()
}

/// Command toggling the breakpoint on `line` of the displayed file.
///
/// `None` when no file is displayed or `line` is outside the listing.
pub fn breakpoint_click(state: &SessionState, line: u32) -> Option<BreakpointCommand> {
    let frame = state.frame();
    let path = frame.source_path()?;
    if line == 0 || line as usize > frame.line_count() {
        return None;
    }
    Some(if state.breakpoints().contains(&line) {
        BreakpointCommand::Clear { path, line }
    } else {
        BreakpointCommand::Set { path, line }
    })
}
