//! Application state for the TUI.
//!
//! ```text
//! AppState
//! ├── session: SessionState     (remote mirror, written only by the reconciler)
//! ├── history: CommandHistory   (↑/↓ recall)
//! ├── notifier: Notifier        (when to fetch next)
//! ├── input / listing / console (pane state)
//! ├── status: StatusState       (connection + notices)
//! ├── layout: ScreenLayout      (rects from the last Frame, for hit testing)
//! └── overlay: Option<Overlay>
//! ```

use std::time::Instant;

use wpdb_core::config::Config;
use wpdb_core::projector::ConsoleLayout;
use wpdb_core::session::{CommandHistory, SessionState};
use wpdb_core::transport::notifier::Notifier;

use crate::features::console::ConsoleState;
use crate::features::input::InputState;
use crate::features::listing::ListingState;
use crate::features::statusline::StatusState;
use crate::layout::ScreenLayout;
use crate::overlays::Overlay;

pub struct AppState {
    pub session: SessionState,
    pub history: CommandHistory,
    pub notifier: Notifier,
    pub input: InputState,
    pub listing: ListingState,
    pub console: ConsoleState,
    pub status: StatusState,
    pub layout: ScreenLayout,
    pub console_layout: ConsoleLayout,
    pub overlay: Option<Overlay>,
    pub should_quit: bool,
    pub bootstrap: Bootstrap,
}

/// Attach-time console transcript load.
///
/// Snapshot polling starts only once this is `Done`, so deltas never land
/// in the console before the transcript they continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bootstrap {
    Pending,
    Loading,
    Done,
}

impl AppState {
    /// Creates state for a fresh attach; the first fetch is due at `now`.
    pub fn new(config: &Config, target: String, now: Instant) -> Self {
        Self {
            session: SessionState::new(),
            history: CommandHistory::new(),
            notifier: Notifier::new(config.notifier_config(), now),
            input: InputState::default(),
            listing: ListingState::default(),
            console: ConsoleState::default(),
            status: StatusState::new(config.mode, target),
            layout: ScreenLayout::default(),
            console_layout: config.console_layout(),
            overlay: None,
            should_quit: false,
            bootstrap: Bootstrap::Pending,
        }
    }

    /// When the next snapshot fetch wants a tick. Nothing is due until the
    /// console transcript has loaded.
    pub fn fetch_deadline(&self, now: Instant) -> Option<Instant> {
        match self.bootstrap {
            Bootstrap::Done => self.notifier.next_deadline(now),
            Bootstrap::Pending | Bootstrap::Loading => None,
        }
    }

    /// Lines in the current listing.
    pub fn listing_line_count(&self) -> usize {
        self.session.frame().line_count()
    }

    /// Centres the listing on the line the session is stopped at.
    pub fn recenter_listing(&mut self) {
        let Ok(line) = u32::try_from(self.session.frame().current_line) else {
            return;
        };
        let count = self.listing_line_count();
        let rows = self.layout.listing_rows();
        self.listing.center_on(line, count, rows);
    }
}
