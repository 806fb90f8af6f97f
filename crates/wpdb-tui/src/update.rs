//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use std::time::Instant;

use crossterm::event::{Event, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use tracing::{debug, warn};
use wpdb_core::command::Button;
use wpdb_core::dispatch::{self, DispatchOutcome};
use wpdb_core::projector::breakpoint_click;
use wpdb_core::reconcile::{reconcile, seed_console};
use wpdb_core::session::Snapshot;
use wpdb_core::transport::TransportError;
use wpdb_core::transport::notifier::FetchOutcome;
use wpdb_core::transport::ws::PushEvent;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::features::console::line_count;
use crate::features::listing::gutter_line_at;
use crate::features::statusline::Connection;
use crate::keymap::{Action, action_for};
use crate::layout::{ScreenLayout, contains};
use crate::overlays::Overlay;
use crate::state::{AppState, Bootstrap};

/// Lines moved per mouse wheel notch.
const WHEEL_LINES: isize = 3;

/// The main reducer function.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick { now } => handle_tick(app, now),
        UiEvent::Frame { width, height } => {
            handle_frame(app, width, height);
            vec![]
        }
        UiEvent::Terminal(event) => handle_terminal_event(app, event),
        UiEvent::SnapshotFetched {
            result,
            finished_at,
        } => {
            handle_snapshot(app, result, finished_at);
            vec![]
        }
        UiEvent::ConsoleHistoryLoaded { result } => {
            match result {
                Ok(transcript) => {
                    if seed_console(&mut app.session, &transcript) {
                        app.console.follow();
                    }
                }
                Err(e) => warn!(error = %e, "Console history unavailable"),
            }
            app.bootstrap = Bootstrap::Done;
            vec![]
        }
        UiEvent::Push { event, at } => {
            match event {
                PushEvent::Signal => app.notifier.on_signal(at),
                PushEvent::Connected => {
                    app.status.connection = Connection::Live;
                    app.notifier.on_signal(at);
                }
                PushEvent::Disconnected => app.status.connection = Connection::Disconnected,
            }
            vec![]
        }
        UiEvent::CommandDelivered { command, outcome } => {
            if outcome == DispatchOutcome::Dropped {
                app.status.notice = Some(format!("Not connected, dropped '{command}'"));
            }
            vec![]
        }
    }
}

fn handle_tick(app: &mut AppState, now: Instant) -> Vec<UiEffect> {
    match app.bootstrap {
        Bootstrap::Pending => {
            app.bootstrap = Bootstrap::Loading;
            vec![UiEffect::FetchConsoleHistory]
        }
        Bootstrap::Loading => vec![],
        Bootstrap::Done => {
            if app.notifier.begin_fetch(now) {
                vec![UiEffect::FetchSnapshot]
            } else {
                vec![]
            }
        }
    }
}

fn handle_frame(app: &mut AppState, width: u16, height: u16) {
    if app.layout.area.width == width && app.layout.area.height == height {
        return;
    }
    app.layout = ScreenLayout::compute(width, height, &app.console_layout);
    app.recenter_listing();
}

fn handle_snapshot(app: &mut AppState, result: Result<Snapshot, TransportError>, finished_at: Instant) {
    let outcome = match result {
        Ok(snapshot) => {
            let instruction = reconcile(&mut app.session, snapshot);
            if let Some(line) = instruction.scroll_to_line {
                let count = app.listing_line_count();
                app.listing.center_on(line, count, app.layout.listing_rows());
            }
            if instruction.console_grew {
                app.console.follow();
            }
            app.status.connection = Connection::Live;
            app.status.notice = None;
            FetchOutcome::Applied
        }
        Err(e) => {
            let outcome = app.notifier.classify_error(&e);
            app.status.connection = match outcome {
                FetchOutcome::Busy => Connection::Busy,
                _ => Connection::Failing(e.message),
            };
            outcome
        }
    };
    app.notifier.finish_fetch(finished_at, outcome);
}

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) => handle_key(app, &key),
        Event::Mouse(mouse) => handle_mouse(app, mouse),
        Event::Paste(text) => {
            if app.overlay.is_none() {
                app.input.insert_str(&text);
            }
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: &KeyEvent) -> Vec<UiEffect> {
    let Some(action) = action_for(key) else {
        return vec![];
    };

    if app.overlay.is_some() {
        return match action {
            Action::Quit => vec![UiEffect::Quit],
            Action::ToggleHelp | Action::CloseOverlay => {
                app.overlay = None;
                vec![]
            }
            _ => vec![],
        };
    }

    apply_action(app, action)
}

fn apply_action(app: &mut AppState, action: Action) -> Vec<UiEffect> {
    match action {
        Action::Quit => vec![UiEffect::Quit],
        Action::Command(command) => send(app, command.as_str()),
        Action::Send => {
            let raw = app.input.take();
            send(app, &raw)
        }
        Action::HistoryOlder => {
            if let Some(entry) = app.history.older().map(str::to_string) {
                app.input.set_text(&entry);
            }
            vec![]
        }
        Action::HistoryNewer => {
            if let Some(entry) = app.history.newer().map(str::to_string) {
                app.input.set_text(&entry);
            }
            vec![]
        }
        Action::ToggleHelp => {
            app.overlay = Some(Overlay::Help);
            vec![]
        }
        Action::CloseOverlay => vec![],
        Action::ConsolePageUp => {
            let total = line_count(app.session.console_history());
            app.console.page_up(total, app.layout.console_rows());
            vec![]
        }
        Action::ConsolePageDown => {
            let total = line_count(app.session.console_history());
            app.console.page_down(total, app.layout.console_rows());
            vec![]
        }
        Action::ConsoleFollow => {
            app.console.follow();
            vec![]
        }
        Action::Edit(edit) => {
            app.input.apply(edit);
            vec![]
        }
    }
}

fn send(app: &mut AppState, raw: &str) -> Vec<UiEffect> {
    let command = dispatch::prepare(&mut app.history, raw);
    debug!(command = command.text(), "Dispatching");
    vec![UiEffect::SendCommand { command }]
}

fn handle_mouse(app: &mut AppState, mouse: MouseEvent) -> Vec<UiEffect> {
    let (column, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if app.overlay.is_some() {
                app.overlay = None;
                return vec![];
            }
            if let Some(button) = app.layout.button_at(column, row) {
                return match button {
                    Button::Command(command) => send(app, command.as_str()),
                    Button::Help => apply_action(app, Action::ToggleHelp),
                    Button::Send => apply_action(app, Action::Send),
                };
            }
            let inner = app.layout.listing_inner();
            let count = app.listing_line_count();
            gutter_line_at(inner, app.listing, count, column, row)
                .and_then(|line| breakpoint_click(&app.session, line))
                .map_or_else(Vec::new, |command| send(app, &command.to_string()))
        }
        MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
            let delta = if mouse.kind == MouseEventKind::ScrollUp {
                -WHEEL_LINES
            } else {
                WHEEL_LINES
            };
            if contains(app.layout.listing, column, row) {
                let count = app.listing_line_count();
                app.listing.scroll_by(delta, count, app.layout.listing_rows());
            } else if contains(app.layout.console, column, row) {
                let total = line_count(app.session.console_history());
                app.console.scroll_by(delta, total, app.layout.console_rows());
            }
            vec![]
        }
        _ => vec![],
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fmt::Write as _;
    use std::time::Duration;

    use crossterm::event::{KeyCode, KeyModifiers};
    use wpdb_core::config::Config;
    use wpdb_core::transport::TransportMode;

    use super::*;

    fn listing_of(lines: usize) -> String {
        let mut listing = String::new();
        for i in 1..=lines {
            writeln!(listing, "line_{i} = {i}").unwrap();
        }
        listing
    }

    fn at(line: i64) -> Snapshot {
        Snapshot {
            dirname: Some("/srv/app/".into()),
            current_file: Some("a.py".into()),
            current_line: Some(line),
            file_listing: Some(listing_of(100)),
            ..Snapshot::default()
        }
    }

    /// Attached app with a laid-out 120x50 screen and bootstrap finished.
    fn attached(now: Instant) -> AppState {
        let mut app = AppState::new(&Config::default(), "test".into(), now);
        update(&mut app, UiEvent::Frame { width: 120, height: 50 });
        assert_eq!(update(&mut app, UiEvent::Tick { now }), vec![UiEffect::FetchConsoleHistory]);
        update(
            &mut app,
            UiEvent::ConsoleHistoryLoaded {
                result: Ok("> a.py(1)\n".into()),
            },
        );
        app
    }

    fn apply(app: &mut AppState, snapshot: Snapshot, now: Instant) {
        update(
            app,
            UiEvent::SnapshotFetched {
                result: Ok(snapshot),
                finished_at: now,
            },
        );
    }

    fn key(app: &mut AppState, code: KeyCode, modifiers: KeyModifiers) -> Vec<UiEffect> {
        update(app, UiEvent::Terminal(Event::Key(KeyEvent::new(code, modifiers))))
    }

    fn click(app: &mut AppState, column: u16, row: u16) -> Vec<UiEffect> {
        update(
            app,
            UiEvent::Terminal(Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                modifiers: KeyModifiers::NONE,
            })),
        )
    }

    fn sent_lines(effects: &[UiEffect]) -> Vec<String> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                UiEffect::SendCommand { command } => Some(command.line().to_string()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_bootstrap_precedes_polling() {
        let now = Instant::now();
        let mut app = AppState::new(&Config::default(), "test".into(), now);
        assert_eq!(update(&mut app, UiEvent::Tick { now }), vec![UiEffect::FetchConsoleHistory]);
        // Still loading: no snapshot fetch yet.
        assert!(update(&mut app, UiEvent::Tick { now }).is_empty());

        update(
            &mut app,
            UiEvent::ConsoleHistoryLoaded {
                result: Err(TransportError::http_status(404, "")),
            },
        );
        assert_eq!(update(&mut app, UiEvent::Tick { now }), vec![UiEffect::FetchSnapshot]);
        // In flight: no second fetch.
        assert!(update(&mut app, UiEvent::Tick { now }).is_empty());
    }

    #[test]
    fn test_snapshot_centres_listing_on_move() {
        let now = Instant::now();
        let mut app = attached(now);
        let rows = app.layout.listing_rows() as usize;

        apply(&mut app, at(42), now);
        assert_eq!(app.listing.offset, 41 - rows / 2);
        assert_eq!(app.session.console_history(), "> a.py(1)\n");

        // Operator scrolls away; an unchanged position does not snap back.
        app.listing.offset = 0;
        apply(&mut app, at(42), now);
        assert_eq!(app.listing.offset, 0);
    }

    #[test]
    fn test_poll_rescheduled_after_busy() {
        let now = Instant::now();
        let mut app = attached(now);
        assert_eq!(update(&mut app, UiEvent::Tick { now }), vec![UiEffect::FetchSnapshot]);

        update(
            &mut app,
            UiEvent::SnapshotFetched {
                result: Err(TransportError::http_status(403, "Forbidden")),
                finished_at: now,
            },
        );
        assert_eq!(app.status.connection, Connection::Busy);
        assert!(update(&mut app, UiEvent::Tick { now }).is_empty());

        let later = now + Duration::from_millis(333);
        assert_eq!(update(&mut app, UiEvent::Tick { now: later }), vec![UiEffect::FetchSnapshot]);
    }

    #[test]
    fn test_resize_recentres_listing() {
        let now = Instant::now();
        let mut app = attached(now);
        apply(&mut app, at(60), now);
        app.listing.offset = 0;

        update(&mut app, UiEvent::Frame { width: 120, height: 30 });
        let rows = app.layout.listing_rows() as usize;
        assert_eq!(app.listing.offset, 59 - rows / 2);
        assert_eq!(app.layout.console.height, 14);
    }

    #[test]
    fn test_function_key_dispatches_and_records() {
        let now = Instant::now();
        let mut app = attached(now);

        let effects = key(&mut app, KeyCode::F(10), KeyModifiers::NONE);
        assert_eq!(sent_lines(&effects), vec!["n\n"]);
        assert_eq!(app.history.get(0), Some("n"));
    }

    #[test]
    fn test_enter_sends_input_and_clears_it() {
        let now = Instant::now();
        let mut app = attached(now);
        app.input.set_text("p x");

        let effects = key(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(sent_lines(&effects), vec!["p x\n"]);
        assert_eq!(app.input.text(), "");

        // Empty Enter repeats the last command on the pdb side.
        let effects = key(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(sent_lines(&effects), vec!["\n"]);
        assert_eq!(app.history.len(), 1);
    }

    #[test]
    fn test_history_recall_fills_input() {
        let now = Instant::now();
        let mut app = attached(now);
        for command in ["a", "b"] {
            app.input.set_text(command);
            key(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        }

        key(&mut app, KeyCode::Up, KeyModifiers::NONE);
        assert_eq!(app.input.text(), "b");
        key(&mut app, KeyCode::Up, KeyModifiers::NONE);
        assert_eq!(app.input.text(), "a");
        key(&mut app, KeyCode::Up, KeyModifiers::NONE);
        assert_eq!(app.input.text(), "b");
        key(&mut app, KeyCode::Down, KeyModifiers::NONE);
        assert_eq!(app.input.text(), "a");
    }

    #[test]
    fn test_gutter_click_toggles_breakpoint() {
        let now = Instant::now();
        let mut app = attached(now);
        let mut snapshot = at(1);
        snapshot.breakpoints = Some(BTreeSet::from([2]));
        apply(&mut app, snapshot, now);
        assert_eq!(app.listing.offset, 0);

        let inner = app.layout.listing_inner();
        let effects = click(&mut app, inner.x, inner.y + 1);
        assert_eq!(sent_lines(&effects), vec!["cl /srv/app/a.py:2\n"]);

        let effects = click(&mut app, inner.x, inner.y + 2);
        assert_eq!(sent_lines(&effects), vec!["b /srv/app/a.py:3\n"]);

        // Clicking source text is not a toggle.
        assert!(click(&mut app, inner.x + 20, inner.y + 2).is_empty());
    }

    #[test]
    fn test_button_click_dispatches() {
        let now = Instant::now();
        let mut app = attached(now);
        let (button, rect) = app.layout.button_rects()[3];
        assert_eq!(button.label(), "Continue");

        let effects = click(&mut app, rect.x + 1, rect.y);
        assert_eq!(sent_lines(&effects), vec!["c\n"]);
    }

    #[test]
    fn test_help_overlay_swallows_keys() {
        let now = Instant::now();
        let mut app = attached(now);

        key(&mut app, KeyCode::F(1), KeyModifiers::NONE);
        assert_eq!(app.overlay, Some(Overlay::Help));
        assert!(key(&mut app, KeyCode::F(10), KeyModifiers::NONE).is_empty());
        key(&mut app, KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(app.input.text(), "");

        key(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(app.overlay, None);
        assert_eq!(
            key(&mut app, KeyCode::Char('q'), KeyModifiers::CONTROL),
            vec![UiEffect::Quit]
        );
    }

    #[test]
    fn test_new_output_resumes_console_follow() {
        let now = Instant::now();
        let mut app = attached(now);
        let output = Snapshot {
            console_delta: "x\n".repeat(200),
            ..Snapshot::default()
        };
        apply(&mut app, output, now);

        key(&mut app, KeyCode::PageUp, KeyModifiers::NONE);
        assert!(!app.console.is_following());

        let prompt = Snapshot {
            console_delta: "(Pdb) ".into(),
            ..Snapshot::default()
        };
        apply(&mut app, prompt, now);
        assert!(app.console.is_following());
    }

    #[test]
    fn test_dropped_command_sets_notice() {
        let now = Instant::now();
        let mut app = attached(now);
        update(
            &mut app,
            UiEvent::CommandDelivered {
                command: "n".into(),
                outcome: DispatchOutcome::Dropped,
            },
        );
        assert!(app.status.notice.as_deref().unwrap().contains("dropped"));
    }

    #[test]
    fn test_push_signal_triggers_fetch() {
        let now = Instant::now();
        let config = Config {
            mode: TransportMode::Push,
            ..Config::default()
        };
        let mut app = AppState::new(&config, "test".into(), now);
        update(&mut app, UiEvent::Frame { width: 120, height: 50 });
        update(&mut app, UiEvent::Tick { now });
        update(&mut app, UiEvent::ConsoleHistoryLoaded { result: Ok(String::new()) });
        assert_eq!(update(&mut app, UiEvent::Tick { now }), vec![UiEffect::FetchSnapshot]);
        apply(&mut app, at(3), now);
        assert!(update(&mut app, UiEvent::Tick { now: now + Duration::from_secs(5) }).is_empty());

        let signalled = now + Duration::from_secs(6);
        for _ in 0..5 {
            update(
                &mut app,
                UiEvent::Push {
                    event: PushEvent::Signal,
                    at: signalled,
                },
            );
        }
        let fire = signalled + Duration::from_millis(5);
        assert_eq!(update(&mut app, UiEvent::Tick { now: fire }), vec![UiEffect::FetchSnapshot]);
    }
}
