//! TUI runtime - owns terminal, runs event loop, executes effects.
//!
//! This is the "Elm runtime" boundary: all side effects happen here.
//! The reducer stays pure and produces effects; this module executes them.
//!
//! Structure:
//! - `mod.rs`: Core runtime (TuiRuntime, event loop, effect dispatch)
//! - `inbox.rs`: Inbox channel types
//! - `handlers.rs`: Async effect handlers (fetches, push forwarding)

mod handlers;
mod inbox;

use std::future::Future;
use std::io::Stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use inbox::{UiEventReceiver, UiEventSender};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use wpdb_core::config::Config;
use wpdb_core::dispatch;
use wpdb_core::transport::http::{HttpCommandSink, SessionClient};
use wpdb_core::transport::ws::{PushChannel, push_url};
use wpdb_core::transport::{CommandSink, TransportMode};

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::{render, terminal, update};

/// Tick interval right after terminal input (~60fps).
pub const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Tick interval when nothing is happening.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(100);

/// Full-screen TUI runtime.
///
/// Owns the terminal, the session client and the command sink. Terminal
/// state is restored on normal exit and on panic.
pub struct TuiRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: AppState,
    client: SessionClient,
    sink: Box<dyn CommandSink>,
    /// Stops the push channel task on exit.
    cancel: CancellationToken,
    inbox_tx: UiEventSender,
    inbox_rx: UiEventReceiver,
    last_tick: Instant,
    last_terminal_event: Instant,
}

impl TuiRuntime {
    /// Connects the transport and takes over the terminal.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// Returns an error if the URL is invalid or the terminal cannot be set up.
    pub fn new(config: &Config) -> Result<Self> {
        let base = config.base_url()?;
        let client = SessionClient::new(base.clone(), config.request_timeout())?;
        let cancel = CancellationToken::new();
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        let sink: Box<dyn CommandSink> = match config.mode {
            TransportMode::Poll => Box::new(HttpCommandSink::new(client.clone(), Handle::current())),
            TransportMode::Push => {
                let url = push_url(&base, &config.push.ws_path)?;
                info!(%url, "Opening push channel");
                let (channel, events) = PushChannel::spawn(url, config.reconnect_delay(), cancel.clone());
                tokio::spawn(handlers::forward_push_events(events, inbox_tx.clone()));
                Box::new(channel)
            }
        };

        let now = Instant::now();
        let state = AppState::new(config, base.to_string(), now);

        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        Ok(Self {
            terminal,
            state,
            client,
            sink,
            cancel,
            inbox_tx,
            inbox_rx,
            last_tick: now,
            last_terminal_event: now,
        })
    }

    /// Runs the main event loop until the operator quits.
    pub fn run(&mut self) -> Result<()> {
        terminal::enable_input_features()?;

        let result = self.event_loop();

        let _ = terminal::disable_input_features();
        self.cancel.cancel();
        terminal::restore_terminal()?;
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true;

        while !self.state.should_quit {
            let mut events = self.collect_events()?;

            // Layout first, so hit testing in this batch uses the current size.
            let size = self.terminal.size()?;
            events.insert(
                0,
                UiEvent::Frame {
                    width: size.width,
                    height: size.height,
                },
            );

            for event in events {
                if matches!(&event, UiEvent::Terminal(_)) {
                    self.last_terminal_event = Instant::now();
                }
                // Renders are batched to the tick cadence.
                if matches!(&event, UiEvent::Tick { .. }) {
                    dirty = true;
                }
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            if dirty {
                self.terminal.draw(|frame| render::render(&self.state, frame))?;
                dirty = false;
            }
        }

        Ok(())
    }

    // ========================================================================
    // Event Collection
    // ========================================================================

    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        let tick_interval = if self.last_terminal_event.elapsed() < IDLE_POLL_DURATION {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }

        // Wake for whichever comes first: the next tick or a due fetch.
        let now = Instant::now();
        let mut wait = tick_interval.saturating_sub(self.last_tick.elapsed());
        if let Some(deadline) = self.state.fetch_deadline(now) {
            wait = wait.min(deadline.saturating_duration_since(now));
        }
        if !events.is_empty() {
            wait = Duration::ZERO;
        }

        if event::poll(wait)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        let now = Instant::now();
        let fetch_due = self
            .state
            .fetch_deadline(now)
            .is_some_and(|deadline| deadline <= now);
        if fetch_due || self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick { now });
            self.last_tick = now;
        }

        Ok(events)
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    fn dispatch_event(&mut self, event: UiEvent) {
        let effects = update::update(&mut self.state, event);
        if !effects.is_empty() {
            self.execute_effects(effects);
        }
    }

    /// Spawns an async effect and sends its result event to the inbox.
    fn spawn_effect<F, Fut>(&self, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(f().await);
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.should_quit = true;
            }
            UiEffect::FetchSnapshot => {
                let client = self.client.clone();
                self.spawn_effect(move || handlers::fetch_snapshot(client));
            }
            UiEffect::FetchConsoleHistory => {
                let client = self.client.clone();
                self.spawn_effect(move || handlers::fetch_console_history(client));
            }
            UiEffect::SendCommand { command } => {
                let outcome = dispatch::deliver(self.sink.as_ref(), &command);
                self.dispatch_event(UiEvent::CommandDelivered {
                    command: command.text().to_string(),
                    outcome,
                });
            }
        }
    }
}
