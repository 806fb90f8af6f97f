//! Decides when to fetch the next snapshot.
//!
//! [`Notifier`] is a plain state machine driven with explicit instants, so
//! the TUI can run it from its frame loop and [`drive`] can run it on tokio.
//! At most one fetch is in flight; a push signal that lands during a fetch
//! is remembered and triggers another fetch right after.

use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::ws::PushEvent;
use super::{SnapshotSource, TransportError, TransportMode};
use crate::debounce::Debouncer;
use crate::session::Snapshot;

/// How long [`drive`] sleeps when nothing is scheduled.
const IDLE_WAIT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotifierConfig {
    pub mode: TransportMode,
    pub poll_interval: Duration,
    /// Push only: window that folds a burst of signals into one fetch.
    pub coalesce: Duration,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            mode: TransportMode::Poll,
            poll_interval: Duration::from_millis(333),
            coalesce: Duration::from_millis(5),
        }
    }
}

/// Result of a finished fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// The backend refused with 403 while it is between commands.
    Busy,
    Failed,
}

#[derive(Debug, Clone)]
pub struct Notifier {
    config: NotifierConfig,
    debounce: Debouncer,
    next_poll: Option<Instant>,
    signalled: bool,
    in_flight: bool,
    last_outcome: Option<FetchOutcome>,
}

impl Notifier {
    /// Creates a notifier with its first fetch due at `now`.
    pub fn new(config: NotifierConfig, now: Instant) -> Self {
        Self {
            config,
            debounce: Debouncer::new(config.coalesce),
            next_poll: Some(now),
            signalled: false,
            in_flight: false,
            last_outcome: None,
        }
    }

    pub fn mode(&self) -> TransportMode {
        self.config.mode
    }

    /// Records a change signal from the push channel.
    pub fn on_signal(&mut self, now: Instant) {
        if self.config.mode == TransportMode::Push {
            self.debounce.signal(now);
        }
    }

    /// Claims the next fetch if one is due and none is running.
    pub fn begin_fetch(&mut self, now: Instant) -> bool {
        if self.debounce.fire(now) {
            self.signalled = true;
        }
        if self.in_flight {
            return false;
        }
        let poll_due = self.next_poll.is_some_and(|at| now >= at);
        if !(self.signalled || poll_due) {
            return false;
        }
        self.in_flight = true;
        self.signalled = false;
        self.next_poll = None;
        true
    }

    /// Releases the in-flight guard and schedules what comes next.
    pub fn finish_fetch(&mut self, now: Instant, outcome: FetchOutcome) {
        self.in_flight = false;
        self.last_outcome = Some(outcome);
        self.next_poll = match (self.config.mode, outcome) {
            (TransportMode::Poll, _) => Some(now + self.config.poll_interval),
            // Push waits for the next signal, but retries a refused fetch.
            (TransportMode::Push, FetchOutcome::Applied) => None,
            (TransportMode::Push, _) => Some(now + self.config.poll_interval),
        };
    }

    /// Earliest instant at which [`Notifier::begin_fetch`] may succeed.
    pub fn next_deadline(&self, now: Instant) -> Option<Instant> {
        if self.in_flight {
            return self.debounce.deadline();
        }
        if self.signalled {
            return Some(now);
        }
        match (self.next_poll, self.debounce.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Classifies a failed fetch.
    ///
    /// The first failure of a streak is logged at `warn`; repeats until the
    /// next successful or busy fetch go to `debug`.
    pub fn classify_error(&self, err: &TransportError) -> FetchOutcome {
        if err.is_busy() {
            debug!("Session busy, retrying later");
            return FetchOutcome::Busy;
        }
        if self.failing() {
            debug!(kind = %err.kind, error = %err, "Snapshot fetch still failing");
        } else {
            warn!(kind = %err.kind, error = %err, "Snapshot fetch failed");
        }
        FetchOutcome::Failed
    }

    fn failing(&self) -> bool {
        self.last_outcome == Some(FetchOutcome::Failed)
    }
}

fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

async fn next_push_event(
    events: &mut Option<mpsc::UnboundedReceiver<PushEvent>>,
) -> Option<PushEvent> {
    match events {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

/// Runs `notifier` against `source` until `cancel` fires.
///
/// Every fetched snapshot is handed to `on_snapshot`. Fetch failures never
/// end the loop.
///
/// # Errors
/// Currently infallible; the `Result` leaves room for fatal transport setup.
pub async fn drive<S, F>(
    source: &S,
    mut events: Option<mpsc::UnboundedReceiver<PushEvent>>,
    mut notifier: Notifier,
    cancel: CancellationToken,
    mut on_snapshot: F,
) -> Result<()>
where
    S: SnapshotSource,
    F: FnMut(Snapshot),
{
    info!(mode = %notifier.mode(), "Watching session");
    loop {
        if cancel.is_cancelled() {
            return Ok(());
        }

        if notifier.begin_fetch(now()) {
            let result = tokio::select! {
                () = cancel.cancelled() => return Ok(()),
                result = source.fetch_snapshot() => result,
            };
            let outcome = match result {
                Ok(snapshot) => {
                    on_snapshot(snapshot);
                    FetchOutcome::Applied
                }
                Err(err) => notifier.classify_error(&err),
            };
            notifier.finish_fetch(now(), outcome);
            continue;
        }

        let current = now();
        let wait = notifier
            .next_deadline(current)
            .map_or(IDLE_WAIT, |at| at.saturating_duration_since(current));

        tokio::select! {
            () = cancel.cancelled() => return Ok(()),
            () = tokio::time::sleep(wait) => {}
            event = next_push_event(&mut events) => match event {
                Some(PushEvent::Signal) => notifier.on_signal(now()),
                Some(PushEvent::Connected) => {
                    info!("Push channel connected");
                    // Anything may have changed while disconnected.
                    notifier.on_signal(now());
                }
                Some(PushEvent::Disconnected) => warn!("Push channel disconnected"),
                None => events = None,
            },
        }
    }
}
