//! UI event types.
//!
//! Every external input (terminal, fetch results, push channel, timers) is
//! converted to a `UiEvent` before it reaches the reducer. Events that the
//! reducer needs a clock for carry their own `Instant`, so the reducer never
//! reads the time itself.

use std::time::Instant;

use crossterm::event::Event as CrosstermEvent;
use wpdb_core::dispatch::DispatchOutcome;
use wpdb_core::session::Snapshot;
use wpdb_core::transport::TransportError;
use wpdb_core::transport::ws::PushEvent;

#[derive(Debug)]
pub enum UiEvent {
    /// Periodic timer tick.
    Tick { now: Instant },

    /// Current terminal size, prepended to every batch of events.
    Frame { width: u16, height: u16 },

    /// Raw terminal input.
    Terminal(CrosstermEvent),

    /// A `/frame-data` fetch finished.
    SnapshotFetched {
        result: Result<Snapshot, TransportError>,
        finished_at: Instant,
    },

    /// The attach-time `/console-history` fetch finished.
    ConsoleHistoryLoaded { result: Result<String, TransportError> },

    /// Something happened on the push channel.
    Push { event: PushEvent, at: Instant },

    /// A command left (or failed to leave) through the sink.
    CommandDelivered {
        command: String,
        outcome: DispatchOutcome,
    },
}
