//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O only; the reducer never touches the network.

use wpdb_core::dispatch::OutboundCommand;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Fetch `/frame-data`; the result arrives as `UiEvent::SnapshotFetched`.
    FetchSnapshot,

    /// Fetch the full console transcript once at attach.
    FetchConsoleHistory,

    /// Hand a prepared command to the active command sink.
    SendCommand { command: OutboundCommand },
}
