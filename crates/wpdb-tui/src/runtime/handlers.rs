//! Effect handlers for the TUI runtime.
//!
//! Handlers are pure async functions that return a `UiEvent`. The runtime
//! spawns them and forwards the result to the inbox.

use std::time::Instant;

use tokio::sync::mpsc;
use wpdb_core::transport::http::SessionClient;
use wpdb_core::transport::ws::PushEvent;

use super::inbox::UiEventSender;
use crate::events::UiEvent;

pub async fn fetch_snapshot(client: SessionClient) -> UiEvent {
    let result = client.fetch_snapshot().await;
    UiEvent::SnapshotFetched {
        result,
        finished_at: Instant::now(),
    }
}

pub async fn fetch_console_history(client: SessionClient) -> UiEvent {
    UiEvent::ConsoleHistoryLoaded {
        result: client.fetch_console_history().await,
    }
}

/// Stamps push channel events and moves them into the inbox.
pub async fn forward_push_events(mut events: mpsc::UnboundedReceiver<PushEvent>, inbox: UiEventSender) {
    while let Some(event) = events.recv().await {
        let stamped = UiEvent::Push {
            event,
            at: Instant::now(),
        };
        if inbox.send(stamped).is_err() {
            break;
        }
    }
}
