//! WebSocket push channel.
//!
//! Every inbound frame means "something changed"; its payload is not
//! interpreted. Outbound command lines travel as text frames on the same
//! socket.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use super::http::with_trailing_slash;
use super::{CommandSink, TransportError, TransportResult};

/// Events reported by the push channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushEvent {
    Connected,
    Disconnected,
    /// The backend announced a change.
    Signal,
}

/// Handle to a background WebSocket connection.
///
/// Cloning shares the same connection.
#[derive(Debug, Clone)]
pub struct PushChannel {
    outbound: mpsc::UnboundedSender<String>,
    open: Arc<AtomicBool>,
}

impl PushChannel {
    /// Spawns the connection task on the current tokio runtime.
    ///
    /// The task reconnects after `reconnect` until `cancel` fires.
    pub fn spawn(
        url: Url,
        reconnect: Duration,
        cancel: CancellationToken,
    ) -> (Self, mpsc::UnboundedReceiver<PushEvent>) {
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let open = Arc::new(AtomicBool::new(false));

        tokio::spawn(run(
            url,
            reconnect,
            cancel,
            outbound_rx,
            event_tx,
            Arc::clone(&open),
        ));

        (Self { outbound, open }, event_rx)
    }
}

impl CommandSink for PushChannel {
    fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    fn send_line(&self, line: &str) -> TransportResult<()> {
        self.outbound
            .send(line.to_string())
            .map_err(|_closed| TransportError::closed())
    }
}

/// Derives the push endpoint from the session's HTTP base URL.
///
/// `path` is always resolved under the base path, with or without a leading
/// `/`, the same way the HTTP endpoints are.
///
/// # Errors
/// Returns an error if `base` is not http(s) or `path` does not join.
pub fn push_url(base: &Url, path: &str) -> Result<Url> {
    let mut url = with_trailing_slash(base.clone())
        .join(path.trim_start_matches('/'))
        .with_context(|| format!("Invalid push path '{path}'"))?;
    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => anyhow::bail!("Unsupported URL scheme '{other}'"),
    };
    url.set_scheme(scheme)
        .map_err(|()| anyhow::anyhow!("Cannot switch '{base}' to {scheme}"))?;
    Ok(url)
}

async fn run(
    url: Url,
    reconnect: Duration,
    cancel: CancellationToken,
    mut outbound: mpsc::UnboundedReceiver<String>,
    events: mpsc::UnboundedSender<PushEvent>,
    open: Arc<AtomicBool>,
) {
    loop {
        // Commands issued while disconnected were already dropped by the
        // dispatcher; anything still buffered is stale.
        while outbound.try_recv().is_ok() {}

        tokio::select! {
            () = cancel.cancelled() => break,
            result = session(&url, &mut outbound, &events, &open) => {
                open.store(false, Ordering::Release);
                match result {
                    Ok(()) => info!(url = %url, "Push channel closed"),
                    Err(e) => warn!(url = %url, error = %e, "Push channel error"),
                }
                if events.send(PushEvent::Disconnected).is_err() {
                    break;
                }
            }
        }

        tokio::select! {
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(reconnect) => debug!("Reconnecting push channel"),
        }
    }
    open.store(false, Ordering::Release);
}

async fn session(
    url: &Url,
    outbound: &mut mpsc::UnboundedReceiver<String>,
    events: &mpsc::UnboundedSender<PushEvent>,
    open: &AtomicBool,
) -> Result<()> {
    let (stream, _) = connect_async(url.as_str())
        .await
        .with_context(|| format!("Failed to connect to {url}"))?;
    let (mut ws_tx, mut ws_rx) = stream.split();

    info!(url = %url, "Push channel connected");
    open.store(true, Ordering::Release);
    let _ = events.send(PushEvent::Connected);

    loop {
        tokio::select! {
            line = outbound.recv() => {
                let Some(line) = line else { return Ok(()) };
                ws_tx
                    .send(Message::Text(line))
                    .await
                    .context("Failed to send command")?;
            }
            msg = ws_rx.next() => match msg {
                Some(Ok(Message::Text(_) | Message::Binary(_))) => {
                    if events.send(PushEvent::Signal).is_err() {
                        return Ok(());
                    }
                }
                Some(Ok(Message::Close(_))) | None => return Ok(()),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e).context("WebSocket read failed"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_url_switches_scheme() {
        let base = Url::parse("http://127.0.0.1:5555/").unwrap();
        assert_eq!(push_url(&base, "/ws").unwrap().as_str(), "ws://127.0.0.1:5555/ws");

        let base = Url::parse("https://debug.example.com/app/").unwrap();
        assert_eq!(
            push_url(&base, "ws").unwrap().as_str(),
            "wss://debug.example.com/app/ws"
        );
    }

    #[test]
    fn test_push_url_keeps_base_path_prefix() {
        for base in ["http://10.0.0.5:8080/debug/", "http://10.0.0.5:8080/debug"] {
            let base = Url::parse(base).unwrap();
            for path in ["/ws", "ws"] {
                assert_eq!(
                    push_url(&base, path).unwrap().as_str(),
                    "ws://10.0.0.5:8080/debug/ws"
                );
            }
        }
    }

    #[test]
    fn test_push_url_rejects_other_schemes() {
        let base = Url::parse("ftp://example.com/").unwrap();
        assert!(push_url(&base, "/ws").is_err());
    }

    #[tokio::test]
    async fn test_channel_closed_until_connected() {
        let cancel = CancellationToken::new();
        let url = Url::parse("ws://127.0.0.1:9/ws").unwrap();
        let (channel, _events) = PushChannel::spawn(url, Duration::from_secs(60), cancel.clone());

        assert!(!channel.is_open());
        cancel.cancel();
    }
}
