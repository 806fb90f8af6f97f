//! Transports between the console and a remote debugger session.
//!
//! Two deployment shapes are supported and chosen per session:
//! - `Poll`: the client fetches `/frame-data` on a timer and posts commands to `/input`.
//! - `Push`: the backend signals changes over a WebSocket; the client fetches on signal
//!   and sends commands as text frames on the same socket.
//!
//! The reconciler never talks to a transport directly. It receives snapshots from
//! whoever drives the [`notifier::Notifier`], and commands leave through a
//! [`CommandSink`].

pub mod http;
pub mod notifier;
pub mod ws;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::session::Snapshot;

/// How updates reach the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// Fetch the latest snapshot on a fixed interval.
    #[default]
    Poll,
    /// Fetch only after the backend signals a change over a WebSocket.
    Push,
}

impl TransportMode {
    pub fn display_name(self) -> &'static str {
        match self {
            TransportMode::Poll => "poll",
            TransportMode::Push => "push",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for TransportMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "poll" | "http" => Ok(TransportMode::Poll),
            "push" | "ws" | "websocket" => Ok(TransportMode::Push),
            other => anyhow::bail!("Invalid transport mode '{other}'. Valid options: poll, push"),
        }
    }
}

/// Categories of transport failures.
///
/// The notifier only distinguishes `Forbidden` (the session is busy between
/// commands and cannot serve state) from everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Non-success HTTP status other than 403.
    HttpStatus,
    /// HTTP 403: the session refused to serve state right now.
    Forbidden,
    /// Request or connect timed out.
    Timeout,
    /// Could not reach the backend.
    Connect,
    /// Response body was not a valid snapshot.
    Parse,
    /// The channel is not open.
    Closed,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportErrorKind::HttpStatus => write!(f, "http_status"),
            TransportErrorKind::Forbidden => write!(f, "forbidden"),
            TransportErrorKind::Timeout => write!(f, "timeout"),
            TransportErrorKind::Connect => write!(f, "connect"),
            TransportErrorKind::Parse => write!(f, "parse"),
            TransportErrorKind::Closed => write!(f, "closed"),
        }
    }
}

/// Structured transport error with kind and details.
#[derive(Debug, Clone)]
pub struct TransportError {
    pub kind: TransportErrorKind,
    /// One-line summary suitable for the status line.
    pub message: String,
    /// Raw body or underlying error text, if any.
    pub details: Option<String>,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    /// Creates an error from a non-success HTTP status.
    pub fn http_status(status: u16, body: &str) -> Self {
        let kind = if status == 403 {
            TransportErrorKind::Forbidden
        } else {
            TransportErrorKind::HttpStatus
        };
        Self {
            kind,
            message: format!("HTTP {status}"),
            details: (!body.is_empty()).then(|| body.to_string()),
        }
    }

    pub fn parse(err: &serde_json::Error, body: &str) -> Self {
        Self {
            kind: TransportErrorKind::Parse,
            message: format!("Invalid snapshot: {err}"),
            details: (!body.is_empty()).then(|| body.to_string()),
        }
    }

    pub fn closed() -> Self {
        Self::new(TransportErrorKind::Closed, "Channel is not open")
    }

    /// True when the backend is alive but busy.
    pub fn is_busy(&self) -> bool {
        self.kind == TransportErrorKind::Forbidden
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TransportError {}

pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Maps a reqwest failure onto a transport error kind.
pub fn classify_reqwest_error(e: &reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::new(TransportErrorKind::Timeout, format!("Request timed out: {e}"))
    } else if e.is_connect() {
        TransportError::new(TransportErrorKind::Connect, format!("Connection failed: {e}"))
    } else if e.is_decode() || e.is_body() {
        TransportError::new(TransportErrorKind::Parse, format!("Bad response body: {e}"))
    } else {
        TransportError::new(
            TransportErrorKind::HttpStatus,
            format!("Network error: {e}"),
        )
    }
}

/// Where outbound command lines go.
///
/// Implementations must not block: a line is either handed off immediately
/// or refused. Nothing is queued for later delivery.
pub trait CommandSink {
    /// Whether the channel can currently accept a line.
    fn is_open(&self) -> bool;

    /// Hands one `\n`-terminated line to the channel.
    ///
    /// # Errors
    /// Returns `Closed` if the channel went away between `is_open` and the send.
    fn send_line(&self, line: &str) -> TransportResult<()>;
}

/// Something that can produce the latest snapshot on request.
pub trait SnapshotSource {
    /// Fetches the latest snapshot.
    fn fetch_snapshot(&self) -> impl Future<Output = TransportResult<Snapshot>> + Send;
}
