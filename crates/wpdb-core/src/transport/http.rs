//! HTTP transport: snapshot polling and command posting.

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::runtime::Handle;
use tracing::{debug, warn};
use url::Url;

use super::{
    CommandSink, SnapshotSource, TransportError, TransportErrorKind, TransportResult,
    classify_reqwest_error,
};
use crate::session::Snapshot;

const FRAME_DATA_PATH: &str = "frame-data";
const CONSOLE_HISTORY_PATH: &str = "console-history";
const INPUT_PATH: &str = "input";

/// Client for one debugger session's HTTP endpoints.
#[derive(Debug, Clone)]
pub struct SessionClient {
    http: reqwest::Client,
    base: Url,
}

impl SessionClient {
    /// Creates a client rooted at `base` (e.g. `http://127.0.0.1:5555/`).
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base: Url, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            base: with_trailing_slash(base),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> TransportResult<Url> {
        self.base.join(path).map_err(|e| {
            TransportError::new(
                TransportErrorKind::Connect,
                format!("Invalid endpoint '{path}': {e}"),
            )
        })
    }

    async fn get_text(&self, path: &str) -> TransportResult<String> {
        let url = self.endpoint(path)?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;
        if !status.is_success() {
            return Err(TransportError::http_status(status.as_u16(), &body));
        }
        Ok(body)
    }

    /// `GET /frame-data`.
    ///
    /// # Errors
    /// Fails on network errors, non-success status or a non-JSON body.
    pub async fn fetch_snapshot(&self) -> TransportResult<Snapshot> {
        let body = self.get_text(FRAME_DATA_PATH).await?;
        Snapshot::parse(&body).map_err(|e| TransportError::parse(&e, &body))
    }

    /// `GET /console-history`: the full transcript so far.
    ///
    /// # Errors
    /// Fails on network errors or non-success status.
    pub async fn fetch_console_history(&self) -> TransportResult<String> {
        self.get_text(CONSOLE_HISTORY_PATH).await
    }

    /// `POST /input` with one line-terminated command.
    ///
    /// # Errors
    /// Fails on network errors or non-success status.
    pub async fn post_command(&self, line: &str) -> TransportResult<()> {
        let url = self.endpoint(INPUT_PATH)?;
        let response = self
            .http
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(line.to_string())
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::http_status(status.as_u16(), &body));
        }
        Ok(())
    }
}

impl SnapshotSource for SessionClient {
    fn fetch_snapshot(&self) -> impl Future<Output = TransportResult<Snapshot>> + Send {
        SessionClient::fetch_snapshot(self)
    }
}

/// Posts commands in the background; the HTTP channel is always open.
#[derive(Debug, Clone)]
pub struct HttpCommandSink {
    client: SessionClient,
    runtime: Handle,
}

impl HttpCommandSink {
    pub fn new(client: SessionClient, runtime: Handle) -> Self {
        Self { client, runtime }
    }
}

impl CommandSink for HttpCommandSink {
    fn is_open(&self) -> bool {
        true
    }

    fn send_line(&self, line: &str) -> TransportResult<()> {
        let client = self.client.clone();
        let line = line.to_string();
        self.runtime.spawn(async move {
            match client.post_command(&line).await {
                Ok(()) => debug!(command = line.trim_end(), "Command posted"),
                Err(e) => warn!(command = line.trim_end(), error = %e, "Command rejected"),
            }
        });
        Ok(())
    }
}

pub(super) fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
