//! Watch command: follow a session without a terminal UI.
//!
//! Console output goes to stdout as it arrives; moves and errors are logged
//! to stderr. Runs until Ctrl+C or until stdout goes away.

use std::io::{self, Write, stdout};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, warn};
use wpdb_core::config::Config;
use wpdb_core::interrupt::{self, InterruptedError};
use wpdb_core::logging::{self, LogSink};
use wpdb_core::reconcile::{reconcile, seed_console};
use wpdb_core::session::{SessionState, Snapshot};
use wpdb_core::transport::TransportMode;
use wpdb_core::transport::http::SessionClient;
use wpdb_core::transport::notifier::{self, Notifier};
use wpdb_core::transport::ws::{PushChannel, push_url};

/// Session state plus the sink its console growth is echoed to.
struct Follower<W: Write> {
    session: SessionState,
    out: W,
}

impl<W: Write> Follower<W> {
    fn new(out: W) -> Self {
        Self {
            session: SessionState::new(),
            out,
        }
    }

    fn seed(&mut self, transcript: &str) -> io::Result<()> {
        if seed_console(&mut self.session, transcript) {
            self.out.write_all(transcript.as_bytes())?;
            self.out.flush()?;
        }
        Ok(())
    }

    fn apply(&mut self, snapshot: Snapshot) -> io::Result<()> {
        let before = self.session.console_history().len();
        let instruction = reconcile(&mut self.session, snapshot);
        if instruction.console_grew {
            self.out
                .write_all(self.session.console_history()[before..].as_bytes())?;
            self.out.flush()?;
        }
        if let Some(line) = instruction.scroll_to_line {
            let file = self.session.frame().source_path().unwrap_or_default();
            info!(file = %file, line, "Stopped");
        }
        Ok(())
    }
}

pub async fn run(config: &Config) -> Result<()> {
    let _guard = logging::init(&config.log, LogSink::Stderr)?;
    let cancel = interrupt::install()?;

    let base = config.base_url()?;
    let client = SessionClient::new(base.clone(), config.request_timeout())?;
    let mut follower = Follower::new(stdout());

    match client.fetch_console_history().await {
        Ok(transcript) => follower.seed(&transcript).context("write console output")?,
        Err(e) => warn!(error = %e, "Console history unavailable"),
    }

    // The channel handle must outlive `drive`; dropping it closes the socket.
    let (push_channel, events) = match config.mode {
        TransportMode::Poll => (None, None),
        TransportMode::Push => {
            let url = push_url(&base, &config.push.ws_path)?;
            let (channel, events) = PushChannel::spawn(url, config.reconnect_delay(), cancel.clone());
            (Some(channel), Some(events))
        }
    };

    let notifier = Notifier::new(config.notifier_config(), Instant::now());
    let stop = cancel.clone();
    let mut write_error = None;
    notifier::drive(&client, events, notifier, cancel, |snapshot| {
        if let Err(e) = follower.apply(snapshot) {
            write_error = Some(e);
            stop.cancel();
        }
    })
    .await?;
    drop(push_channel);

    if let Some(e) = write_error {
        return Err(e).context("write console output");
    }
    if interrupt::is_interrupted() {
        return Err(InterruptedError.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::ErrorKind::BrokenPipe.into())
        }
    }

    fn output(delta: &str) -> Snapshot {
        Snapshot {
            console_delta: delta.to_string(),
            ..Snapshot::default()
        }
    }

    #[test]
    fn test_echoes_only_new_console_text() {
        let mut follower = Follower::new(Vec::new());
        follower.seed("(Pdb) ").unwrap();
        follower.apply(output("n\n")).unwrap();
        follower.apply(Snapshot::default()).unwrap();
        follower.apply(output("> app.py(4)\n")).unwrap();

        assert_eq!(
            String::from_utf8(follower.out).unwrap(),
            "(Pdb) n\n> app.py(4)\n"
        );
    }

    #[test]
    fn test_closed_stdout_is_an_error() {
        let mut follower = Follower::new(ClosedPipe);
        let err = follower.apply(output("n\n")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);

        // Nothing to write means nothing to fail.
        assert!(follower.apply(Snapshot::default()).is_ok());
    }
}
