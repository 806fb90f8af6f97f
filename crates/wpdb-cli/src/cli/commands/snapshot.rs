//! Snapshot command: fetch `/frame-data` once and print it.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use serde_json::json;
use wpdb_core::config::Config;
use wpdb_core::reconcile::reconcile;
use wpdb_core::session::{SessionState, Snapshot};
use wpdb_core::transport::http::SessionClient;

pub async fn run(config: &Config, as_json: bool) -> Result<()> {
    let client = SessionClient::new(config.base_url()?, config.request_timeout())?;
    let snapshot = client
        .fetch_snapshot()
        .await
        .with_context(|| format!("fetch snapshot from {}", client.base_url()))?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&snapshot_json(&snapshot))?);
    } else {
        let mut session = SessionState::new();
        reconcile(&mut session, snapshot);
        print!("{}", summary(&session));
    }
    Ok(())
}

fn snapshot_json(snapshot: &Snapshot) -> serde_json::Value {
    json!({
        "dirname": snapshot.dirname,
        "filename": snapshot.current_file,
        "current_line": snapshot.current_line,
        "breakpoints": snapshot.breakpoints,
        "globals": snapshot.variable_scopes.globals,
        "locals": snapshot.variable_scopes.locals,
        "file_listing": snapshot.file_listing,
        "console_history": snapshot.console_delta,
    })
}

fn summary(session: &SessionState) -> String {
    let frame = session.frame();
    let mut out = String::new();

    match (frame.source_path(), session.is_stopped()) {
        (Some(path), true) => {
            let _ = writeln!(out, "Stopped at {path}:{}", session.last_line());
        }
        (Some(path), false) => {
            let _ = writeln!(out, "Showing {path} (not stopped)");
        }
        (None, _) => out.push_str("No source displayed\n"),
    }

    let breakpoints: Vec<String> = session.breakpoints().iter().map(u32::to_string).collect();
    if breakpoints.is_empty() {
        out.push_str("Breakpoints: none\n");
    } else {
        let _ = writeln!(out, "Breakpoints: {}", breakpoints.join(", "));
    }

    if !frame.locals.is_empty() {
        let _ = writeln!(out, "\nLocals:\n{}", frame.locals.trim_end());
    }
    out
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn test_summary_of_stopped_session() {
        let mut session = SessionState::new();
        reconcile(
            &mut session,
            Snapshot {
                dirname: Some("/srv/app/".into()),
                current_file: Some("a.py".into()),
                current_line: Some(42),
                breakpoints: Some(BTreeSet::from([10, 42])),
                ..Snapshot::default()
            },
        );

        let text = summary(&session);
        assert!(text.contains("Stopped at /srv/app/a.py:42"));
        assert!(text.contains("Breakpoints: 10, 42"));
    }

    #[test]
    fn test_summary_of_empty_session() {
        let text = summary(&SessionState::new());
        assert!(text.contains("No source displayed"));
        assert!(text.contains("Breakpoints: none"));
    }
}
