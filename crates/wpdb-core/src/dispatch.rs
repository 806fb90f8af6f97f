//! Turns operator input into outbound command lines.
//!
//! Dispatch is fire-and-forget: a line goes out at most once, and a channel
//! that is not open drops it. History is updated either way, since the
//! operator did issue the command.

use tracing::debug;

use crate::session::CommandHistory;
use crate::transport::CommandSink;

/// A normalized, line-terminated command ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundCommand {
    line: String,
}

impl OutboundCommand {
    /// Builds the wire form of `raw`: exactly one trailing `\n`.
    pub fn new(raw: &str) -> Self {
        let mut line = raw.trim_end_matches(['\r', '\n']).to_string();
        line.push('\n');
        Self { line }
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    /// Command text without the terminator.
    pub fn text(&self) -> &str {
        self.line.trim_end_matches('\n')
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Sent,
    Dropped,
}

/// Records `raw` in history and builds the outbound line.
///
/// Empty input produces a bare `\n` (pdb repeats the previous command) and
/// is not recorded.
pub fn prepare(history: &mut CommandHistory, raw: &str) -> OutboundCommand {
    let command = OutboundCommand::new(raw);
    history.record(command.text());
    history.reset_cursor();
    command
}

/// Hands a prepared command to the sink.
pub fn deliver(sink: &dyn CommandSink, command: &OutboundCommand) -> DispatchOutcome {
    if !sink.is_open() {
        debug!(command = command.text(), "Channel closed, dropping command");
        return DispatchOutcome::Dropped;
    }
    match sink.send_line(command.line()) {
        Ok(()) => DispatchOutcome::Sent,
        Err(e) => {
            debug!(command = command.text(), error = %e, "Send failed, dropping command");
            DispatchOutcome::Dropped
        }
    }
}

/// [`prepare`] then [`deliver`].
pub fn dispatch(history: &mut CommandHistory, sink: &dyn CommandSink, raw: &str) -> DispatchOutcome {
    let command = prepare(history, raw);
    deliver(sink, &command)
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::transport::{TransportError, TransportResult};

    #[derive(Default)]
    struct RecordingSink {
        closed: Cell<bool>,
        fail: Cell<bool>,
        lines: RefCell<Vec<String>>,
    }

    impl CommandSink for RecordingSink {
        fn is_open(&self) -> bool {
            !self.closed.get()
        }

        fn send_line(&self, line: &str) -> TransportResult<()> {
            if self.fail.get() {
                return Err(TransportError::closed());
            }
            self.lines.borrow_mut().push(line.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_dispatch_appends_newline_and_records() {
        let sink = RecordingSink::default();
        let mut history = CommandHistory::new();

        assert_eq!(dispatch(&mut history, &sink, "p x"), DispatchOutcome::Sent);
        assert_eq!(sink.lines.borrow().as_slice(), ["p x\n"]);
        assert_eq!(history.get(0), Some("p x"));
    }

    #[test]
    fn test_dispatch_resets_cursor() {
        let sink = RecordingSink::default();
        let mut history = CommandHistory::new();
        dispatch(&mut history, &sink, "a");
        dispatch(&mut history, &sink, "b");
        history.older();
        assert!(history.cursor().is_some());

        dispatch(&mut history, &sink, "b");
        assert_eq!(history.cursor(), None);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_empty_input_is_sent_but_not_recorded() {
        let sink = RecordingSink::default();
        let mut history = CommandHistory::new();

        assert_eq!(dispatch(&mut history, &sink, ""), DispatchOutcome::Sent);
        assert_eq!(sink.lines.borrow().as_slice(), ["\n"]);
        assert!(history.is_empty());
    }

    #[test]
    fn test_closed_sink_drops_without_queueing() {
        let sink = RecordingSink::default();
        sink.closed.set(true);
        let mut history = CommandHistory::new();

        assert_eq!(dispatch(&mut history, &sink, "c"), DispatchOutcome::Dropped);
        sink.closed.set(false);
        assert!(sink.lines.borrow().is_empty());
        // The operator still issued it.
        assert_eq!(history.get(0), Some("c"));
    }

    #[test]
    fn test_failed_send_is_dropped() {
        let sink = RecordingSink::default();
        sink.fail.set(true);
        let mut history = CommandHistory::new();
        assert_eq!(dispatch(&mut history, &sink, "n"), DispatchOutcome::Dropped);
    }

    #[test]
    fn test_existing_terminator_not_doubled() {
        assert_eq!(OutboundCommand::new("w\n").line(), "w\n");
        assert_eq!(OutboundCommand::new("w\r\n").line(), "w\n");
        assert_eq!(OutboundCommand::new("w").text(), "w");
    }
}
