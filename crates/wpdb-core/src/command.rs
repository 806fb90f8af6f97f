//! Debugger commands the operator can issue without typing them.

use std::fmt;

/// Single-letter pdb commands bound to keys and buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DebuggerCommand {
    Next,
    Step,
    Return,
    Continue,
    Up,
    Down,
    Where,
}

impl DebuggerCommand {
    pub const ALL: [DebuggerCommand; 7] = [
        DebuggerCommand::Next,
        DebuggerCommand::Step,
        DebuggerCommand::Return,
        DebuggerCommand::Continue,
        DebuggerCommand::Up,
        DebuggerCommand::Down,
        DebuggerCommand::Where,
    ];

    /// Text sent to the debugger.
    pub fn as_str(self) -> &'static str {
        match self {
            DebuggerCommand::Next => "n",
            DebuggerCommand::Step => "s",
            DebuggerCommand::Return => "r",
            DebuggerCommand::Continue => "c",
            DebuggerCommand::Up => "u",
            DebuggerCommand::Down => "d",
            DebuggerCommand::Where => "w",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DebuggerCommand::Next => "Next",
            DebuggerCommand::Step => "Step",
            DebuggerCommand::Return => "Return",
            DebuggerCommand::Continue => "Continue",
            DebuggerCommand::Up => "Up",
            DebuggerCommand::Down => "Down",
            DebuggerCommand::Where => "Where",
        }
    }

    /// Function-key binding, if any, as shown in help and on buttons.
    pub fn key_hint(self) -> Option<&'static str> {
        match self {
            DebuggerCommand::Next => Some("F10"),
            DebuggerCommand::Step => Some("F11"),
            DebuggerCommand::Return => Some("Shift+F11"),
            DebuggerCommand::Continue => Some("F8"),
            DebuggerCommand::Up | DebuggerCommand::Down | DebuggerCommand::Where => None,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            DebuggerCommand::Next => "Run to the next line in the current function",
            DebuggerCommand::Step => "Step into the call on the current line",
            DebuggerCommand::Return => "Run until the current function returns",
            DebuggerCommand::Continue => "Continue until the next breakpoint",
            DebuggerCommand::Up => "Move one frame up the stack",
            DebuggerCommand::Down => "Move one frame down the stack",
            DebuggerCommand::Where => "Print the stack trace",
        }
    }
}

impl fmt::Display for DebuggerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A key press reduced to what the fixed keymap cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    /// Function key number (`F1` = 1).
    pub function: u8,
    pub shift: bool,
}

impl KeyChord {
    pub fn function(n: u8) -> Self {
        Self {
            function: n,
            shift: false,
        }
    }

    #[must_use]
    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Command bound to this chord.
    pub fn command(self) -> Option<DebuggerCommand> {
        match (self.function, self.shift) {
            (10, _) => Some(DebuggerCommand::Next),
            (11, false) => Some(DebuggerCommand::Step),
            (11, true) => Some(DebuggerCommand::Return),
            (8, _) => Some(DebuggerCommand::Continue),
            _ => None,
        }
    }
}

/// Entries of the button bar, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Command(DebuggerCommand),
    Help,
    Send,
}

impl Button {
    pub const BAR: [Button; 9] = [
        Button::Command(DebuggerCommand::Next),
        Button::Command(DebuggerCommand::Step),
        Button::Command(DebuggerCommand::Return),
        Button::Command(DebuggerCommand::Continue),
        Button::Command(DebuggerCommand::Up),
        Button::Command(DebuggerCommand::Down),
        Button::Command(DebuggerCommand::Where),
        Button::Help,
        Button::Send,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Button::Command(command) => command.label(),
            Button::Help => "Help",
            Button::Send => "Send",
        }
    }
}

/// Toggle command for a listing line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BreakpointCommand {
    Set { path: String, line: u32 },
    Clear { path: String, line: u32 },
}

impl fmt::Display for BreakpointCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreakpointCommand::Set { path, line } => write!(f, "b {path}:{line}"),
            BreakpointCommand::Clear { path, line } => write!(f, "cl {path}:{line}"),
        }
    }
}
