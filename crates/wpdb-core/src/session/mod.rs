//! Session data: snapshots in, mirrored state and command history.

pub mod history;
pub mod snapshot;
pub mod state;

pub use history::{CommandHistory, HISTORY_CAPACITY};
pub use snapshot::{FrameData, NO_LINE, Snapshot, VariableScopes};
pub use state::{FrameView, SessionState};
