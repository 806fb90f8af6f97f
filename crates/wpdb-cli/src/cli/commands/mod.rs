//! CLI command handlers.

pub mod attach;
pub mod config;
pub mod send;
pub mod snapshot;
pub mod watch;
