//! Full-screen terminal console for a remote web-pdb session.
//!
//! Elm-style: `update` is the only place state changes, `render` only reads,
//! and `runtime` executes the effects `update` returns.

pub mod effects;
pub mod events;
pub mod features;
pub mod keymap;
pub mod layout;
pub mod overlays;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, Write, stderr, stdout};

use anyhow::Result;
pub use runtime::TuiRuntime;
use wpdb_core::config::Config;

/// Attaches to the session at `config.url` and runs until the operator quits.
///
/// # Errors
/// Returns an error when stdout is not a terminal, the URL is invalid, or
/// the terminal cannot be driven.
pub fn run(config: &Config) -> Result<()> {
    if !stdout().is_terminal() {
        anyhow::bail!(
            "The console needs a terminal.\n\
             Use `wpdb watch` or `wpdb snapshot` for non-interactive use."
        );
    }

    let mut runtime = TuiRuntime::new(config)?;
    runtime.run()?;

    writeln!(stderr(), "Detached from {}", config.url)?;
    Ok(())
}
