//! Ctrl+C handling for headless commands.
//!
//! The first Ctrl+C cancels the returned token so loops wind down. A second
//! one exits immediately with status 130.

use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

#[derive(Debug)]
pub struct InterruptedError;

impl std::fmt::Display for InterruptedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Interrupted")
    }
}

impl std::error::Error for InterruptedError {}

/// Installs the Ctrl+C handler and returns a token it cancels.
///
/// # Errors
/// Returns an error if a handler is already registered.
pub fn install() -> Result<CancellationToken> {
    let token = CancellationToken::new();
    let handler_token = token.clone();
    ctrlc::set_handler(move || {
        if INTERRUPTED.swap(true, Ordering::SeqCst) {
            std::process::exit(130);
        }
        handler_token.cancel();
    })
    .context("Failed to set Ctrl+C handler")?;
    Ok(token)
}

/// Whether Ctrl+C was pressed since startup.
pub fn is_interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}
