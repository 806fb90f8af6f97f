//! Coalesces bursts of change signals into a single fire.

use std::time::{Duration, Instant};

/// Pending flag plus a fixed-delay deadline.
///
/// The first signal arms the deadline. Signals that arrive while armed are
/// absorbed. Once the deadline passes, [`Debouncer::fire`] reports it exactly
/// once and the next signal starts a new window.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Records a signal at `now`.
    pub fn signal(&mut self, now: Instant) {
        if self.deadline.is_none() {
            self.deadline = Some(now + self.delay);
        }
    }

    /// Returns true once per window when the deadline has passed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}
