//! Trailing-edge debounce as an explicit scheduled task.
//!
//! A `Debouncer` holds at most one pending deadline. Every `schedule` call
//! pushes the deadline out to `now + delay`; the owner polls `take_due` from
//! its tick and runs the debounced work when it returns true.

use std::time::{Duration, Instant};

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

    /// Resets the quiescence window. Any earlier pending call is superseded.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true exactly once per window, when the deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
