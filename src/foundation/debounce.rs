use std::time::{Duration, Instant};

/// Trailing-edge debounce timer driven by caller-supplied timestamps.
///
/// Every [`Debouncer::schedule`] restarts the pending deadline, so a burst of
/// notifications collapses into one firing `delay` after the last of them.
#[derive(Clone, Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Create an idle debouncer.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Configured delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm (or re-arm) the timer relative to `now`.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Drop any pending firing.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Whether a firing is pending.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns `true` exactly once when the pending deadline has passed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/debounce.rs"]
mod tests;
