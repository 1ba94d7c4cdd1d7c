use std::time::{Duration, Instant};

/// A timer that "rings" once its interval has elapsed, in the style of a
/// heartbeat timer: check with `ringing()`, acknowledge with `reset()`.
pub struct Timer {
    duration: Duration,
    last: Instant,
}

impl Timer {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            last: Instant::now(),
        }
    }

    /// Returns whether the interval has elapsed since the last reset.
    pub fn ringing(&self) -> bool {
        self.last.elapsed() >= self.duration
    }

    /// Restarts the interval from now.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }
}
