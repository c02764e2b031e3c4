//! Exponential retry backoff for failing endpoints.

use std::time::Duration;

/// Upper bound on the growth of the retry interval.
pub const MAX_BACKOFF: Duration = Duration::from_secs(5 * 60);

/// Multiplier applied to the interval after each failure.
pub const BACKOFF_FACTOR: u32 = 2;

/// Double `current`, capped at [`MAX_BACKOFF`].
pub fn next_interval(current: Duration) -> Duration {
    current
        .checked_mul(BACKOFF_FACTOR)
        .map_or(MAX_BACKOFF, |next| next.min(MAX_BACKOFF))
}

/// Per-endpoint backoff state.
///
/// A failure sleeps for the current interval and then grows it; a success
/// always sleeps for the normal interval and clears any accumulated growth.
#[derive(Debug, Clone)]
pub struct Backoff {
    normal: Duration,
    current: Duration,
}

impl Backoff {
    pub fn new(normal: Duration) -> Self {
        Self {
            normal,
            current: normal,
        }
    }

    /// The configured interval between healthy checks.
    pub fn normal(&self) -> Duration {
        self.normal
    }

    /// The sleep the next failure will use.
    pub fn current(&self) -> Duration {
        self.current
    }

    /// Returns the sleep before the next attempt and advances the interval.
    pub fn on_failure(&mut self) -> Duration {
        let delay = self.current;
        self.current = next_interval(self.current);
        delay
    }

    /// Returns the normal interval and resets the backoff.
    pub fn on_success(&mut self) -> Duration {
        self.current = self.normal;
        self.normal
    }
}
