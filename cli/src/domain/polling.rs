//! Job polling policy: capped exponential backoff within an overall budget.

use std::time::Duration;

/// Default delay before the second status query.
pub const DEFAULT_INITIAL_INTERVAL: Duration = Duration::from_secs(1);
/// Default ceiling on the delay between status queries.
pub const DEFAULT_MAX_INTERVAL: Duration = Duration::from_secs(30);
/// Default overall polling budget.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// How often, and for how long, to poll an asynchronous job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_interval: DEFAULT_INITIAL_INTERVAL,
            max_interval: DEFAULT_MAX_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl PollPolicy {
    /// Delay schedule, starting at `initial_interval` and doubling up to
    /// `max_interval`. Never ends; the caller bounds it by `timeout`.
    #[must_use]
    pub fn backoff(&self) -> Backoff {
        Backoff {
            next: self.initial_interval.min(self.max_interval),
            max: self.max_interval,
        }
    }

    /// Delay to wait next, clipped so it never overshoots the budget.
    ///
    /// Returns `None` once `elapsed` has reached `timeout`.
    #[must_use]
    pub fn clip(&self, interval: Duration, elapsed: Duration) -> Option<Duration> {
        let remaining = self.timeout.checked_sub(elapsed)?;
        if remaining.is_zero() {
            return None;
        }
        Some(interval.min(remaining))
    }
}

/// Capped exponential backoff iterator.
#[derive(Debug, Clone)]
pub struct Backoff {
    next: Duration,
    max: Duration,
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let current = self.next;
        self.next = current.saturating_mul(2).min(self.max);
        Some(current)
    }
}
