//! Cancellable repeating flush task for a cooperative event loop.
//!
//! The loop calls `poll` between events with the current instant; nothing
//! here sleeps or spawns threads.

use std::time::{Duration, Instant};

/// Flush cadence used by interactive sessions.
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlushSchedule {
    interval: Duration,
    next_due: Instant,
    cancelled: bool,
}

impl FlushSchedule {
    /// First flush becomes due one `interval` after `started_at`.
    pub fn new(interval: Duration, started_at: Instant) -> Self {
        Self {
            interval,
            next_due: started_at + interval,
            cancelled: false,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn next_due(&self) -> Option<Instant> {
        (!self.cancelled).then_some(self.next_due)
    }

    /// Returns `true` once per elapsed interval.
    ///
    /// Missed ticks collapse into one: after a long gap the next flush is due
    /// one interval after `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.cancelled || now < self.next_due {
            return false;
        }
        self.next_due = now + self.interval;
        true
    }

    /// Stops the task for the rest of the session.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}
