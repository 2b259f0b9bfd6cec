//! Clock module - the single source of "now" for a run

use std::time::SystemTime;

/// Source of the current time
///
/// A run observes the clock once and derives every threshold from that
/// single value, so both cutoffs of one run stay consistent with each other.
pub trait Clock {
    /// Current instant
    fn now(&self) -> SystemTime;
}

/// Wall-clock time from the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// A clock frozen at a fixed instant (tests, replays)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub SystemTime);

impl Clock for FixedClock {
    fn now(&self) -> SystemTime {
        self.0
    }
}
