//! # Clock Port
//!
//! Verification never reads the caller's wall clock. Time is supplied by the
//! host (block time or an equivalent monotonic source) through [`Clock`].

use crate::entities::Timestamp;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of the current time for signature window checks.
pub trait Clock: Send + Sync {
    /// Current time in seconds.
    fn now(&self) -> Timestamp;
}

/// Manually driven clock.
///
/// Time only moves forward: `set` ignores values earlier than the current one.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    /// Create a clock starting at `now`.
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: AtomicU64::new(now),
        }
    }

    /// Move the clock to `now` if it is not in the past.
    pub fn set(&self, now: Timestamp) {
        self.now.fetch_max(now, Ordering::SeqCst);
    }

    /// Advance the clock by `secs`.
    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}
