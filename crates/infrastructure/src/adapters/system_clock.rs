//! Wall-clock adapter.
//!
//! `list` stamps every request with `cacheBuster=<epoch millis>` so that
//! intermediate caches never answer a listing from a stale copy. Production
//! stores read that value from [`SystemClock`].

use chrono::{DateTime, Utc};
use tally_application::ports::Clock;

/// `Clock` backed by the operating system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Creates a system clock.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_buster_tracks_wall_clock() {
        let clock = SystemClock::new();
        let before = Utc::now().timestamp_millis();
        let stamp = clock.now_millis();
        let after = Utc::now().timestamp_millis();

        assert!(before <= stamp && stamp <= after);
    }
}
