//! Minimum spacing between committed updates.
//!
//! The limiter is a pure decision over the two timestamps it is handed;
//! it holds no state of its own and performs no mutation. Rejection is
//! the expected outcome for callers that lose a concurrent race on the
//! same user (the winner refreshes `last_active`, everyone after it
//! lands inside the window).

use chrono::{DateTime, Duration, Utc};

use crate::config::StreakConfig;
use crate::error::StreakError;

#[derive(Debug, Clone)]
pub struct RateLimiter {
    window: Duration,
}

impl RateLimiter {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    pub fn from_config(config: &StreakConfig) -> Self {
        Self::new(config.rate_limit_window())
    }

    /// Reject when less than the window has elapsed since the last
    /// committed update. A non-positive elapsed time (clock skew, or a
    /// racing writer that just refreshed `last_active`) is also rejected.
    pub fn check(
        &self,
        now: DateTime<Utc>,
        last_active: DateTime<Utc>,
    ) -> Result<(), StreakError> {
        let elapsed = now - last_active;
        if elapsed < self.window {
            return Err(StreakError::RateLimited {
                elapsed_secs: elapsed.num_seconds().max(0),
                window_secs: self.window.num_seconds(),
            });
        }
        Ok(())
    }
}
