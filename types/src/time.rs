//! Timestamp type used throughout the engine.
//!
//! Timestamps are Unix epoch seconds (UTC). Deadlines are absolute
//! timestamps compared against the environment's current time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub const fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// Get the current system time as a `Timestamp`.
    ///
    /// A clock set before the Unix epoch reads as [`Timestamp::EPOCH`].
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// This timestamp shifted forward by `secs`, saturating at `u64::MAX`.
    pub fn plus_secs(&self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plus_secs_saturates() {
        assert_eq!(Timestamp::new(10).plus_secs(5), Timestamp::new(15));
        assert_eq!(
            Timestamp::new(u64::MAX - 1).plus_secs(10),
            Timestamp::new(u64::MAX)
        );
    }

    #[test]
    fn orders_by_seconds() {
        assert!(Timestamp::new(100) < Timestamp::new(101));
        assert_eq!(Timestamp::EPOCH.as_secs(), 0);
        assert_eq!(Timestamp::new(7).to_string(), "7s");
    }
}
