//! # Retention Policy
//!
//! An artifact is eligible for eviction once its age strictly exceeds the
//! retention window. Combined with a sweep period `P`, an artifact stays
//! readable for at least `window` and at most `window + P` after its write.
//!
//! Age is measured against filesystem metadata. A write time in the future
//! (clock step backwards) counts as age zero, so such entries are kept until
//! the clock catches up.

use std::time::{Duration, SystemTime};

/// Default retention window: one minute.
pub const DEFAULT_RETENTION_WINDOW: Duration = Duration::from_secs(60);

/// Uniform retention window applied to every artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    window: Duration,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            window: DEFAULT_RETENTION_WINDOW,
        }
    }
}

impl RetentionPolicy {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Age of an entry written at `last_modified`, observed at `now`.
    pub fn age(&self, last_modified: SystemTime, now: SystemTime) -> Duration {
        now.duration_since(last_modified).unwrap_or(Duration::ZERO)
    }

    /// True if the entry has outlived the retention window.
    pub fn is_expired(&self, last_modified: SystemTime, now: SystemTime) -> bool {
        self.age(last_modified, now) > self.window
    }
}
