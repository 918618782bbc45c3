use std::time::SystemTime;

use crate::ports::outbound::TimeSource;

/// Default time source using system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Controllable clock for sweeper tests.
///
/// Starts at a fixed instant and only moves when told to.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug)]
pub struct ManualTimeSource {
    now: parking_lot::Mutex<SystemTime>,
}

#[cfg(any(test, feature = "test-utils"))]
impl ManualTimeSource {
    pub fn new(start: SystemTime) -> Self {
        Self {
            now: parking_lot::Mutex::new(start),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: std::time::Duration) {
        let mut now = self.now.lock();
        *now += by;
    }

    /// Jump to an absolute instant.
    pub fn set(&self, to: SystemTime) {
        *self.now.lock() = to;
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Default for ManualTimeSource {
    fn default() -> Self {
        Self::new(SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_700_000_000))
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl TimeSource for ManualTimeSource {
    fn now(&self) -> SystemTime {
        *self.now.lock()
    }
}
