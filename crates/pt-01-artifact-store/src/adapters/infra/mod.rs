//! Infrastructure Adapters
//!
//! Implementations of `TimeSource` and `IdGenerator`.

mod ids;
mod time;

pub use ids::UuidGenerator;
#[cfg(any(test, feature = "test-utils"))]
pub use time::ManualTimeSource;
pub use time::SystemTimeSource;
