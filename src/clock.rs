//! Wall-clock abstraction for build metadata timestamps
//!
//! The metadata increment refreshes `YYYYMMDDhhmmss` timestamp runs to the
//! current time. That dependency lives behind the [Clock] trait so tests can
//! supply a fixed stamp instead of the real wall clock.

use chrono::Local;

/// The fixed 14-digit timestamp pattern used in build metadata.
pub const TIMESTAMP_PATTERN: &str = "%Y%m%d%H%M%S";

/// Source of the current time, formatted as a 14-digit `YYYYMMDDhhmmss` stamp.
pub trait Clock {
    /// Return the current time as a `YYYYMMDDhhmmss` string.
    fn timestamp(&self) -> String;
}

/// Real wall-clock implementation backed by local time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn timestamp(&self) -> String {
        Local::now().format(TIMESTAMP_PATTERN).to_string()
    }
}

/// Clock that always reports the same stamp, for deterministic tests.
#[derive(Debug, Clone)]
pub struct FixedClock {
    stamp: String,
}

impl FixedClock {
    /// Create a fixed clock reporting the given stamp
    pub fn new(stamp: impl Into<String>) -> Self {
        FixedClock {
            stamp: stamp.into(),
        }
    }
}

impl Clock for FixedClock {
    fn timestamp(&self) -> String {
        self.stamp.clone()
    }
}
