//! Time-related utilities with clock abstraction for testability.

use chrono::{Local, SecondsFormat};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get the current local time as an RFC 3339 string
    fn now_rfc3339(&self) -> String;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_rfc3339(&self) -> String {
        now_local_rfc3339()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone)]
pub struct FixedClock {
    fixed_time: String,
}

impl FixedClock {
    /// Create a new fixed clock with the given RFC 3339 timestamp
    pub fn new(fixed_time: impl Into<String>) -> Self {
        Self {
            fixed_time: fixed_time.into(),
        }
    }
}

impl Clock for FixedClock {
    fn now_rfc3339(&self) -> String {
        self.fixed_time.clone()
    }
}

/// Get the current local wall-clock time as an RFC 3339 string
/// with microsecond precision and a UTC offset (e.g.
/// `2024-07-01T12:34:56.789012+09:00`)
pub fn now_local_rfc3339() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Micros, false)
}
