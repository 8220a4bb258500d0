//! Millisecond timestamps as delivered by the firmware's clock.
use std::time::Instant;

use crate::devices::Clock;

/// A wrapper type for u32 to make it clear that a monotonic millisecond
/// reading is meant. The reading wraps around once the clock width is exhausted.
pub type Timestamp = u32;

/// Will return the milliseconds passed from `since` until `now`.
///
/// The subtraction wraps, so that a clock rollover between both readings
/// still results in the short gap that actually passed.
///
/// # Example
/// ```rust
/// # use chord::timer::elapsed;
/// assert_eq!(elapsed(100, 350), 250);
/// assert_eq!(elapsed(u32::MAX - 9, 10), 20);
/// ```
#[inline]
pub fn elapsed(since: Timestamp, now: Timestamp) -> u32 {
    now.wrapping_sub(since)
}

/// Checks if at least `timeout` milliseconds passed from `since` until `now`.
#[inline]
pub fn expired(since: Timestamp, now: Timestamp, timeout: u32) -> bool {
    elapsed(since, now) >= timeout
}

/// A host clock for running the resolver outside of the firmware,
/// counts the milliseconds since it was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        // truncating emulates the firmware's wrapping timer
        self.start.elapsed().as_millis() as Timestamp
    }
}
