//! # Timer configuration.
//!
//! Provides [`Config`] centralized settings for one sleep timer instance.
//!
//! The tick is not part of the configuration: the countdown always advances in
//! one-second steps (see [`TICK`](crate::TICK)).
//!
//! ## Sentinel values
//! - `queue_capacity = 0` → clamped to 1
//! - `offer_timeout = 0s` → requests are only enqueued if there is room right now

use std::time::Duration;

/// Configuration for a [`SleepTimer`](crate::SleepTimer).
///
/// ## Field semantics
/// - `queue_capacity`: depth of the request queue between callers and the worker
/// - `offer_timeout`: how long `start`/`cancel`/`finish` wait for room in a full queue
///
/// ## Notes
/// A request that still finds the queue full after `offer_timeout` is dropped and
/// logged. At human request rates the default depth of 16 is never reached.
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity of the bounded request queue.
    pub queue_capacity: usize,

    /// Maximum time a control call waits for room in the request queue.
    pub offer_timeout: Duration,
}

impl Config {
    /// Returns the queue capacity clamped to a minimum of 1.
    #[inline]
    pub fn queue_capacity_clamped(&self) -> usize {
        self.queue_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `queue_capacity = 16`
    /// - `offer_timeout = 10ms`
    fn default() -> Self {
        Self {
            queue_capacity: 16,
            offer_timeout: Duration::from_millis(10),
        }
    }
}
