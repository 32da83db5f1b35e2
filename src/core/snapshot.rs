//! # Lock-free running snapshot.
//!
//! The worker owns the authoritative timer state. [`RunningSnapshot`] is a
//! read-mostly copy of it that any thread can read through
//! [`SleepTimer::is_running`](crate::SleepTimer::is_running) without touching the worker.
//!
//! ## Encoding
//! A single `AtomicU64` holds the remaining time in nanoseconds, with two sentinels:
//! ```text
//! u64::MAX       → not running
//! u64::MAX - 1   → running indefinitely
//! 0..=MAX_NANOS  → running, remaining nanoseconds (longer durations saturate)
//! ```
//!
//! ## Rules
//! - **Single writer** (the worker), many readers.
//! - Reads are **eventually consistent**: a reader may briefly see the state from
//!   just before the worker's latest transition.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

const NOT_RUNNING: u64 = u64::MAX;
const INDEFINITE: u64 = u64::MAX - 1;
const MAX_NANOS: u64 = u64::MAX - 2;

/// Copy of an active countdown's remaining time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Running {
    /// Time left; `None` for an indefinite hold.
    pub remaining: Option<Duration>,
}

/// Atomic cell holding the worker's current [`Running`] state, if any.
#[derive(Debug)]
pub(crate) struct RunningSnapshot {
    nanos: AtomicU64,
}

impl RunningSnapshot {
    pub(crate) fn new() -> Self {
        Self {
            nanos: AtomicU64::new(NOT_RUNNING),
        }
    }

    /// Records an active countdown.
    pub(crate) fn store(&self, remaining: Option<Duration>) {
        let raw = match remaining {
            None => INDEFINITE,
            Some(d) => u64::try_from(d.as_nanos()).map_or(MAX_NANOS, |n| n.min(MAX_NANOS)),
        };
        self.nanos.store(raw, Ordering::Release);
    }

    /// Records that no countdown is active.
    pub(crate) fn clear(&self) {
        self.nanos.store(NOT_RUNNING, Ordering::Release);
    }

    pub(crate) fn load(&self) -> Option<Running> {
        match self.nanos.load(Ordering::Acquire) {
            NOT_RUNNING => None,
            INDEFINITE => Some(Running { remaining: None }),
            n => Some(Running {
                remaining: Some(Duration::from_nanos(n)),
            }),
        }
    }
}
