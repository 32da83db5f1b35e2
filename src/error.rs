//! Error types used by the sleep timer.
//!
//! - [`TimerError`]: returned synchronously to callers of the control surface.
//! - [`BusCompleted`]: returned by [`Bus::publish`](crate::events::Bus::publish) once the stream has ended.
//! - `WorkerError`: a failure inside one worker iteration; logged and never surfaced.
//!
//! Like the rest of the crate, errors expose `as_label` for log fields.

use thiserror::Error;

/// # Errors returned by the timer's control surface.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    /// The timer has been closed; only `close()` may still be called.
    #[error("timer is closed")]
    Closed,

    /// The background worker exited before it signalled readiness.
    #[error("timer worker exited before it became ready")]
    WorkerUnavailable,
}

impl TimerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use sleep_timer::TimerError;
    ///
    /// assert_eq!(TimerError::Closed.as_label(), "timer_closed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TimerError::Closed => "timer_closed",
            TimerError::WorkerUnavailable => "timer_worker_unavailable",
        }
    }
}

/// The event stream has completed and refuses further values.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("event stream already completed")]
pub struct BusCompleted;

/// A failure while the worker evaluates one iteration.
///
/// Caught by the worker loop, logged, and followed by a return to the idle state.
#[derive(Error, Debug)]
pub(crate) enum WorkerError {
    #[error("publish failed: {0}")]
    Bus(#[from] BusCompleted),

    #[error("iteration panicked: {0}")]
    Panicked(String),
}

impl WorkerError {
    pub(crate) fn as_label(&self) -> &'static str {
        match self {
            WorkerError::Bus(_) => "worker_bus_completed",
            WorkerError::Panicked(_) => "worker_panicked",
        }
    }
}
