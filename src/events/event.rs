//! # Status events published by the timer worker.
//!
//! Every state transition of the worker produces one [`Event`]. Events are plain
//! snapshots: they carry the remaining time at the moment of the transition and
//! nothing else, so two events compare equal exactly when they describe the same
//! observable state. The [`Bus`](crate::events::Bus) relies on that equality to
//! fold consecutive duplicates.
//!
//! ## Lifecycle
//! ```text
//! Stopped ──► Running(d) ──► Running(d-1) ──► ... ──► Running(0) ──► Finished
//!                 │                                                     │
//!                 ├──► Cancelled(d') ──► Stopped                        │
//!                 └──► Finished  (explicit finish)                      │
//!                                                                       ▼
//!                                            (close) ──► Stopped ──► stream completes
//! ```
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use sleep_timer::Event;
//!
//! let ev = Event::Running(Some(Duration::from_secs(125)));
//! assert_eq!(ev.remaining(), Some(Duration::from_secs(125)));
//! assert_eq!(ev.to_string(), "running 02:05");
//! assert_eq!(Event::Running(None).to_string(), "running until end of chapter");
//! ```

use std::fmt;
use std::time::Duration;

/// Observable state of the sleep timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// No countdown is active.
    ///
    /// Published once at startup, after a cancellation, and once more when the
    /// timer terminates.
    Stopped,

    /// A countdown is active.
    ///
    /// `None` is an indefinite hold that only ends through an explicit
    /// `finish()`; `Some(d)` is the time left until the timer fires.
    Running(Option<Duration>),

    /// An active countdown was cancelled; carries the time it had left.
    ///
    /// Always followed by [`Event::Stopped`].
    Cancelled(Option<Duration>),

    /// The countdown elapsed or was finished explicitly.
    ///
    /// Playback collaborators pause on this event.
    Finished,
}

impl Event {
    /// Returns the remaining time carried by `Running`/`Cancelled`, if any.
    #[inline]
    pub fn remaining(&self) -> Option<Duration> {
        match self {
            Event::Running(remaining) | Event::Cancelled(remaining) => *remaining,
            Event::Stopped | Event::Finished => None,
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Event::Stopped => "timer_stopped",
            Event::Running(_) => "timer_running",
            Event::Cancelled(_) => "timer_cancelled",
            Event::Finished => "timer_finished",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Stopped => f.write_str("stopped"),
            Event::Running(Some(d)) => write!(f, "running {}", format_remaining(*d)),
            Event::Running(None) => f.write_str("running until end of chapter"),
            Event::Cancelled(Some(d)) => write!(f, "cancelled {}", format_remaining(*d)),
            Event::Cancelled(None) => f.write_str("cancelled"),
            Event::Finished => f.write_str("finished"),
        }
    }
}

/// Renders a remaining time as `MM:SS`.
///
/// Minutes are not wrapped into hours and the sub-second part is truncated,
/// which is what a compact menu label wants.
///
/// ```rust
/// use std::time::Duration;
/// use sleep_timer::format_remaining;
///
/// assert_eq!(format_remaining(Duration::from_millis(65_900)), "01:05");
/// assert_eq!(format_remaining(Duration::from_secs(90 * 60)), "90:00");
/// ```
pub fn format_remaining(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
