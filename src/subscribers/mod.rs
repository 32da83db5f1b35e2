//! # Push-style observers of the timer status.
//!
//! [`SleepTimer::status`](crate::SleepTimer::status) hands out pull-style
//! streams. Collaborators that would rather be called back register a
//! [`Subscribe`] implementation with the builder; the timer feeds them through a
//! [`SubscriberSet`].
//!
//! ## Architecture
//! ```text
//! Worker ── publish(Event) ──► Bus ──► listener ──► SubscriberSet
//!                                                       │
//!                                             ┌─────────┼─────────┐
//!                                             ▼         ▼         ▼
//!                                         LogWriter  Player    Custom ...
//! ```

#[cfg(feature = "logging")]
mod embedded;
mod subscriber;
mod subscriber_set;

#[cfg(feature = "logging")]
pub use embedded::LogWriter;
pub use subscriber::Subscribe;
pub use subscriber_set::SubscriberSet;
