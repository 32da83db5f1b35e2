//! Status events: types and replay-latest bus.
//!
//! This module groups the event **data model** and the **bus** the worker
//! publishes it on.
//!
//! ## Contents
//! - [`Event`] snapshot of the timer state at each transition
//! - [`Bus`] replay-latest, dedup-on-equality multicast channel
//! - [`Subscription`] one reader's `Stream` of events
//!
//! ## Quick reference
//! - **Publisher**: the timer worker (`core::worker`), exclusively.
//! - **Consumers**: `SleepTimer::status()` callers and the subscriber listener
//!   that feeds [`SubscriberSet`](crate::SubscriberSet).

mod bus;
mod event;

pub use bus::{Bus, Subscription};
pub use event::{Event, format_remaining};
