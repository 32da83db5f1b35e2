//! # sleep-timer
//!
//! **sleep-timer** is the countdown engine behind an audiobook player's
//! "stop playing in N minutes" feature.
//!
//! A timer is started with a duration or with no duration at all ("until the end
//! of the chapter"), counts down in one-second ticks, and can be cancelled,
//! restarted or finished early. Every state change is published as an [`Event`]
//! on a replay-latest stream, so a newly attached observer immediately learns the
//! current state. The timer does not pause playback itself; a collaborator reacts
//! to [`Event::Finished`].
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   UI / player / tests (any task or thread)
//!     │ start(d) · cancel() · finish() · close()
//!     ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  SleepTimer (control surface)                                     │
//! │  - closed flag (CAS, idempotent close)                            │
//! │  - RequestSender (bounded queue, offer timeout)                   │
//! │  - RunningSnapshot (lock-free is_running())                       │
//! └──────┬────────────────────────────────────────────────────────────┘
//!        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  TimerWorker (one tokio task per timer)                           │
//! │  AwaitingInitial ◄──► Running(remaining) ──tick──► Finished       │
//! └──────┬────────────────────────────────────────────────────────────┘
//!        │ publish(Event)
//!        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │               Bus (replay latest, suppress duplicates)            │
//! └──────┬──────────────────────────────────────────┬─────────────────┘
//!        ▼                                          ▼
//!   status() subscriptions                 subscriber listener
//!   (futures::Stream)                               ▼
//!                                             SubscriberSet
//!                                        ┌─────────┼─────────┐
//!                                        ▼         ▼         ▼
//!                                  LogWriter   player    custom
//! ```
//!
//! ### Lifecycle
//! ```text
//! build() ──► spawn worker ──► publish Stopped ──► ready
//!
//! Stopped ─start(3s)─► Running(3s) ─tick─► Running(2s) ─tick─► Running(1s)
//!                         │                                       │ tick
//!                         │ cancel()                              ▼
//!                         ▼                                  Running(0s)
//!                   Cancelled(left)                               │
//!                         ▼                                       ▼
//!                      Stopped                                 Finished
//!
//! close() ──► shutdown token ──► worker exits ──► Stopped ──► stream completes
//! ```
//!
//! ## Features
//! | Area              | Description                                                 | Key types / traits                       |
//! |-------------------|-------------------------------------------------------------|------------------------------------------|
//! | **Control**       | Start, cancel, finish and close a countdown.                | [`SleepTimer`], [`SleepTimerBuilder`]    |
//! | **Status stream** | Replay-latest, deduplicated event stream.                   | [`Event`], [`Bus`], [`Subscription`]     |
//! | **Subscriber API**| Push-style observers with isolated queues.                  | [`Subscribe`], [`SubscriberSet`]         |
//! | **Errors**        | Typed errors for the control surface and the bus.           | [`TimerError`], [`BusCompleted`]         |
//! | **Configuration** | Request queue sizing and offer timeout.                     | [`Config`]                               |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use sleep_timer::{Config, Event, SleepTimer};
//!
//! #[tokio::main(flavor = "current_thread", start_paused = true)]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Build subscribers (optional)
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn sleep_timer::Subscribe>> = {
//!         use sleep_timer::LogWriter;
//!         vec![Arc::new(LogWriter::default())]
//!     };
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn sleep_timer::Subscribe>> = Vec::new();
//!
//!     let timer = SleepTimer::builder(Config::default())
//!         .with_subscribers(subs)
//!         .build()
//!         .await?;
//!
//!     let mut status = timer.status();
//!     assert_eq!(status.recv().await, Some(Event::Stopped));
//!
//!     timer.start(Some(Duration::from_secs(90))).await?;
//!     assert_eq!(
//!         status.recv().await,
//!         Some(Event::Running(Some(Duration::from_secs(90))))
//!     );
//!
//!     timer.close();
//!     timer.terminated().await;
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod subscribers;

// ---- Public re-exports ----

pub use core::{Config, Running, SleepTimer, SleepTimerBuilder, TICK};
pub use error::{BusCompleted, TimerError};
pub use events::{Bus, Event, Subscription, format_remaining};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
