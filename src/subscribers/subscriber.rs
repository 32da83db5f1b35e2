//! # Event subscriber trait.
//!
//! Provides [`Subscribe`], the push-style extension point for collaborators that
//! react to the timer (pausing playback on `Finished`, updating a menu label on
//! `Running`, ...).
//!
//! Each subscriber gets:
//! - **Dedicated worker task** (runs independently)
//! - **Per-subscriber bounded queue** (capacity via [`Subscribe::queue_capacity`])
//! - **Panic isolation** (panics are caught and logged)
//!
//! ## Architecture
//! ```text
//! SubscriberSet ──► [bounded queue] ──► worker task ──► subscriber.on_event()
//!                                    └─► panic caught → tracing::error!
//! ```
//!
//! ## Overflow behavior
//! A countdown tick (`Running(Some(_))`) arriving at a full queue is **dropped**
//! for this subscriber only and a `warn` is logged. Any other event waits for
//! room, so `Finished` and the final `Stopped` always arrive.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use sleep_timer::{Event, Subscribe};
//!
//! struct PauseOnFinish;
//!
//! #[async_trait]
//! impl Subscribe for PauseOnFinish {
//!     async fn on_event(&self, ev: &Event) {
//!         if matches!(ev, Event::Finished) {
//!             // pause the player
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "pause-on-finish" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Observer of timer status events.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; do not panic.
/// - Slow processing affects only this subscriber's queue.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event.
    ///
    /// Called from a dedicated worker task, never from the timer worker.
    /// Events are delivered in publication order.
    async fn on_event(&self, event: &Event);

    /// Returns the subscriber name used in logs.
    ///
    /// The default uses `type_name::<Self>()`; override it with something short.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns the preferred queue capacity for this subscriber (clamped to 1).
    ///
    /// Default: 64.
    fn queue_capacity(&self) -> usize {
        64
    }
}
