//! # Event fan-out to multiple subscribers.
//!
//! Provides [`SubscriberSet`], which distributes timer events to every registered
//! [`Subscribe`] implementation without ever blocking the timer worker.
//!
//! ## Architecture
//! ```text
//! Bus ──► Subscription ──► listener task ──► deliver(event)
//!                                               │
//!                                               ├──► [queue 1] ──► worker 1 ──► subscriber1.on_event()
//!                                               ├──► [queue 2] ──► worker 2 ──► subscriber2.on_event()
//!                                               └──► [queue N] ──► worker N ──► subscriberN.on_event()
//! ```
//!
//! ## Rules
//! - **Per-subscriber FIFO**: each subscriber sees events in publication order
//! - **Overflow**: a countdown tick (`Running(Some(_))`) is dropped for that
//!   subscriber only, logged at `warn`
//! - **Lossless transitions**: `Running(None)`, `Cancelled`, `Finished` and
//!   `Stopped` wait for room in the subscriber's queue
//! - **Non-blocking for the worker**: the listener reads its own unbounded bus
//!   subscription, so a slow subscriber delays only the listener
//! - **Isolation**: a panicking subscriber doesn't affect others
//! - **Lifetime**: the listener ends with the status stream, then the set drains
//!
//! ## Panic handling
//! Worker tasks use `catch_unwind`; a panic is logged and the worker moves on to
//! the next event.
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if a subscriber panics while holding a lock.

use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use crate::events::{Event, Subscription};
use crate::subscribers::Subscribe;

/// Per-subscriber channel metadata.
struct SubscriberChannel {
    name: &'static str,
    sender: mpsc::Sender<Event>,
}

/// Fan-out coordinator for multiple event subscribers.
pub struct SubscriberSet {
    channels: Vec<SubscriberChannel>,
    workers: Vec<JoinHandle<()>>,
}

impl SubscriberSet {
    /// Creates a new set and spawns one worker task per subscriber.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let cap = sub.queue_capacity().max(1);
            let name = sub.name();
            let (tx, mut rx) = mpsc::channel::<Event>(cap);

            let handle = tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let fut = sub.on_event(&ev);
                    if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                        let any = &*panic_err;
                        let info = if let Some(msg) = any.downcast_ref::<&'static str>() {
                            (*msg).to_string()
                        } else if let Some(msg) = any.downcast_ref::<String>() {
                            msg.clone()
                        } else {
                            "unknown panic".to_string()
                        };
                        error!(subscriber = sub.name(), %info, event = %ev, "subscriber panicked");
                    }
                }
            });
            channels.push(SubscriberChannel { name, sender: tx });
            workers.push(handle);
        }
        Self { channels, workers }
    }

    /// Returns `true` if no subscribers are registered.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Emits an event to all subscribers.
    ///
    /// - Uses `try_send` (non-blocking)
    /// - On queue full or closed: drops the event for that subscriber and logs it
    pub fn emit(&self, event: &Event) {
        for channel in &self.channels {
            match channel.sender.try_send(*event) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(
                        subscriber = channel.name,
                        event = %event,
                        reason = "full",
                        "subscriber dropped event"
                    );
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    warn!(
                        subscriber = channel.name,
                        event = %event,
                        reason = "closed",
                        "subscriber dropped event"
                    );
                }
            }
        }
    }

    /// Delivers an event to all subscribers.
    ///
    /// Countdown ticks go through [`emit`](Self::emit) and may be dropped on a
    /// full queue; the next tick supersedes them. Every other event waits for
    /// room, so subscribers always observe state transitions and the terminal
    /// `Stopped`.
    pub async fn deliver(&self, event: &Event) {
        if matches!(event, Event::Running(Some(_))) {
            self.emit(event);
            return;
        }
        for channel in &self.channels {
            if channel.sender.send(*event).await.is_err() {
                warn!(
                    subscriber = channel.name,
                    event = %event,
                    reason = "closed",
                    "subscriber dropped event"
                );
            }
        }
    }

    /// Forwards every event of `events` to the set until the stream completes,
    /// then shuts the set down and cancels `drained`.
    pub(crate) fn spawn_listener(
        self,
        mut events: Subscription,
        drained: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(ev) = events.recv().await {
                self.deliver(&ev).await;
            }
            self.shutdown().await;
            drained.cancel();
        })
    }

    /// Gracefully shuts down all subscriber workers.
    ///
    /// 1. Drops all channel senders (workers see channel closed)
    /// 2. Awaits all worker tasks to finish
    pub async fn shutdown(self) {
        drop(self.channels);

        for h in self.workers {
            let _ = h.await;
        }
    }
}
