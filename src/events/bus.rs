//! # Replay-latest event bus.
//!
//! [`Bus`] is the multicast primitive behind `SleepTimer::status`. It differs from
//! a plain broadcast channel in three ways:
//!
//! - **Replay-latest**: a new [`Subscription`] first receives the most recently
//!   published event, then every later one.
//! - **Dedup-on-equality**: publishing a value equal to the previous one is a no-op.
//! - **Completion**: [`Bus::complete`] ends every subscription (after it drains)
//!   and refuses further publishes.
//!
//! ## Architecture
//! ```text
//! Publisher (one):               Subscribers (many):
//!                                ┌──► [unbounded FIFO] ──► Subscription 1
//!   Worker ── publish(ev) ──► Bus ├──► [unbounded FIFO] ──► Subscription 2
//!                 (dedup, latest) └──► [unbounded FIFO] ──► Subscription N
//! ```
//!
//! ## Rules
//! - **Serialized**: publish and subscribe take the same lock, so a new subscriber
//!   sees the replayed value strictly before any live value.
//! - **Non-blocking**: `publish()` never waits on a subscriber.
//! - **Lossless**: per-subscriber queues are unbounded; the timer publishes at
//!   most a handful of events per second.
//! - **Dropped subscriptions** are pruned on the next publish.

use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;

use super::event::Event;
use crate::error::BusCompleted;

#[derive(Default)]
struct BusState {
    latest: Option<Event>,
    subscribers: Vec<mpsc::UnboundedSender<Event>>,
    completed: bool,
}

/// Replay-latest, dedup-on-equality multicast channel for [`Event`]s.
///
/// Cheap to clone; all clones share the same state.
#[derive(Clone, Default)]
pub struct Bus {
    state: Arc<Mutex<BusState>>,
}

impl Bus {
    /// Creates an empty bus with no latest value.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BusState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publishes an event to all live subscribers.
    ///
    /// Returns `Ok(false)` when the event equals the previously published one and
    /// was suppressed, `Ok(true)` when it was delivered.
    ///
    /// # Errors
    /// [`BusCompleted`] once [`complete`](Self::complete) has been called.
    pub fn publish(&self, ev: Event) -> Result<bool, BusCompleted> {
        let mut state = self.lock();
        if state.completed {
            return Err(BusCompleted);
        }
        if state.latest == Some(ev) {
            return Ok(false);
        }
        state.latest = Some(ev);
        state.subscribers.retain(|tx| tx.send(ev).is_ok());
        Ok(true)
    }

    /// Creates a new subscription.
    ///
    /// - Before completion: yields the latest event (if any), then live events.
    /// - After completion: the subscription is already ended.
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.lock();
        if !state.completed {
            if let Some(latest) = state.latest {
                let _ = tx.send(latest);
            }
            state.subscribers.push(tx);
        }
        Subscription { rx }
    }

    /// Marks the stream complete.
    ///
    /// Every subscription ends once it has drained the events already queued for it.
    /// Returns `true` for the call that actually completed the bus.
    pub fn complete(&self) -> bool {
        let mut state = self.lock();
        if state.completed {
            return false;
        }
        state.completed = true;
        state.subscribers.clear();
        true
    }

    /// Returns the most recently published event.
    #[cfg(test)]
    pub(crate) fn latest(&self) -> Option<Event> {
        self.lock().latest
    }

    /// Returns `true` once the bus has been completed.
    #[cfg(test)]
    pub(crate) fn is_completed(&self) -> bool {
        self.lock().completed
    }
}

/// One subscriber's view of the bus.
///
/// Implements [`Stream`]; the stream ends when the bus completes.
#[derive(Debug)]
pub struct Subscription {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl Subscription {
    /// Waits for the next event; `None` once the stream has completed.
    pub async fn recv(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Returns the next already-queued event without waiting.
    pub fn try_recv(&mut self) -> Option<Event> {
        self.rx.try_recv().ok()
    }
}

impl Stream for Subscription {
    type Item = Event;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Event>> {
        self.rx.poll_recv(cx)
    }
}
