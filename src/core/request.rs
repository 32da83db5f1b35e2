//! # Request channel between the facade and the worker.
//!
//! Requests flow from any number of callers into exactly one worker:
//! ```text
//! start/cancel/finish ── offer(req, timeout) ──┐
//!                                              ├──► [bounded FIFO] ──► worker
//! close ───────────────── try_offer(Close) ────┘
//! ```
//!
//! ## Rules
//! - FIFO: the worker sees requests in submission order.
//! - Bounded: a full queue makes `offer` wait at most its timeout, then the
//!   request is dropped (reported to the caller as `false`).

use std::time::Duration;

use tokio::sync::mpsc;

/// A control request for the worker; consumed exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Request {
    /// Start (or restart) a countdown; `None` runs indefinitely.
    Start(Option<Duration>),
    /// Cancel an active countdown.
    Stop,
    /// Complete immediately, as if the countdown had elapsed.
    Finish,
    /// Terminate the worker loop.
    Close,
}

/// Sending half of the request channel, held by the facade.
#[derive(Clone)]
pub(crate) struct RequestSender {
    tx: mpsc::Sender<Request>,
}

impl RequestSender {
    /// Enqueues a request, waiting at most `timeout` for room.
    ///
    /// Returns `false` if the queue stayed full or the worker is gone.
    pub(crate) async fn offer(&self, req: Request, timeout: Duration) -> bool {
        self.tx.send_timeout(req, timeout).await.is_ok()
    }

    /// Enqueues a request only if there is room right now.
    pub(crate) fn try_offer(&self, req: Request) -> bool {
        self.tx.try_send(req).is_ok()
    }
}

/// Creates the bounded request channel.
///
/// `capacity` must be non-zero; callers pass [`Config::queue_capacity_clamped`](super::Config::queue_capacity_clamped).
pub(crate) fn channel(capacity: usize) -> (RequestSender, mpsc::Receiver<Request>) {
    let (tx, rx) = mpsc::channel(capacity);
    (RequestSender { tx }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fifo_order() {
        let (tx, mut rx) = channel(4);
        assert!(tx.offer(Request::Start(None), Duration::from_millis(10)).await);
        assert!(tx.offer(Request::Stop, Duration::from_millis(10)).await);
        assert!(tx.try_offer(Request::Close));

        assert_eq!(rx.recv().await, Some(Request::Start(None)));
        assert_eq!(rx.recv().await, Some(Request::Stop));
        assert_eq!(rx.recv().await, Some(Request::Close));
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_queue_drops_after_timeout() {
        let (tx, mut rx) = channel(1);
        assert!(tx.offer(Request::Finish, Duration::from_millis(10)).await);
        assert!(!tx.offer(Request::Stop, Duration::from_millis(10)).await);
        assert!(!tx.try_offer(Request::Close));

        assert_eq!(rx.recv().await, Some(Request::Finish));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_offer_fails_once_worker_is_gone() {
        let (tx, rx) = channel(4);
        drop(rx);
        assert!(!tx.offer(Request::Finish, Duration::from_millis(10)).await);
        assert!(!tx.try_offer(Request::Close));
    }
}
