//! # SleepTimer: the public control surface.
//!
//! [`SleepTimer`] translates control calls into requests for its worker and owns
//! the closed flag. It never touches timer state itself: every transition happens
//! on the worker task, serialized by the request queue.
//!
//! ## Architecture
//! ```text
//! callers (any task/thread)
//!   start / cancel / finish ── offer(Request, offer_timeout) ──► [bounded queue]
//!   close ── CAS(closed) ─┬─► shutdown.cancel()                        │
//!                         └─► try_offer(Close) ──────────────────────► │
//!                                                                      ▼
//!                                                               TimerWorker
//!                                                      ┌───────────┴───────────┐
//!                                                      ▼                       ▼
//!   is_running() ◄──────────────────────────── RunningSnapshot         Bus ──► status()
//! ```
//!
//! ## Rules
//! - `start`/`cancel`/`finish` fail with [`TimerError::Closed`] after `close()`.
//! - `close()` is idempotent; only the first call runs the shutdown sequence.
//! - A request that finds the queue full for longer than
//!   [`Config::offer_timeout`] is dropped and logged, not reported to the caller.
//! - `is_running()` is a lock-free read and may trail the worker by one transition.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::builder::SleepTimerBuilder;
use super::config::Config;
use super::request::{Request, RequestSender};
use super::snapshot::{Running, RunningSnapshot};
use crate::error::TimerError;
use crate::events::{Bus, Subscription};

/// A sleep timer backed by one dedicated worker task.
///
/// All methods take `&self`; share the timer between tasks with an `Arc`.
/// Dropping the timer closes it.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use futures::StreamExt;
/// use sleep_timer::{Event, SleepTimer};
///
/// #[tokio::main(flavor = "current_thread", start_paused = true)]
/// async fn main() -> Result<(), sleep_timer::TimerError> {
///     let timer = SleepTimer::create().await?;
///     let status = timer.status();
///
///     timer.start(Some(Duration::from_secs(2))).await?;
///     tokio::time::sleep(Duration::from_secs(3)).await;
///     timer.close();
///
///     let events: Vec<Event> = status.collect().await;
///     assert_eq!(events.first(), Some(&Event::Stopped));
///     assert!(events.contains(&Event::Finished));
///     assert_eq!(events.last(), Some(&Event::Stopped));
///     Ok(())
/// }
/// ```
pub struct SleepTimer {
    cfg: Config,
    requests: RequestSender,
    closed: AtomicBool,
    shutdown: CancellationToken,
    done: CancellationToken,
    drained: CancellationToken,
    snapshot: Arc<RunningSnapshot>,
    bus: Bus,
}

impl SleepTimer {
    /// Returns a builder for a timer with the given configuration.
    pub fn builder(cfg: Config) -> SleepTimerBuilder {
        SleepTimerBuilder::new(cfg)
    }

    /// Creates a timer with the default configuration and no subscribers.
    ///
    /// Returns only once the worker is ready to process requests.
    pub async fn create() -> Result<Self, TimerError> {
        Self::builder(Config::default()).build().await
    }

    pub(super) fn new_internal(
        cfg: Config,
        requests: RequestSender,
        shutdown: CancellationToken,
        done: CancellationToken,
        drained: CancellationToken,
        snapshot: Arc<RunningSnapshot>,
        bus: Bus,
    ) -> Self {
        Self {
            cfg,
            requests,
            closed: AtomicBool::new(false),
            shutdown,
            done,
            drained,
            snapshot,
            bus,
        }
    }

    /// Starts the timer, or restarts it if it is already running.
    ///
    /// `None` runs until [`finish`](Self::finish) is called ("end of chapter").
    /// The worker answers with `Event::Running(duration)`.
    ///
    /// # Errors
    /// [`TimerError::Closed`] if the timer has been closed.
    pub async fn start(&self, duration: Option<Duration>) -> Result<(), TimerError> {
        self.check_not_closed()?;
        self.submit(Request::Start(duration)).await;
        Ok(())
    }

    /// Cancels a running countdown.
    ///
    /// The worker answers with `Cancelled` then `Stopped`, or only a redundant
    /// `Stopped` if nothing was running.
    ///
    /// # Errors
    /// [`TimerError::Closed`] if the timer has been closed.
    pub async fn cancel(&self) -> Result<(), TimerError> {
        self.check_not_closed()?;
        self.submit(Request::Stop).await;
        Ok(())
    }

    /// Completes the timer now, as if its duration had elapsed.
    ///
    /// # Errors
    /// [`TimerError::Closed`] if the timer has been closed.
    pub async fn finish(&self) -> Result<(), TimerError> {
        self.check_not_closed()?;
        self.submit(Request::Finish).await;
        Ok(())
    }

    /// Closes the timer.
    ///
    /// Interrupts the worker, which publishes a final `Stopped` and completes the
    /// status stream. Calling it again, from any thread, does nothing.
    pub fn close(&self) {
        if self
            .closed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }
        debug!("closing sleep timer");
        self.shutdown.cancel();
        if !self.requests.try_offer(Request::Close) {
            debug!("close request not queued; relying on shutdown signal");
        }
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Returns the active countdown, or `None` when idle.
    ///
    /// Read without synchronizing with the worker, so it may briefly lag the
    /// status stream.
    pub fn is_running(&self) -> Option<Running> {
        self.snapshot.load()
    }

    /// Subscribes to the status stream.
    ///
    /// The subscription first yields the most recent event, then live events,
    /// with consecutive duplicates suppressed. It ends after the timer closes.
    pub fn status(&self) -> Subscription {
        self.bus.subscribe()
    }

    /// Resolves once the worker has exited, the status stream has completed and
    /// registered subscribers have drained.
    pub async fn terminated(&self) {
        self.done.cancelled().await;
        self.drained.cancelled().await;
    }

    /// Returns the configuration this timer was built with.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    fn check_not_closed(&self) -> Result<(), TimerError> {
        if self.is_closed() {
            return Err(TimerError::Closed);
        }
        Ok(())
    }

    /// Offers `req` to the worker, waiting at most [`Config::offer_timeout`].
    ///
    /// ## Notes
    /// A request dropped on a full queue is logged at `warn` and not reported to
    /// the caller; control calls stay infallible apart from [`TimerError::Closed`].
    async fn submit(&self, req: Request) {
        if !self.requests.offer(req, self.cfg.offer_timeout).await {
            warn!(
                request = ?req,
                timeout = ?self.cfg.offer_timeout,
                "timer request dropped: queue full or worker gone"
            );
        }
    }
}

impl Drop for SleepTimer {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Event;
    use futures::StreamExt;
    use tokio::time::sleep;

    fn secs(n: u64) -> Option<Duration> {
        Some(Duration::from_secs(n))
    }

    async fn close_and_collect(timer: &SleepTimer, status: Subscription) -> Vec<Event> {
        timer.close();
        let events = status.collect().await;
        timer.terminated().await;
        events
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_close_twice() {
        let timer = SleepTimer::create().await.unwrap();
        assert!(!timer.is_closed());
        let status = timer.status();

        timer.close();
        assert!(timer.is_closed());
        timer.close();
        assert!(timer.is_closed());

        let events: Vec<Event> = status.collect().await;
        assert_eq!(events, vec![Event::Stopped]);
        timer.terminated().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_status_is_replayed_after_create() {
        let timer = SleepTimer::create().await.unwrap();
        let mut status = timer.status();
        assert_eq!(status.try_recv(), Some(Event::Stopped));
        assert_eq!(timer.is_running(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_to_completion() {
        let timer = SleepTimer::create().await.unwrap();
        let status = timer.status();

        timer.start(secs(3)).await.unwrap();
        sleep(Duration::from_secs(1)).await;
        assert!(timer.is_running().is_some());
        sleep(Duration::from_secs(3)).await;

        let events = close_and_collect(&timer, status).await;
        assert_eq!(
            events,
            vec![
                Event::Stopped,
                Event::Running(secs(3)),
                Event::Running(secs(2)),
                Event::Running(secs(1)),
                Event::Running(secs(0)),
                Event::Finished,
                Event::Stopped,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel() {
        let timer = SleepTimer::create().await.unwrap();
        let status = timer.status();

        timer.start(secs(3)).await.unwrap();
        sleep(Duration::from_secs(1)).await;
        assert!(timer.is_running().is_some());
        timer.cancel().await.unwrap();
        sleep(Duration::from_secs(1)).await;
        assert_eq!(timer.is_running(), None);

        let events = close_and_collect(&timer, status).await;
        assert_eq!(events.first(), Some(&Event::Stopped));
        assert!(events.iter().any(|e| matches!(e, Event::Running(_))));
        let cancelled = events
            .iter()
            .filter(|e| matches!(e, Event::Cancelled(_)))
            .count();
        assert_eq!(cancelled, 1);
        assert_eq!(events.last(), Some(&Event::Stopped));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_immediately_after_start() {
        let timer = SleepTimer::create().await.unwrap();
        let status = timer.status();

        timer.start(secs(3)).await.unwrap();
        timer.cancel().await.unwrap();

        let events = close_and_collect(&timer, status).await;
        assert_eq!(events.first(), Some(&Event::Stopped));
        assert_eq!(events.last(), Some(&Event::Stopped));
        assert_eq!(timer.is_running(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_while_idle_is_redundant() {
        let timer = SleepTimer::create().await.unwrap();
        let status = timer.status();

        timer.cancel().await.unwrap();
        sleep(Duration::from_millis(100)).await;

        let events = close_and_collect(&timer, status).await;
        assert_eq!(events, vec![Event::Stopped]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_with_new_duration() {
        let timer = SleepTimer::create().await.unwrap();
        let status = timer.status();

        timer.start(secs(4)).await.unwrap();
        sleep(Duration::from_secs(1)).await;
        timer.start(secs(6)).await.unwrap();
        sleep(Duration::from_secs(1)).await;
        assert!(timer.is_running().is_some());

        let events = close_and_collect(&timer, status).await;
        assert_eq!(events.first(), Some(&Event::Stopped));
        assert!(events.contains(&Event::Running(secs(4))));
        assert!(events.contains(&Event::Running(secs(6))));
        assert_eq!(events.last(), Some(&Event::Stopped));
    }

    #[tokio::test(start_paused = true)]
    async fn test_completion_repeated() {
        let timer = SleepTimer::create().await.unwrap();
        let status = timer.status();

        timer.start(secs(1)).await.unwrap();
        sleep(Duration::from_secs(2)).await;
        timer.start(secs(1)).await.unwrap();
        sleep(Duration::from_secs(2)).await;

        let events = close_and_collect(&timer, status).await;
        assert_eq!(
            events,
            vec![
                Event::Stopped,
                Event::Running(secs(1)),
                Event::Running(secs(0)),
                Event::Finished,
                Event::Running(secs(1)),
                Event::Running(secs(0)),
                Event::Finished,
                Event::Stopped,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_completion_indefinite() {
        let timer = SleepTimer::create().await.unwrap();
        let status = timer.status();

        timer.start(None).await.unwrap();
        sleep(Duration::from_secs(1)).await;
        assert_eq!(timer.is_running(), Some(Running { remaining: None }));
        timer.finish().await.unwrap();
        sleep(Duration::from_secs(1)).await;
        timer.finish().await.unwrap();
        sleep(Duration::from_secs(1)).await;
        assert_eq!(timer.is_running(), None);

        let events = close_and_collect(&timer, status).await;
        assert_eq!(
            events,
            vec![
                Event::Stopped,
                Event::Running(None),
                Event::Finished,
                Event::Stopped,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_completion_timed() {
        let timer = SleepTimer::create().await.unwrap();
        let status = timer.status();

        timer.start(secs(2)).await.unwrap();
        sleep(Duration::from_millis(500)).await;
        timer.finish().await.unwrap();
        sleep(Duration::from_secs(1)).await;

        let events = close_and_collect(&timer, status).await;
        assert_eq!(
            events,
            vec![
                Event::Stopped,
                Event::Running(secs(2)),
                Event::Finished,
                Event::Stopped,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_tracks_countdown() {
        let timer = SleepTimer::create().await.unwrap();

        timer.start(secs(3)).await.unwrap();
        sleep(Duration::from_millis(1500)).await;
        assert_eq!(
            timer.is_running(),
            Some(Running {
                remaining: secs(2)
            })
        );
        sleep(Duration::from_secs(2)).await;
        assert_eq!(timer.is_running(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_calls_after_close_fail() {
        let timer = SleepTimer::create().await.unwrap();
        timer.close();

        assert_eq!(timer.start(secs(1)).await, Err(TimerError::Closed));
        assert_eq!(timer.start(None).await, Err(TimerError::Closed));
        assert_eq!(timer.cancel().await, Err(TimerError::Closed));
        assert_eq!(timer.finish().await, Err(TimerError::Closed));
        timer.close();
        timer.terminated().await;
        assert!(timer.is_closed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribe_after_close_ends_immediately() {
        let timer = SleepTimer::create().await.unwrap();
        timer.close();
        timer.terminated().await;

        let mut late = timer.status();
        assert_eq!(late.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_closes_worker() {
        let timer = SleepTimer::create().await.unwrap();
        let status = timer.status();
        timer.start(None).await.unwrap();
        sleep(Duration::from_millis(100)).await;
        drop(timer);

        let events: Vec<Event> = status.collect().await;
        assert_eq!(
            events,
            vec![Event::Stopped, Event::Running(None), Event::Stopped]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_remaining_never_increases_without_start() {
        let timer = SleepTimer::create().await.unwrap();
        let status = timer.status();

        timer.start(secs(5)).await.unwrap();
        sleep(Duration::from_secs(7)).await;

        let events = close_and_collect(&timer, status).await;
        let remaining: Vec<Duration> = events
            .iter()
            .filter_map(|e| match e {
                Event::Running(Some(d)) => Some(*d),
                _ => None,
            })
            .collect();
        assert_eq!(remaining.len(), 6);
        assert!(remaining.windows(2).all(|w| w[1] < w[0]));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_callers_converge() {
        let timer = Arc::new(SleepTimer::create().await.unwrap());
        let status = timer.status();

        let mut handles = Vec::new();
        for caller in 0..8u64 {
            let timer = Arc::clone(&timer);
            handles.push(tokio::spawn(async move {
                for i in 0..25u64 {
                    let res = match (caller + i) % 4 {
                        0 => timer.start(Some(Duration::from_millis(100 * i))).await,
                        1 => timer.start(None).await,
                        2 => timer.cancel().await,
                        _ => timer.finish().await,
                    };
                    if res.is_err() {
                        assert!(timer.is_closed());
                    }
                }
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        let closers: Vec<_> = (0..4)
            .map(|_| {
                let timer = Arc::clone(&timer);
                tokio::spawn(async move { timer.close() })
            })
            .collect();
        for c in closers {
            c.await.unwrap();
        }

        let events: Vec<Event> = status.collect().await;
        timer.terminated().await;

        assert!(timer.is_closed());
        assert_eq!(events.first(), Some(&Event::Stopped));
        assert_eq!(events.last(), Some(&Event::Stopped));
        assert!(events.windows(2).all(|w| w[0] != w[1]));
        for (i, ev) in events.iter().enumerate() {
            if matches!(ev, Event::Cancelled(_)) {
                assert_eq!(events.get(i + 1), Some(&Event::Stopped));
            }
        }
        assert_eq!(timer.start(None).await, Err(TimerError::Closed));
    }
}
