use std::sync::Arc;

use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{
    config::Config, request, snapshot::RunningSnapshot, timer::SleepTimer, worker::TimerWorker,
};
use crate::{
    error::TimerError,
    events::Bus,
    subscribers::{Subscribe, SubscriberSet},
};

/// Builder for constructing a [`SleepTimer`] with optional subscribers.
pub struct SleepTimerBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl SleepTimerBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers.
    ///
    /// Subscribers receive every status event, starting with the initial
    /// `Stopped`, through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Spawns the worker and returns the timer once it is ready.
    ///
    /// Must be called from within a tokio runtime. By the time this returns the
    /// initial `Stopped` has been published and requests are being served.
    ///
    /// # Errors
    /// [`TimerError::WorkerUnavailable`] if the worker exits before signalling
    /// readiness.
    pub async fn build(self) -> Result<SleepTimer, TimerError> {
        let bus = Bus::new();
        let drained = CancellationToken::new();
        let subs = SubscriberSet::new(self.subscribers);
        if subs.is_empty() {
            drained.cancel();
        } else {
            subs.spawn_listener(bus.subscribe(), drained.clone());
        }

        let (requests, rx) = request::channel(self.cfg.queue_capacity_clamped());
        let snapshot = Arc::new(RunningSnapshot::new());
        let shutdown = CancellationToken::new();
        let done = CancellationToken::new();

        let worker = TimerWorker::new(rx, bus.clone(), Arc::clone(&snapshot), shutdown.clone());
        let (ready_tx, ready_rx) = oneshot::channel();
        tokio::spawn(worker.run(ready_tx, done.clone()));

        ready_rx.await.map_err(|_| TimerError::WorkerUnavailable)?;
        debug!(queue_capacity = self.cfg.queue_capacity_clamped(), "sleep timer ready");

        Ok(SleepTimer::new_internal(
            self.cfg, requests, shutdown, done, drained, snapshot, bus,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Event;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<Event>>,
    }

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, event: &Event) {
            self.seen.lock().unwrap().push(*event);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_full_lifecycle() {
        let rec = Arc::new(Recorder::default());
        let subs: Vec<Arc<dyn Subscribe>> = vec![rec.clone()];
        let timer = SleepTimerBuilder::new(Config::default())
            .with_subscribers(subs)
            .build()
            .await
            .unwrap();

        timer.start(Some(Duration::from_secs(1))).await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
        timer.close();
        timer.terminated().await;

        assert_eq!(
            *rec.seen.lock().unwrap(),
            vec![
                Event::Stopped,
                Event::Running(Some(Duration::from_secs(1))),
                Event::Running(Some(Duration::ZERO)),
                Event::Finished,
                Event::Stopped,
            ]
        );
    }

    struct SlowPlayer {
        seen: Mutex<Vec<Event>>,
    }

    #[async_trait]
    impl Subscribe for SlowPlayer {
        async fn on_event(&self, event: &Event) {
            tokio::time::sleep(Duration::from_secs(10)).await;
            self.seen.lock().unwrap().push(*event);
        }

        fn queue_capacity(&self) -> usize {
            2
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_subscriber_still_sees_finished_and_final_stop() {
        let slow = Arc::new(SlowPlayer {
            seen: Mutex::new(Vec::new()),
        });
        let subs: Vec<Arc<dyn Subscribe>> = vec![slow.clone()];
        let timer = SleepTimerBuilder::new(Config::default())
            .with_subscribers(subs)
            .build()
            .await
            .unwrap();

        timer.start(Some(Duration::from_secs(3))).await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        timer.close();
        timer.terminated().await;

        let seen = slow.seen.lock().unwrap().clone();
        assert_eq!(seen.first(), Some(&Event::Stopped));
        assert!(seen.contains(&Event::Finished));
        assert_eq!(seen.last(), Some(&Event::Stopped));
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_queue_capacity() {
        let cfg = Config {
            queue_capacity: 0,
            ..Config::default()
        };
        let timer = SleepTimerBuilder::new(cfg).build().await.unwrap();
        assert_eq!(timer.config().queue_capacity_clamped(), 1);

        timer.start(None).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(timer.is_running().is_some());
    }
}
