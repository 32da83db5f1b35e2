//! # TimerWorker: the single owner of timer state.
//!
//! One worker task runs per [`SleepTimer`](crate::SleepTimer) for the whole
//! lifetime of the instance. It consumes [`Request`]s, counts down, decides every
//! transition and publishes the resulting [`Event`]s.
//!
//! ## State machine
//! ```text
//!                    ┌──────────── Stop / Finish ───────────┐
//!                    ▼                                      │
//! ┌─────────────────────────┐   Start(d)   ┌────────────────┴────────┐
//! │ AwaitingInitial         │ ───────────► │ Running(remaining)      │ ◄─┐ Start(d) / tick
//! │ (waits without timeout) │ ◄─────────── │ (waits up to one TICK)  │ ──┘
//! └───────────┬─────────────┘  elapsed     └────────────┬────────────┘
//!             │                                         │
//!             └──── Close / shutdown / channel closed ──┴──► Terminated
//! ```
//!
//! ## Transitions
//! | From            | Received          | Publishes                  | Next            |
//! |-----------------|-------------------|----------------------------|-----------------|
//! | AwaitingInitial | `Start(d)`        | `Running(d)`               | Running(d)      |
//! | AwaitingInitial | `Stop`            | `Stopped` (redundant)      | AwaitingInitial |
//! | AwaitingInitial | `Finish`          | `Finished`                 | AwaitingInitial |
//! | Running(d)      | tick, `d = Some`  | `Running(d - TICK)`, and `Finished` once below one tick | Running / AwaitingInitial |
//! | Running(None)   | tick              | nothing                    | Running(None)   |
//! | Running(d)      | `Start(d')`       | `Running(d')`              | Running(d')     |
//! | Running(d)      | `Stop`            | `Cancelled(d)`, `Stopped`  | AwaitingInitial |
//! | Running(d)      | `Finish`          | `Finished`                 | AwaitingInitial |
//! | any             | `Close`/shutdown  | (exit sequence)            | Terminated      |
//!
//! ## Rules
//! - Startup publishes `Stopped` and then fires the readiness barrier.
//! - Exit always publishes `Stopped` and completes the bus, on every path
//!   (including panics and the task being dropped by its runtime).
//! - A failing or panicking iteration is logged and the loop resumes idle.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::{mpsc, oneshot};
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use super::request::Request;
use super::snapshot::RunningSnapshot;
use crate::error::WorkerError;
use crate::events::{Bus, Event};

/// Countdown resolution: the remaining time drops by this much per tick.
pub const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    AwaitingInitial,
    Running(Option<Duration>),
}

enum Flow {
    Next(Phase),
    Terminate,
}

/// Background task driving one sleep timer.
pub(crate) struct TimerWorker {
    requests: mpsc::Receiver<Request>,
    bus: Bus,
    snapshot: Arc<RunningSnapshot>,
    shutdown: CancellationToken,
}

impl TimerWorker {
    pub(crate) fn new(
        requests: mpsc::Receiver<Request>,
        bus: Bus,
        snapshot: Arc<RunningSnapshot>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            requests,
            bus,
            snapshot,
            shutdown,
        }
    }

    /// Runs until a `Close` request, the shutdown token, or the facade going away.
    ///
    /// `ready` fires once the initial `Stopped` is published. `done` is cancelled
    /// after the exit sequence has completed the bus.
    pub(crate) async fn run(mut self, ready: oneshot::Sender<()>, done: CancellationToken) {
        let _exit = ExitGuard {
            bus: self.bus.clone(),
            snapshot: Arc::clone(&self.snapshot),
            done,
        };

        debug!("starting timer worker");
        if let Err(e) = self.bus.publish(Event::Stopped) {
            warn!(error = %e, "initial status not published");
        }
        let _ = ready.send(());

        let mut phase = Phase::AwaitingInitial;
        loop {
            let step = AssertUnwindSafe(self.step(phase)).catch_unwind().await;
            let outcome = step
                .unwrap_or_else(|panic| Err(WorkerError::Panicked(panic_message(&*panic))));

            match outcome {
                Ok(Flow::Next(next)) => phase = next,
                Ok(Flow::Terminate) => break,
                Err(e) => {
                    error!(error = %e, label = e.as_label(), "error processing timer request");
                    phase = Phase::AwaitingInitial;
                }
            }
        }
    }

    async fn step(&mut self, phase: Phase) -> Result<Flow, WorkerError> {
        match phase {
            Phase::AwaitingInitial => self.await_initial().await,
            Phase::Running(remaining) => self.hold(remaining).await,
        }
    }

    /// Idle: blocks until a request arrives or the timer is shut down.
    async fn await_initial(&mut self) -> Result<Flow, WorkerError> {
        self.snapshot.clear();
        debug!("waiting for timer requests");

        let request = tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => None,
            req = self.requests.recv() => req,
        };
        if self.shutdown.is_cancelled() {
            return Ok(Flow::Terminate);
        }

        match request {
            None | Some(Request::Close) => Ok(Flow::Terminate),
            Some(Request::Start(remaining)) => {
                debug!(?remaining, "received start request");
                self.enter_running(remaining)
            }
            Some(Request::Stop) => {
                debug!("received (redundant) stop request");
                self.bus.publish(Event::Stopped)?;
                Ok(Flow::Next(Phase::AwaitingInitial))
            }
            Some(Request::Finish) => {
                debug!("received finish request");
                self.finish()
            }
        }
    }

    /// Running: waits up to one tick for a request, then counts down.
    async fn hold(&mut self, remaining: Option<Duration>) -> Result<Flow, WorkerError> {
        let request = tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => return Ok(Flow::Terminate),
            req = self.requests.recv() => req,
            _ = time::sleep(TICK) => return self.tick(remaining),
        };

        match request {
            None | Some(Request::Close) => Ok(Flow::Terminate),
            Some(Request::Start(next)) => {
                debug!(?remaining, ?next, "restarting timer");
                self.enter_running(next)
            }
            Some(Request::Stop) => {
                debug!(?remaining, "stopping timer");
                self.snapshot.clear();
                self.bus.publish(Event::Cancelled(remaining))?;
                self.bus.publish(Event::Stopped)?;
                Ok(Flow::Next(Phase::AwaitingInitial))
            }
            Some(Request::Finish) => {
                debug!(?remaining, "received finish request");
                self.finish()
            }
        }
    }

    fn tick(&self, remaining: Option<Duration>) -> Result<Flow, WorkerError> {
        let Some(current) = remaining else {
            return Ok(Flow::Next(Phase::Running(None)));
        };

        let next = current.saturating_sub(TICK);
        self.snapshot.store(Some(next));
        self.bus.publish(Event::Running(Some(next)))?;

        if next < TICK {
            debug!("timer finished");
            return self.finish();
        }
        Ok(Flow::Next(Phase::Running(Some(next))))
    }

    fn enter_running(&self, remaining: Option<Duration>) -> Result<Flow, WorkerError> {
        self.snapshot.store(remaining);
        self.bus.publish(Event::Running(remaining))?;
        Ok(Flow::Next(Phase::Running(remaining)))
    }

    fn finish(&self) -> Result<Flow, WorkerError> {
        self.snapshot.clear();
        self.bus.publish(Event::Finished)?;
        Ok(Flow::Next(Phase::AwaitingInitial))
    }
}

/// Runs the exit sequence when the worker's future ends or is dropped.
struct ExitGuard {
    bus: Bus,
    snapshot: Arc<RunningSnapshot>,
    done: CancellationToken,
}

impl Drop for ExitGuard {
    fn drop(&mut self) {
        debug!("stopping timer worker");
        self.snapshot.clear();
        if let Err(e) = self.bus.publish(Event::Stopped) {
            warn!(error = %e, "final status not published");
        }
        self.bus.complete();
        self.done.cancel();
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
