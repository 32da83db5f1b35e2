//! # Example: countdown
//!
//! Runs a short sleep timer to completion with the built-in [`LogWriter`].
//!
//! Shows how to:
//! - Install a `tracing` subscriber with an env filter.
//! - Attach [`LogWriter`] through [`SleepTimer::builder`].
//! - Read the status stream while the timer counts down.
//!
//! ## Flow
//! ```text
//! SleepTimer::builder(cfg).with_subscribers([LogWriter]).build()
//!     ├─► start(Some(5s))
//!     ├─► worker ticks: Running(5s) → Running(4s) → ... → Running(0s) → Finished
//!     ├─► LogWriter logs each event
//!     └─► close() ──► Stopped ──► stream completes
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example countdown --features logging
//! ```

use std::{sync::Arc, time::Duration};

use sleep_timer::{Config, Event, LogWriter, SleepTimer, Subscribe};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let timer = SleepTimer::builder(Config::default())
        .with_subscribers(subs)
        .build()
        .await?;

    let mut status = timer.status();
    timer.start(Some(Duration::from_secs(5))).await?;

    while let Some(ev) = status.recv().await {
        println!("[demo] {ev}");
        if ev == Event::Finished {
            break;
        }
    }

    timer.close();
    timer.terminated().await;
    Ok(())
}
