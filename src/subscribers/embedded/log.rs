//! # LogWriter: simple event logger
//!
//! A minimal subscriber that writes incoming [`Event`]s through `tracing`.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! INFO sleep_timer: [stopped]
//! INFO sleep_timer: [running] remaining=00:03
//! INFO sleep_timer: [running] until end of chapter
//! INFO sleep_timer: [cancelled] remaining=00:02
//! INFO sleep_timer: [finished]
//! ```

use async_trait::async_trait;
use tracing::info;

use crate::events::{Event, format_remaining};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e {
            Event::Stopped => info!(target: "sleep_timer", "[stopped]"),
            Event::Running(Some(d)) => {
                info!(target: "sleep_timer", remaining = %format_remaining(*d), "[running]");
            }
            Event::Running(None) => info!(target: "sleep_timer", "[running] until end of chapter"),
            Event::Cancelled(Some(d)) => {
                info!(target: "sleep_timer", remaining = %format_remaining(*d), "[cancelled]");
            }
            Event::Cancelled(None) => info!(target: "sleep_timer", "[cancelled]"),
            Event::Finished => info!(target: "sleep_timer", "[finished]"),
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
