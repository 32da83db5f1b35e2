//! # Example: pause_on_finish
//!
//! Wires a player collaborator to the timer: playback pauses when the timer
//! finishes, and a "menu label" follows the remaining time.
//!
//! Shows how to:
//! - Implement the [`Subscribe`] trait.
//! - React to [`Event::Finished`] and [`Event::Running`].
//! - Finish an indefinite ("end of chapter") timer early with `finish()`.
//!
//! ## Flow
//! ```text
//! start(None) ──► Running(None) ──► label "until end of chapter"
//! chapter ends ──► finish() ──► Finished ──► player.pause()
//! start(3s) ──► Running(3s..0s) ──► Finished ──► player.pause()
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example pause_on_finish
//! ```

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use sleep_timer::{Config, Event, SleepTimer, Subscribe, format_remaining};

/// Stand-in for the audio player.
#[derive(Default)]
struct Player {
    playing: AtomicBool,
    label: Mutex<String>,
}

impl Player {
    fn play(&self) {
        self.playing.store(true, Ordering::SeqCst);
        println!("[player] playing");
    }

    fn pause(&self) {
        self.playing.store(false, Ordering::SeqCst);
        println!("[player] paused by sleep timer");
    }
}

/// Pauses the player on `Finished` and keeps the menu label current.
struct PauseOnFinish {
    player: Arc<Player>,
}

#[async_trait]
impl Subscribe for PauseOnFinish {
    async fn on_event(&self, ev: &Event) {
        let label = match ev {
            Event::Running(Some(d)) => format_remaining(*d),
            Event::Running(None) => "until end of chapter".to_string(),
            Event::Finished => {
                self.player.pause();
                String::new()
            }
            Event::Stopped | Event::Cancelled(_) => String::new(),
        };
        if let Ok(mut current) = self.player.label.lock() {
            if *current != label {
                println!("[menu] sleep timer: {:?}", label);
                *current = label;
            }
        }
    }

    fn name(&self) -> &'static str {
        "pause-on-finish"
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let player = Arc::new(Player::default());
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(PauseOnFinish {
        player: Arc::clone(&player),
    })];

    let timer = SleepTimer::builder(Config::default())
        .with_subscribers(subs)
        .build()
        .await?;

    player.play();
    timer.start(None).await?;
    tokio::time::sleep(Duration::from_millis(1500)).await;
    println!("[demo] chapter ended");
    timer.finish().await?;
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!player.playing.load(Ordering::SeqCst));

    player.play();
    timer.start(Some(Duration::from_secs(3))).await?;
    tokio::time::sleep(Duration::from_millis(3500)).await;
    assert!(!player.playing.load(Ordering::SeqCst));

    timer.close();
    timer.terminated().await;
    Ok(())
}
