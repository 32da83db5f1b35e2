//! Timer core: control surface, worker and lifecycle.
//!
//! The public API from this module is [`SleepTimer`] (built via
//! [`SleepTimerBuilder`]) together with its [`Config`] and the [`Running`] snapshot.
//!
//! Internal modules:
//! - [`worker`]: the single task that owns timer state and publishes events;
//! - [`request`]: bounded request queue between the facade and the worker;
//! - [`snapshot`]: lock-free copy of the running state for `is_running()`;
//! - [`timer`]: the facade, closed flag and shutdown sequence;
//! - [`builder`]: wires bus, subscribers and worker together.

mod builder;
mod config;
mod request;
mod snapshot;
mod timer;
mod worker;

pub use builder::SleepTimerBuilder;
pub use config::Config;
pub use snapshot::Running;
pub use timer::SleepTimer;
pub use worker::TICK;
