//! # TaskWeaver - periodic async tasks with a clean lifecycle
//!
//! Run an async callback on a fixed cadence, stop it gracefully or by force,
//! and get an optional completion hook after the last tick.
//!
//! ## Features
//!
//! - **One loop per runner**: a second `start` while running is a no-op
//! - **Sequential ticks**: each tick is awaited before the next firing is awaited
//! - **Graceful stop**: waits for the in-flight tick, then runs the completion callback
//! - **Forced stop**: raises a `CancellationToken` the tick can watch to exit early
//! - **Restartable**: every `start` after a `stop` launches a fresh loop
//! - **Config support**: read name and interval from TOML/YAML files
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use taskweaver::PeriodicRunner;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let runner = PeriodicRunner::builder()
//!         .interval(Duration::from_secs(5))
//!         .on_tick(|cancel| async move {
//!             if cancel.is_cancelled() {
//!                 return Ok(());
//!             }
//!             println!("polling upstream");
//!             Ok(())
//!         })
//!         .on_complete(|| async {
//!             println!("poller stopped");
//!             Ok(())
//!         })
//!         .build()?;
//!
//!     runner.start().await?;
//!     tokio::signal::ctrl_c().await?;
//!     runner.stop().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! Create `config/application.toml`:
//!
//! ```toml
//! [runner]
//! name = "poller"
//! interval = "500ms"
//! ```
//!
//! Or `config/application.yaml`:
//!
//! ```yaml
//! runner:
//!   name: poller
//!   interval: 2
//!   time_unit: seconds
//! ```
//!
//! and load it with [`RunnerConfig::from_toml`] or [`RunnerConfig::from_yaml`].
//! Environment variables with the `TASKWEAVER_` prefix override file values:
//!
//! ```bash
//! export TASKWEAVER_RUNNER__INTERVAL=250ms
//! export TASKWEAVER_RUNNER__TIME_UNIT=milliseconds
//! ```

// Re-export core types
pub use taskweaver_runtime::{
    BoxError, CallbackFuture, CancellationToken, PeriodicRunner, PeriodicRunnerBuilder, RunState,
    RunSummary, Runnable, RunnerConfig, RunnerError, TimeUnit,
};

// Make taskweaver_runtime available for advanced use
pub use taskweaver_runtime;
