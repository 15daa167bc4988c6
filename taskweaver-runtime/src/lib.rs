//! TaskWeaver Runtime - periodic task execution with a start/stop lifecycle
//!
//! This crate provides [`PeriodicRunner`], which invokes an async callback on a
//! fixed cadence until it is stopped, plus the settings loader used to
//! configure it.

mod config;
mod error;
mod runnable;
mod runner;
mod time_unit;

// Re-export public API
pub use config::{RunnerConfig, DEFAULT_INTERVAL, DEFAULT_NAME};
pub use error::{BoxError, RunnerError};
pub use runnable::{CallbackFuture, Runnable};
pub use runner::{PeriodicRunner, PeriodicRunnerBuilder, RunState, RunSummary};
pub use time_unit::TimeUnit;
pub use tokio_util::sync::CancellationToken;
