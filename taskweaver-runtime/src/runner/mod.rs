mod builder;
mod runner;
mod trigger;

pub use builder::PeriodicRunnerBuilder;
pub use runner::{PeriodicRunner, RunState, RunSummary};
