use thiserror::Error;

/// Error type produced by tick and completion callbacks.
///
/// Anything implementing `std::error::Error + Send + Sync` converts into it,
/// so callbacks can use `?` freely.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by [`PeriodicRunner`](crate::PeriodicRunner) and its builder.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The builder was finished without a tick callback.
    #[error("a tick callback is required")]
    MissingTick,

    /// The configured interval cannot drive a periodic trigger.
    #[error("interval must be greater than zero")]
    InvalidInterval,

    /// `stop` was called while no tick loop exists.
    #[error("cannot stop a runner that has not been started")]
    NotStarted,

    /// The runner was disposed and no longer accepts lifecycle calls.
    #[error("runner has been disposed")]
    Disposed,

    /// The tick callback failed, which ended the tick loop.
    #[error("tick callback failed: {0}")]
    Tick(#[source] BoxError),

    /// The tick callback panicked, which ended the tick loop.
    #[error("tick callback panicked")]
    TickPanicked,

    /// The tick loop task was cancelled by the runtime before it could finish.
    #[error("tick loop was aborted")]
    LoopAborted,

    /// The completion callback failed after the loop had stopped.
    #[error("completion callback failed: {0}")]
    Completion(#[source] BoxError),

    #[error("failed to load runner settings: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid interval setting: {0}")]
    Interval(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_started_message_matches_lifecycle_wording() {
        assert_eq!(
            RunnerError::NotStarted.to_string(),
            "cannot stop a runner that has not been started"
        );
    }

    #[test]
    fn callback_errors_keep_their_source() {
        let err = RunnerError::Tick("disk full".into());
        assert_eq!(err.to_string(), "tick callback failed: disk full");
        assert!(std::error::Error::source(&err).is_some());
    }
}
