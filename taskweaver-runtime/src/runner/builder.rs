use super::runner::{CompletionFn, PeriodicRunner, TickFn};
use crate::config::{RunnerConfig, DEFAULT_INTERVAL, DEFAULT_NAME};
use crate::error::{BoxError, RunnerError};
use crate::runnable::{CallbackFuture, Runnable};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Builder for [`PeriodicRunner`]
pub struct PeriodicRunnerBuilder {
    name: String,
    interval: Duration,
    tick: Option<TickFn>,
    on_complete: Option<CompletionFn>,
}

impl Default for PeriodicRunnerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PeriodicRunnerBuilder {
    /// Create a builder with a one second interval and no callbacks
    pub fn new() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            interval: DEFAULT_INTERVAL,
            tick: None,
            on_complete: None,
        }
    }

    /// Set the callback invoked on every tick
    ///
    /// The callback receives the run's cancellation token. A forced stop raises
    /// it; a tick that never checks it still runs to completion.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use taskweaver_runtime::PeriodicRunner;
    ///
    /// let runner = PeriodicRunner::builder()
    ///     .interval(Duration::from_millis(500))
    ///     .on_tick(|cancel| async move {
    ///         if !cancel.is_cancelled() {
    ///             println!("tick");
    ///         }
    ///         Ok(())
    ///     })
    ///     .build();
    /// assert!(runner.is_ok());
    /// ```
    pub fn on_tick<F, Fut>(mut self, tick: F) -> Self
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        self.tick = Some(Arc::new(move |cancel| -> CallbackFuture<'static> {
            Box::pin(tick(cancel))
        }));
        self
    }

    /// Set the callback run once by every successful stop
    pub fn on_complete<F, Fut>(mut self, on_complete: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        self.on_complete = Some(Arc::new(move || -> CallbackFuture<'static> {
            Box::pin(on_complete())
        }));
        self
    }

    /// Use a [`Runnable`] for both the tick and the completion callback
    pub fn runnable<T: Runnable>(mut self, task: Arc<T>) -> Self {
        let tick_task = task.clone();
        self.tick = Some(Arc::new(move |cancel| -> CallbackFuture<'static> {
            let task = tick_task.clone();
            Box::pin(async move { task.run(cancel).await })
        }));
        self.on_complete = Some(Arc::new(move || -> CallbackFuture<'static> {
            let task = task.clone();
            Box::pin(async move { task.on_complete().await })
        }));
        self
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Label attached to every log record of this runner
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Apply name and interval from loaded settings
    pub fn config(self, config: RunnerConfig) -> Self {
        self.name(config.name).interval(config.interval)
    }

    /// Validate and build the runner
    ///
    /// Fails with [`RunnerError::MissingTick`] without a tick callback and with
    /// [`RunnerError::InvalidInterval`] for a zero interval.
    pub fn build(self) -> Result<PeriodicRunner, RunnerError> {
        let tick = self.tick.ok_or(RunnerError::MissingTick)?;
        if self.interval.is_zero() {
            return Err(RunnerError::InvalidInterval);
        }

        Ok(PeriodicRunner::from_parts(
            self.name,
            self.interval,
            tick,
            self.on_complete,
        ))
    }
}
