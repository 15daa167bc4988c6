use super::builder::PeriodicRunnerBuilder;
use super::trigger::{self, PeriodicTrigger, TriggerGuard};
use crate::error::{BoxError, RunnerError};
use crate::runnable::CallbackFuture;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError};
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub(crate) type TickFn = Arc<dyn Fn(CancellationToken) -> CallbackFuture<'static> + Send + Sync>;
pub(crate) type CompletionFn = Arc<dyn Fn() -> CallbackFuture<'static> + Send + Sync>;

/// Observable lifecycle position of a [`PeriodicRunner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Built, never started.
    Idle,
    /// A tick loop exists. It may already have ended on a failed tick; `stop` reports that.
    Running,
    /// The last loop was stopped. `start` launches a fresh one.
    Stopped,
    /// Terminal.
    Disposed,
}

/// What a stopped tick loop did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks that completed during this run.
    pub ticks: u64,
    /// Whether the run's cancellation token had been raised when the loop exited.
    pub cancelled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopMode {
    Graceful,
    Forced,
}

#[derive(Default)]
struct Lifecycle {
    stops: u64,
}

struct ActiveLoop {
    trigger: TriggerGuard,
    cancel: CancellationToken,
    handle: JoinHandle<Result<RunSummary, BoxError>>,
}

/// Runs an async callback on a fixed cadence until stopped.
///
/// At most one tick loop exists at a time. `start`, `stop` and `force_stop`
/// serialize on a per-runner async mutex; ticks never overlap because the loop
/// awaits each one before waiting for the next firing.
///
/// ```rust,no_run
/// use std::time::Duration;
/// use taskweaver_runtime::PeriodicRunner;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), taskweaver_runtime::RunnerError> {
/// let runner = PeriodicRunner::builder()
///     .interval(Duration::from_millis(100))
///     .on_tick(|_cancel| async { Ok(()) })
///     .on_complete(|| async { Ok(()) })
///     .build()?;
///
/// runner.start().await?;
/// tokio::time::sleep(Duration::from_secs(1)).await;
/// let summary = runner.stop().await?;
/// println!("ran {} ticks", summary.ticks);
/// # Ok(())
/// # }
/// ```
pub struct PeriodicRunner {
    name: Arc<str>,
    interval: Duration,
    tick: TickFn,
    on_complete: Option<CompletionFn>,
    // Serializes start/stop. Held across awaits, so `dispose` cannot wait on it.
    lifecycle: Mutex<Lifecycle>,
    // Only touched briefly, never across an await; `dispose` can always take it.
    active: std::sync::Mutex<Option<ActiveLoop>>,
    // Parent of every trigger and cancellation token; raised by `dispose`.
    lifetime: CancellationToken,
    disposed: AtomicBool,
}

impl PeriodicRunner {
    pub fn builder() -> PeriodicRunnerBuilder {
        PeriodicRunnerBuilder::new()
    }

    /// Runner with a tick callback, no completion callback and a one second interval.
    pub fn new<F, Fut>(tick: F) -> Result<Self, RunnerError>
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        PeriodicRunnerBuilder::new().on_tick(tick).build()
    }

    pub(crate) fn from_parts(
        name: String,
        interval: Duration,
        tick: TickFn,
        on_complete: Option<CompletionFn>,
    ) -> Self {
        Self {
            name: name.into(),
            interval,
            tick,
            on_complete,
            lifecycle: Mutex::new(Lifecycle::default()),
            active: std::sync::Mutex::new(None),
            lifetime: CancellationToken::new(),
            disposed: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    pub async fn state(&self) -> RunState {
        if self.is_disposed() {
            return RunState::Disposed;
        }
        let lifecycle = self.lifecycle.lock().await;
        if self.is_disposed() {
            RunState::Disposed
        } else if self.active().is_some() {
            RunState::Running
        } else if lifecycle.stops > 0 {
            RunState::Stopped
        } else {
            RunState::Idle
        }
    }

    /// Launch the tick loop.
    ///
    /// Returns once the loop is spawned, before any tick runs. Calling it while
    /// a loop exists does nothing.
    pub async fn start(&self) -> Result<(), RunnerError> {
        let _lifecycle = self.lock().await?;

        if self.active().is_some() {
            debug!(runner = %self.name, "start ignored, tick loop already running");
            return Ok(());
        }

        let (trigger, ticker) = trigger::periodic(self.interval, &self.lifetime);
        let cancel = self.lifetime.child_token();
        let handle = tokio::spawn(tick_loop(
            ticker,
            cancel.clone(),
            self.tick.clone(),
            self.name.clone(),
        ));

        *self.active() = Some(ActiveLoop {
            trigger,
            cancel,
            handle,
        });

        info!(
            runner = %self.name,
            interval_ms = self.interval.as_millis() as u64,
            "periodic runner started"
        );
        Ok(())
    }

    /// Stop after the in-flight tick, then run the completion callback.
    pub async fn stop(&self) -> Result<RunSummary, RunnerError> {
        self.shutdown(StopMode::Graceful).await
    }

    /// Raise the cancellation token, then stop as [`stop`](Self::stop) does.
    ///
    /// The in-flight tick is not aborted. It ends early only if it watches the token.
    pub async fn force_stop(&self) -> Result<RunSummary, RunnerError> {
        self.shutdown(StopMode::Forced).await
    }

    async fn shutdown(&self, mode: StopMode) -> Result<RunSummary, RunnerError> {
        let mut lifecycle = self.lock().await?;

        let ActiveLoop {
            trigger,
            cancel,
            handle,
        } = self.active().take().ok_or(RunnerError::NotStarted)?;
        lifecycle.stops += 1;

        if mode == StopMode::Forced {
            cancel.cancel();
        }
        drop(trigger);

        let outcome = handle.await;
        drop(cancel);

        let summary = match outcome {
            Ok(Ok(summary)) => summary,
            Ok(Err(e)) => {
                warn!(runner = %self.name, error = %e, "tick loop ended with an error");
                return Err(RunnerError::Tick(e));
            }
            Err(e) if e.is_panic() => {
                warn!(runner = %self.name, "tick loop panicked");
                return Err(RunnerError::TickPanicked);
            }
            Err(_) => return Err(RunnerError::LoopAborted),
        };

        info!(
            runner = %self.name,
            ticks = summary.ticks,
            forced = mode == StopMode::Forced,
            "periodic runner stopped"
        );

        if let Some(on_complete) = &self.on_complete {
            on_complete().await.map_err(|e| {
                warn!(runner = %self.name, error = %e, "completion callback failed");
                RunnerError::Completion(e)
            })?;
        }

        Ok(summary)
    }

    /// Release everything without waiting.
    ///
    /// Closes the trigger and raises the cancellation token of any running
    /// loop, then detaches it. The completion callback is not run. Idempotent;
    /// every later `start` or `stop` fails with [`RunnerError::Disposed`].
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }

        self.lifetime.cancel();
        // A stop in progress has already taken the triple and drops it itself.
        self.active().take();

        debug!(runner = %self.name, "periodic runner disposed");
    }

    fn active(&self) -> std::sync::MutexGuard<'_, Option<ActiveLoop>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn lock(&self) -> Result<MutexGuard<'_, Lifecycle>, RunnerError> {
        if self.is_disposed() {
            return Err(RunnerError::Disposed);
        }
        let guard = self.lifecycle.lock().await;
        if self.is_disposed() {
            return Err(RunnerError::Disposed);
        }
        Ok(guard)
    }
}

impl fmt::Debug for PeriodicRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeriodicRunner")
            .field("name", &self.name)
            .field("interval", &self.interval)
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}

impl Drop for PeriodicRunner {
    fn drop(&mut self) {
        self.dispose();
    }
}

async fn tick_loop(
    mut trigger: PeriodicTrigger,
    cancel: CancellationToken,
    tick: TickFn,
    name: Arc<str>,
) -> Result<RunSummary, BoxError> {
    let mut ticks = 0u64;

    while trigger.wait_for_next_tick(&cancel).await {
        tick(cancel.clone()).await?;
        ticks += 1;
        debug!(runner = %name, tick = ticks, "tick completed");
    }

    Ok(RunSummary {
        ticks,
        cancelled: cancel.is_cancelled(),
    })
}
