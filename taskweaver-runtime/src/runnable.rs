use crate::error::BoxError;
use std::future::Future;
use std::pin::Pin;
use tokio_util::sync::CancellationToken;

/// Boxed future returned by tick and completion callbacks.
pub type CallbackFuture<'a> = Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + 'a>>;

/// Trait for periodic work
///
/// Implement this on a struct to drive it from a
/// [`PeriodicRunner`](crate::PeriodicRunner) instead of passing closures.
///
/// # Example
///
/// ```rust
/// use std::sync::atomic::{AtomicU64, Ordering};
/// use taskweaver_runtime::{CallbackFuture, CancellationToken, Runnable};
///
/// struct Heartbeat {
///     beats: AtomicU64,
/// }
///
/// impl Runnable for Heartbeat {
///     fn run(&self, _cancel: CancellationToken) -> CallbackFuture<'_> {
///         Box::pin(async move {
///             self.beats.fetch_add(1, Ordering::SeqCst);
///             Ok(())
///         })
///     }
/// }
/// ```
pub trait Runnable: Send + Sync + 'static {
    /// One tick. Long-running work should watch `cancel` to exit early on a forced stop.
    fn run(&self, cancel: CancellationToken) -> CallbackFuture<'_>;

    /// Runs once after each stop, when the tick loop has exited cleanly.
    fn on_complete(&self) -> CallbackFuture<'_> {
        Box::pin(async { Ok(()) })
    }
}
