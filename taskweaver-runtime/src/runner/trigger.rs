use std::time::Duration;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Periodic trigger consumed by the tick loop.
///
/// Fires once per period, the first time one period after creation. Firings
/// missed while a tick was running collapse into a single immediate one.
pub(crate) struct PeriodicTrigger {
    interval: Interval,
    closed: CancellationToken,
}

/// Owning side of a trigger. Closing or dropping it ends the trigger.
pub(crate) struct TriggerGuard {
    closed: CancellationToken,
}

/// Create a trigger whose lifetime is also bounded by `parent`.
pub(crate) fn periodic(
    period: Duration,
    parent: &CancellationToken,
) -> (TriggerGuard, PeriodicTrigger) {
    let closed = parent.child_token();

    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    (
        TriggerGuard {
            closed: closed.clone(),
        },
        PeriodicTrigger { interval, closed },
    )
}

impl PeriodicTrigger {
    /// Wait for the next firing.
    ///
    /// Returns `false` once the trigger is closed or `cancel` is raised. Both
    /// take priority over a firing that is already due.
    pub(crate) async fn wait_for_next_tick(&mut self, cancel: &CancellationToken) -> bool {
        if self.closed.is_cancelled() || cancel.is_cancelled() {
            return false;
        }

        tokio::select! {
            biased;
            _ = self.closed.cancelled() => false,
            _ = cancel.cancelled() => false,
            _ = self.interval.tick() => true,
        }
    }
}

impl Drop for TriggerGuard {
    fn drop(&mut self) {
        self.closed.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_firing_waits_one_period() {
        let lifetime = CancellationToken::new();
        let cancel = CancellationToken::new();
        let (_guard, mut trigger) = periodic(Duration::from_millis(100), &lifetime);

        let started = Instant::now();
        assert!(trigger.wait_for_next_tick(&cancel).await);
        let first = started.elapsed();
        assert!(first >= Duration::from_millis(100) && first < Duration::from_millis(102));

        assert!(trigger.wait_for_next_tick(&cancel).await);
        let second = started.elapsed();
        assert!(second >= Duration::from_millis(200) && second < Duration::from_millis(202));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_guard_ends_trigger_even_when_due() {
        let lifetime = CancellationToken::new();
        let cancel = CancellationToken::new();
        let (guard, mut trigger) = periodic(Duration::from_millis(10), &lifetime);

        time::sleep(Duration::from_millis(50)).await;
        drop(guard);

        assert!(!trigger.wait_for_next_tick(&cancel).await);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_wakes_a_pending_wait() {
        let lifetime = CancellationToken::new();
        let cancel = CancellationToken::new();
        let (_guard, mut trigger) = periodic(Duration::from_secs(60), &lifetime);

        let canceller = cancel.clone();
        tokio::spawn(async move {
            time::sleep(Duration::from_millis(5)).await;
            canceller.cancel();
        });

        let started = Instant::now();
        assert!(!trigger.wait_for_next_tick(&cancel).await);
        assert!(started.elapsed() < Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn parent_cancellation_closes_trigger() {
        let lifetime = CancellationToken::new();
        let cancel = CancellationToken::new();
        let (_guard, mut trigger) = periodic(Duration::from_millis(10), &lifetime);

        lifetime.cancel();
        assert!(!trigger.wait_for_next_tick(&cancel).await);
    }
}
