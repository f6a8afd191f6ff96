// ── Real-time monitor ──
//
// A cancellable periodic task. The first tick fires immediately, then
// once per interval; a slow tick delays the next one instead of bursting.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Shortest period any monitor or poll loop runs at. Shorter requests,
/// zero included, are raised to it.
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Handle to a running periodic task. Dropping it stops the task.
#[derive(Debug)]
pub struct RealtimeMonitor {
    interval: Duration,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl RealtimeMonitor {
    /// Spawn `tick` every `interval` (at least [`MIN_INTERVAL`]) until
    /// stopped. `parent` cancels the monitor along with everything else
    /// owned by the same dashboard.
    pub fn start<F, Fut>(interval: Duration, parent: &CancellationToken, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let interval = interval.max(MIN_INTERVAL);
        let cancel = parent.child_token();
        let token = cancel.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    () = token.cancelled() => break,
                    _ = ticker.tick() => {
                        debug!(?interval, "realtime tick");
                        tick().await;
                    }
                }
            }
            debug!("realtime monitor stopped");
        });

        Self {
            interval,
            cancel,
            handle,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled() && !self.handle.is_finished()
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for RealtimeMonitor {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counting() -> (Arc<AtomicUsize>, impl FnMut() -> futures_util::future::Ready<()> + Send) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        (count, move || {
            c.fetch_add(1, Ordering::SeqCst);
            futures_util::future::ready(())
        })
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_immediately_then_every_interval() {
        let (count, tick) = counting();
        let root = CancellationToken::new();
        let monitor = RealtimeMonitor::start(Duration::from_secs(10), &root, tick);

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        tokio::time::sleep(Duration::from_secs(4)).await;
        monitor.stop();
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(!monitor.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn parent_cancellation_stops_monitor() {
        let (count, tick) = counting();
        let root = CancellationToken::new();
        let monitor = RealtimeMonitor::start(Duration::from_secs(5), &root, tick);
        tokio::time::sleep(Duration::from_millis(1)).await;

        root.cancel();
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!monitor.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_runs_at_the_floor() {
        let (count, tick) = counting();
        let root = CancellationToken::new();
        let monitor = RealtimeMonitor::start(Duration::ZERO, &root, tick);
        assert_eq!(monitor.interval(), MIN_INTERVAL);

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        tokio::time::sleep(MIN_INTERVAL).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(monitor.is_running());
    }
}
