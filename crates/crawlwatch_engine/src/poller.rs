use std::time::Duration;

use engine_logging::engine_debug;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Cancellable periodic task. The first tick fires one full period after `start`.
///
/// Dropping the poller cancels it, so callbacks cannot outlive the owner.
#[derive(Debug)]
pub struct Poller {
    period: Duration,
    cancel: Option<CancellationToken>,
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            cancel: None,
            handle: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Starts ticking; a no-op while already running. `on_tick` returning
    /// false ends the task (e.g. its receiver is gone).
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F>(&mut self, mut on_tick: F)
    where
        F: FnMut() -> bool + Send + 'static,
    {
        if self.is_running() {
            return;
        }
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let period = self.period;

        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = interval.tick() => {
                        if !on_tick() {
                            break;
                        }
                    }
                }
            }
            engine_debug!("Poller task exited");
        });

        engine_debug!("Poller started, period {:?}", period);
        self.cancel = Some(token);
        self.handle = Some(handle);
    }

    pub fn stop(&mut self) {
        if let Some(token) = self.cancel.take() {
            token.cancel();
            engine_debug!("Poller stopped");
        }
        self.handle = None;
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}
