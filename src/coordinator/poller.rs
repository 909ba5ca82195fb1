//! Interval timer driving the coordinator's refreshes

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info};

use super::Shared;

/// Background task that refreshes on every interval tick.
///
/// Dropping the poller aborts the task, so the timer never outlives its
/// coordinator, whichever way the coordinator is torn down.
pub(crate) struct Poller {
    task: Option<JoinHandle<()>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl Poller {
    /// Spawn the poller. The first tick fires after `first_delay`.
    pub(crate) fn spawn(shared: Arc<Shared>, first_delay: Duration) -> Self {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
        let period = shared.config.update_interval();

        let task = tokio::spawn(async move {
            info!(
                coordinator = %shared.config.name,
                interval_secs = period.as_secs(),
                "Poller started"
            );

            let mut interval = interval_at(Instant::now() + first_delay, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if !shared.tick().await {
                            debug!(coordinator = %shared.config.name, "Tick skipped");
                        }
                    }
                    _ = &mut shutdown_rx => break,
                }
            }

            info!(coordinator = %shared.config.name, "Poller stopped");
        });

        Self {
            task: Some(task),
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Stop after any in-flight refresh has finished.
    pub(crate) async fn stop(mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
