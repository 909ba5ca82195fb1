//! Periodic refresh of rig and account data.
//!
//! A `RefreshCoordinator` polls a [`MiningApi`] on a fixed interval, bounds
//! each refresh by [`REFRESH_TIMEOUT`] and keeps the last successful
//! [`Snapshot`] for readers. Failures never replace the stored snapshot; they
//! are reported once each on the failure channel.

mod poller;

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::join;
use tokio::sync::{Mutex, broadcast, watch};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::api::MiningApi;
use crate::config::{CoordinatorConfig, REFRESH_TIMEOUT};
use crate::data::snapshot::Snapshot;
use crate::error::{ConfigError, FetchError, SetupError, UpdateFailed};
use poller::Poller;

const FAILURE_CHANNEL_CAPACITY: usize = 16;

/// State shared between the coordinator handle and its poller task
pub(crate) struct Shared {
    api: Arc<dyn MiningApi>,
    config: CoordinatorConfig,
    /// Held for the duration of a refresh
    refresh_lock: Mutex<()>,
    snapshot_tx: watch::Sender<Option<Arc<Snapshot>>>,
    last_error_tx: watch::Sender<Option<UpdateFailed>>,
    failures_tx: broadcast::Sender<UpdateFailed>,
}

impl Shared {
    /// Refresh now, waiting for any refresh already in flight to finish first
    async fn refresh(&self) -> Result<Arc<Snapshot>, UpdateFailed> {
        let _guard = self.refresh_lock.lock().await;
        self.refresh_locked().await
    }

    /// Refresh from a timer tick. Returns false if a refresh was already in flight.
    async fn tick(&self) -> bool {
        let Ok(_guard) = self.refresh_lock.try_lock() else {
            return false;
        };
        // failures are already published by refresh_locked
        let _ = self.refresh_locked().await;
        true
    }

    async fn refresh_locked(&self) -> Result<Arc<Snapshot>, UpdateFailed> {
        match self.fetch().await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                self.snapshot_tx.send_replace(Some(Arc::clone(&snapshot)));
                self.last_error_tx.send_replace(None);
                debug!(
                    coordinator = %self.config.name,
                    timestamp = snapshot.timestamp,
                    "Refresh succeeded"
                );
                Ok(snapshot)
            }
            Err(cause) => {
                let failure = UpdateFailed::new(cause);
                warn!(coordinator = %self.config.name, error = %failure, "Refresh failed");
                self.last_error_tx.send_replace(Some(failure.clone()));
                // no subscribers is fine
                let _ = self.failures_tx.send(failure.clone());
                Err(failure)
            }
        }
    }

    async fn fetch(&self) -> Result<Snapshot, FetchError> {
        let rigs = self.api.fetch_rigs().inspect(|result| match result {
            Ok(rigs) => debug!(%rigs, "API rigs response"),
            Err(e) => debug!(error = %e, "API rigs response"),
        });
        let account = self.api.fetch_account(&self.config.fiat);

        // both fetches run to completion so the rigs result is always observed;
        // dropping the joined future on expiry cancels them
        let (rigs, account) = timeout(REFRESH_TIMEOUT, join(rigs, account))
            .await
            .map_err(|_| FetchError::Timeout(REFRESH_TIMEOUT))?;

        Ok(Snapshot::new(rigs?, account?))
    }
}

/// Polls a [`MiningApi`] and caches the last good [`Snapshot`].
pub struct RefreshCoordinator {
    shared: Arc<Shared>,
    poller: Option<Poller>,
}

impl RefreshCoordinator {
    /// Create a coordinator that only refreshes when asked to.
    pub fn new(api: Arc<dyn MiningApi>, config: CoordinatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let (snapshot_tx, _) = watch::channel(None);
        let (last_error_tx, _) = watch::channel(None);
        let (failures_tx, _) = broadcast::channel(FAILURE_CHANNEL_CAPACITY);

        Ok(Self {
            shared: Arc::new(Shared {
                api,
                config,
                refresh_lock: Mutex::new(()),
                snapshot_tx,
                last_error_tx,
                failures_tx,
            }),
            poller: None,
        })
    }

    /// Create a coordinator and start polling, beginning with an immediate refresh.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(api: Arc<dyn MiningApi>, config: CoordinatorConfig) -> Result<Self, ConfigError> {
        let mut coordinator = Self::new(api, config)?;
        coordinator.poller = Some(Poller::spawn(Arc::clone(&coordinator.shared), Duration::ZERO));
        Ok(coordinator)
    }

    /// Refresh once, then start polling on the regular interval.
    ///
    /// If the first refresh fails nothing is left running.
    pub async fn start_after_first_refresh(
        api: Arc<dyn MiningApi>,
        config: CoordinatorConfig,
    ) -> Result<Self, SetupError> {
        let mut coordinator = Self::new(api, config)?;
        coordinator.refresh().await?;

        let first_delay = coordinator.shared.config.update_interval();
        coordinator.poller = Some(Poller::spawn(Arc::clone(&coordinator.shared), first_delay));
        Ok(coordinator)
    }

    /// Refresh now, outside the regular schedule.
    ///
    /// Waits for a refresh already in flight before starting, so refreshes
    /// never overlap.
    pub async fn refresh(&self) -> Result<Arc<Snapshot>, UpdateFailed> {
        self.shared.refresh().await
    }

    /// The last successful snapshot, if any refresh has succeeded yet
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.shared.snapshot_tx.borrow().clone()
    }

    /// Receiver notified each time a new snapshot is stored
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Snapshot>>> {
        self.shared.snapshot_tx.subscribe()
    }

    /// Receiver yielding one `UpdateFailed` per failed refresh
    pub fn failures(&self) -> broadcast::Receiver<UpdateFailed> {
        self.shared.failures_tx.subscribe()
    }

    /// Whether the most recent refresh succeeded
    pub fn last_update_success(&self) -> bool {
        self.shared.last_error_tx.borrow().is_none()
    }

    /// The failure of the most recent refresh, if it failed
    pub fn last_error(&self) -> Option<UpdateFailed> {
        self.shared.last_error_tx.borrow().clone()
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.shared.config
    }

    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(Poller::is_running)
    }

    /// Stop polling. A refresh in flight is allowed to finish.
    pub async fn shutdown(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop().await;
        }
    }
}
