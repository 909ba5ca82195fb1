//! Coordinator configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConfigError;

/// Upper bound on a single refresh, covering both fetches.
pub const REFRESH_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_FIAT: &str = "USD";
pub const DEFAULT_UPDATE_INTERVAL_MINUTES: u64 = 1;
pub const DEFAULT_NAME: &str = "nicehash";

/// Configuration for a `RefreshCoordinator`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Name used to tag log output
    #[serde(default = "default_name")]
    pub name: String,

    /// Polling interval in minutes
    #[serde(default = "default_update_interval_minutes")]
    pub update_interval_minutes: u64,

    /// Currency the account balances are valued in
    #[serde(default = "default_fiat")]
    pub fiat: String,
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

fn default_update_interval_minutes() -> u64 {
    DEFAULT_UPDATE_INTERVAL_MINUTES
}

fn default_fiat() -> String {
    DEFAULT_FIAT.to_string()
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            update_interval_minutes: DEFAULT_UPDATE_INTERVAL_MINUTES,
            fiat: default_fiat(),
        }
    }
}

impl CoordinatorConfig {
    pub fn new(update_interval_minutes: u64) -> Self {
        Self {
            update_interval_minutes,
            ..Self::default()
        }
    }

    pub fn with_fiat(mut self, fiat: impl Into<String>) -> Self {
        self.fiat = fiat.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Get the polling interval as a Duration
    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval_minutes.saturating_mul(60))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.update_interval_minutes == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if self.fiat.len() != 3 || !self.fiat.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidFiat(self.fiat.clone()));
        }
        Ok(())
    }
}
