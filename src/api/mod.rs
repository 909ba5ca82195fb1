use async_trait::async_trait;
use serde_json::Value;

use crate::error::FetchError;

pub mod web;

/// The remote operations a `RefreshCoordinator` polls.
///
/// Payloads are passed through untyped; their shape varies between API and
/// firmware versions.
#[async_trait]
pub trait MiningApi: Send + Sync {
    /// Fetches data for the whole fleet of rigs.
    async fn fetch_rigs(&self) -> Result<Value, FetchError>;

    /// Fetches account balances valued in `fiat`.
    async fn fetch_account(&self, fiat: &str) -> Result<Value, FetchError>;
}
