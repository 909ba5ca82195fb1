use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors produced while talking to the remote mining API
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// Network error (connection issues, DNS resolution, etc.)
    #[error("Network error: {0}")]
    Network(String),
    /// HTTP error with status code
    #[error("HTTP error: {0}")]
    Http(u16),
    /// JSON parsing error
    #[error("Parse error: {0}")]
    Parse(String),
    /// Request building error
    #[error("Request error: {0}")]
    Request(String),
    /// The request, or a whole refresh, did not finish in time
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),
}

impl FetchError {
    /// Check if this error came from an elapsed deadline
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout(_))
    }
}

/// The single failure kind raised by a refresh.
///
/// The transport cause is kept behind an `Arc` so the failure can be handed
/// to every subscriber of the failure channel.
#[derive(Debug, Clone, Error)]
#[error("Error communicating with API: {cause}")]
pub struct UpdateFailed {
    #[source]
    cause: Arc<FetchError>,
}

impl UpdateFailed {
    pub fn new(cause: FetchError) -> Self {
        Self {
            cause: Arc::new(cause),
        }
    }

    /// The transport error that caused this refresh to fail
    pub fn cause(&self) -> &FetchError {
        &self.cause
    }
}

impl From<FetchError> for UpdateFailed {
    fn from(cause: FetchError) -> Self {
        Self::new(cause)
    }
}

/// Invalid coordinator configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Update interval must be at least one minute")]
    ZeroInterval,
    #[error("Invalid fiat currency code: {0:?}")]
    InvalidFiat(String),
}

/// Errors from starting a coordinator that must refresh once before polling
#[derive(Debug, Clone, Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("First refresh failed: {0}")]
    FirstRefresh(#[from] UpdateFailed),
}
