pub mod api;
pub mod config;
pub mod coordinator;
pub mod data;
pub mod error;

pub use api::MiningApi;
pub use api::web::NiceHashWebApi;
pub use config::{CoordinatorConfig, REFRESH_TIMEOUT};
pub use coordinator::RefreshCoordinator;
pub use data::rig::{RigRecord, resolve_rig_name};
pub use data::snapshot::{Snapshot, SnapshotField};
pub use error::{ConfigError, FetchError, SetupError, UpdateFailed};
