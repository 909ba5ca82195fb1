use nicehash_rs::api::web::DEFAULT_API_URL;
use nicehash_rs::{CoordinatorConfig, NiceHashWebApi, RefreshCoordinator, resolve_rig_name};
use reqwest::header::HeaderMap;
use std::error::Error;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let base_url = std::env::var("NICEHASH_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    let mut config = CoordinatorConfig::default();
    if let Ok(minutes) = std::env::var("NICEHASH_UPDATE_INTERVAL") {
        config.update_interval_minutes = minutes.parse()?;
    }
    if let Ok(fiat) = std::env::var("NICEHASH_FIAT") {
        config = config.with_fiat(fiat);
    }

    let api = NiceHashWebApi::new(Url::parse(&base_url)?, HeaderMap::new())?;
    let mut coordinator = RefreshCoordinator::start(Arc::new(api), config)?;
    let mut updates = coordinator.subscribe();
    let mut failures = coordinator.failures();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let Some(snapshot) = updates.borrow_and_update().clone() else {
                    continue;
                };
                for rig in snapshot.rig_records() {
                    println!("{}", resolve_rig_name(Some(rig)).as_deref().unwrap_or("<unnamed rig>"));
                }
            }
            Ok(failure) = failures.recv() => {
                warn!(error = %failure, "Keeping last known good data");
            }
            _ = &mut ctrl_c => {
                info!("Shutting down");
                break;
            }
        }
    }

    coordinator.shutdown().await;
    Ok(())
}
