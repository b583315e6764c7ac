//! CLI command implementations

pub mod add;
pub mod config;
pub mod import;
pub mod list;
pub mod remove;

pub use add::execute as add;
pub use config::execute as config;
pub use import::execute as import;
pub use list::execute as list;
pub use remove::execute as remove;

use crate::cache::PackageCache;
use crate::config::{Config, ConfigManager};
use crate::error::LazydepResult;
use tracing::info;

/// Write a lazily discovered registry URL back to the config file
pub(crate) async fn persist_registry(
    cache: &PackageCache,
    config: &Config,
    manager: &ConfigManager,
) -> LazydepResult<()> {
    let registry = cache.registry_config().await;
    if registry == config.registry {
        return Ok(());
    }

    let mut updated = config.clone();
    updated.registry = registry;
    manager.save(&updated).await?;
    info!("Saved registry {} to {}", updated.registry.url, manager.path().display());
    Ok(())
}

/// Persist the registry after a cache operation has finished
///
/// The operation's own error wins over a failure to save the config.
pub(crate) async fn finish_with_registry<T>(
    cache: &PackageCache,
    config: &Config,
    manager: &ConfigManager,
    result: LazydepResult<T>,
) -> LazydepResult<T> {
    let saved = persist_registry(cache, config, manager).await;
    let value = result?;
    saved?;
    Ok(value)
}
