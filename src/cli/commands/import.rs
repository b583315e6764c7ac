//! Import command - load a package, installing or repairing it as needed

use super::finish_with_registry;
use crate::cache::{PackageCache, RetryPolicy};
use crate::cli::args::ImportArgs;
use crate::config::{Config, ConfigManager};
use crate::error::LazydepResult;
use crate::package::PackageSpec;
use crate::ui::{self, TaskSpinner, UiContext};

/// Execute the import command
pub async fn execute(
    args: ImportArgs,
    config: &Config,
    manager: &ConfigManager,
) -> LazydepResult<()> {
    let ctx = UiContext::detect();
    let spec: PackageSpec = args.package.parse()?;
    let cache = PackageCache::new(config);

    let policy = match args.retries {
        Some(retries) => RetryPolicy::new(retries),
        None => cache.default_policy(),
    }
    .forced(args.force);

    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start(&format!("Loading {}...", spec.identifier()));

    let result = cache.safe_import(&spec, policy).await;
    match result {
        Ok(ref module) => spinner.stop(&format!("Loaded {}@{}", module.name(), module.version())),
        Err(_) => spinner.stop_error(&format!("Failed to load {}", spec.identifier())),
    }

    let module = finish_with_registry(&cache, config, manager, result).await?;
    ui::field(&ctx, "Root", module.root().display());
    ui::field(&ctx, "Entry", module.entry().display());

    Ok(())
}
