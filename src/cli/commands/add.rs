//! Add command - install a package into the cache

use super::finish_with_registry;
use crate::cache::PackageCache;
use crate::cli::args::AddArgs;
use crate::config::{Config, ConfigManager};
use crate::error::LazydepResult;
use crate::package::PackageSpec;
use crate::ui::{self, Status, TaskSpinner, UiContext};

/// Execute the add command
pub async fn execute(args: AddArgs, config: &Config, manager: &ConfigManager) -> LazydepResult<()> {
    let ctx = UiContext::detect();
    let spec: PackageSpec = args.package.parse()?;
    let cache = PackageCache::new(config);

    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start(&format!("Installing {}...", spec.install_target()));

    let result = cache.install(&spec).await;
    match result {
        Ok(()) => spinner.stop(&format!("Installed {}", spec.install_target())),
        Err(_) => spinner.stop_error(&format!("Failed to install {}", spec.identifier())),
    }

    finish_with_registry(&cache, config, manager, result).await?;
    let root = cache.root().display().to_string();
    ui::status_detail(&ctx, Status::Info, "Cached", Some(&root));
    Ok(())
}
