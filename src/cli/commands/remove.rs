//! Remove command - delete a package from the cache

use crate::cache::PackageCache;
use crate::cli::args::RemoveArgs;
use crate::config::Config;
use crate::error::LazydepResult;
use crate::package::spec::validate_identifier;
use crate::ui::{self, Status, UiContext};

/// Execute the remove command
pub async fn execute(args: RemoveArgs, config: &Config) -> LazydepResult<()> {
    let ctx = UiContext::detect().with_auto_yes(args.yes);
    validate_identifier(&args.package)?;

    let prompt = format!("Remove {} from the cache?", args.package);
    if !ui::confirm(&ctx, &prompt, true).await? {
        ui::status(&ctx, Status::Info, "Cancelled");
        return Ok(());
    }

    let cache = PackageCache::new(config);
    if cache.remove(&args.package).await? {
        ui::status(&ctx, Status::Ok, &format!("Removed {}", args.package));
    } else {
        ui::status(&ctx, Status::Warn, &format!("{} is not cached", args.package));
    }

    Ok(())
}
